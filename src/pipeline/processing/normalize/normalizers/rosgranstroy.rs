use anyhow::Result;
use serde_json::Value;
use tracing::warn;

use crate::pipeline::processing::classify::TextClassifier;
use crate::pipeline::processing::extract::{locale_get, safe_get};
use crate::pipeline::processing::normalize::{
    NormalizeContext, NormalizeOutcome, RawSnapshot, SourceNormalizer,
};
use crate::pipeline::processing::schema::CheckpointRecord;

/// Normalizer for the Rosgranstroy map feed.
///
/// The payload is a fetch envelope whose `data.federal_districts` key maps
/// district names to arrays of federal-subject objects, each carrying a
/// `checkpoints` array of nested checkpoint objects. Leaf values are
/// locale-keyed (`title.ru`, `title.en`). Checkpoint ids come from the
/// source verbatim.
pub struct RosgranstroyNormalizer {
    classifier: TextClassifier,
    context: NormalizeContext,
}

impl RosgranstroyNormalizer {
    pub fn new(classifier: TextClassifier, context: NormalizeContext) -> Self {
        Self {
            classifier,
            context,
        }
    }

    /// The Russian label text the classifier runs over: the checkpoint's
    /// own type, pattern, status and working-time labels.
    fn label_text(&self, checkpoint: &Value) -> String {
        let locale = self.context.preferred_locale.as_str();
        [
            locale_get(checkpoint, &["checkpoint_type", "title"], locale),
            locale_get(checkpoint, &["checkpoint_pattern", "title"], locale),
            locale_get(checkpoint, &["status", "title"], locale),
            locale_get(checkpoint, &["status", "description"], locale),
            locale_get(checkpoint, &["working_time"], locale),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
    }

    fn to_record(&self, checkpoint: &Value, subject: &Value) -> CheckpointRecord {
        let locale = self.context.preferred_locale.as_str();
        let classification = self.classifier.classify(&self.label_text(checkpoint));

        // Address and the human-readable status note survive in `notes`
        let notes: String = [
            locale_get(checkpoint, &["address"], locale),
            locale_get(checkpoint, &["status", "description"], locale),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

        CheckpointRecord {
            id: safe_get(checkpoint, &["id"]),
            name_ru: locale_get(checkpoint, &["title"], locale),
            name_en: locale_get(checkpoint, &["title"], "en"),
            checkpoint_type: classification.checkpoint_type,
            category: classification.category,
            status: classification.status,
            region_rf: locale_get(subject, &["title"], locale),
            border_country: locale_get(checkpoint, &["foreign_country", "title"], locale),
            counterpart_name: locale_get(checkpoint, &["foreign_checkpoint"], locale),
            latitude: safe_get(checkpoint, &["latitude"]),
            longitude: safe_get(checkpoint, &["longitude"]),
            working_hours: classification.working_hours,
            notes,
            last_update: safe_get(checkpoint, &["updated_at"]),
            sources: self.context.source_url.clone(),
            confidence_level: self.context.confidence_level.clone(),
            ..CheckpointRecord::default()
        }
    }
}

impl SourceNormalizer for RosgranstroyNormalizer {
    fn source_id(&self) -> &'static str {
        crate::constants::ROSGRANSTROY_SOURCE
    }

    fn normalize(&self, snapshot: &RawSnapshot) -> Result<NormalizeOutcome> {
        let mut outcome = NormalizeOutcome::default();

        let districts = match snapshot
            .payload
            .get("data")
            .and_then(|data| data.get("federal_districts"))
            .and_then(|districts| districts.as_object())
        {
            Some(map) => map,
            None => {
                warn!("rosgranstroy payload has no data.federal_districts mapping");
                outcome.skipped_branches += 1;
                return Ok(outcome);
            }
        };

        for (district_name, subjects) in districts {
            let Some(subjects) = subjects.as_array() else {
                warn!(district = %district_name, "district value is not a list, skipping branch");
                outcome.skipped_branches += 1;
                continue;
            };

            for subject in subjects {
                // An absent checkpoints list means no checkpoints, not a
                // malformed subject
                let Some(checkpoints) = subject.get("checkpoints") else {
                    continue;
                };
                let Some(checkpoints) = checkpoints.as_array() else {
                    warn!(district = %district_name, "checkpoints value is not a list, skipping branch");
                    outcome.skipped_branches += 1;
                    continue;
                };
                for checkpoint in checkpoints {
                    outcome.records.push(self.to_record(checkpoint, subject));
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_normalizer() -> RosgranstroyNormalizer {
        RosgranstroyNormalizer::new(
            TextClassifier::default(),
            NormalizeContext {
                preferred_locale: "ru".to_string(),
                country_prefix: "RUS".to_string(),
                fallback_region_code: "RUS".to_string(),
                source_url: "https://rosgranstroy.ru/api/map_data".to_string(),
                confidence_level: "high".to_string(),
                run_date: "2026-01-01".to_string(),
            },
        )
    }

    fn feed_with(subjects: Value) -> Value {
        json!({
            "meta": {"source": "test"},
            "data": {"federal_districts": {"Северо-Западный": subjects}}
        })
    }

    #[test]
    fn normalizes_a_nested_checkpoint() {
        let payload = feed_with(json!([
            {
                "title": {"ru": "Псковская область"},
                "checkpoints": [{
                    "id": 1042,
                    "title": {"ru": "Куничина Гора", "en": "Kunichina Gora"},
                    "checkpoint_type": {"title": {"ru": "Автомобильный"}},
                    "checkpoint_pattern": {"title": {"ru": "Многосторонний"}},
                    "status": {
                        "title": {"ru": "Функционирует"},
                        "description": {"ru": "Работает в штатном режиме"}
                    },
                    "working_time": {"ru": "Круглосуточно"},
                    "latitude": 57.76,
                    "longitude": 27.86,
                    "address": {"ru": "Псковская область, д. Куничина Гора"},
                    "foreign_country": {"title": {"ru": "Эстония"}},
                    "foreign_checkpoint": {"ru": "Койдула"},
                    "updated_at": "2025-11-03"
                }]
            }
        ]));

        let snapshot = RawSnapshot {
            source_id: "rosgranstroy".to_string(),
            payload,
        };
        let outcome = test_normalizer().normalize(&snapshot).unwrap();

        assert_eq!(outcome.skipped_branches, 0);
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.id, "1042");
        assert_eq!(record.name_ru, "Куничина Гора");
        assert_eq!(record.name_en, "Kunichina Gora");
        assert_eq!(record.checkpoint_type, "auto");
        assert_eq!(record.category, "international");
        assert_eq!(record.status, "active");
        assert_eq!(record.working_hours, "24/7");
        assert_eq!(record.region_rf, "Псковская область");
        assert_eq!(record.border_country, "Эстония");
        assert_eq!(record.counterpart_name, "Койдула");
        assert_eq!(record.latitude, "57.76");
        assert_eq!(record.longitude, "27.86");
        assert_eq!(record.last_update, "2025-11-03");
        assert_eq!(record.confidence_level, "high");
        assert_eq!(record.municipality, "");
    }

    #[test]
    fn missing_leaves_become_empty_fields() {
        let payload = feed_with(json!([
            {"checkpoints": [{"id": 7}]}
        ]));
        let snapshot = RawSnapshot {
            source_id: "rosgranstroy".to_string(),
            payload,
        };
        let outcome = test_normalizer().normalize(&snapshot).unwrap();

        let record = &outcome.records[0];
        assert_eq!(record.id, "7");
        assert_eq!(record.name_ru, "");
        assert_eq!(record.region_rf, "");
        assert_eq!(record.latitude, "");
        // Classifier defaults still apply on empty label text
        assert_eq!(record.checkpoint_type, "auto");
        assert_eq!(record.status, "active");
    }

    #[test]
    fn malformed_district_branch_is_skipped_not_fatal() {
        let payload = json!({
            "data": {"federal_districts": {
                "Broken": "not a list",
                "Ok": [{"checkpoints": [{"id": 1}]}]
            }}
        });
        let snapshot = RawSnapshot {
            source_id: "rosgranstroy".to_string(),
            payload,
        };
        let outcome = test_normalizer().normalize(&snapshot).unwrap();

        assert_eq!(outcome.skipped_branches, 1);
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn absent_top_level_key_yields_empty_outcome() {
        let snapshot = RawSnapshot {
            source_id: "rosgranstroy".to_string(),
            payload: json!({"unexpected": true}),
        };
        let outcome = test_normalizer().normalize(&snapshot).unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_branches, 1);
    }
}
