use anyhow::Result;
use tracing::warn;

use crate::pipeline::processing::classify::TextClassifier;
use crate::pipeline::processing::normalize::{
    NormalizeContext, NormalizeOutcome, RawSnapshot, SourceNormalizer,
};
use crate::pipeline::processing::schema::{synthesize_checkpoint_id, CheckpointRecord};
use crate::types::FlatCheckpointRow;

/// Normalizer for the scraped Kaspiko checkpoint list.
///
/// The payload is a flat sequence of rows with `name_ru`, `region` and a
/// free-text `description` that carries the classification signal. Rows
/// have no source-provided id, so identifiers are synthesized from the
/// region code and the row's 1-based position in the sequence.
pub struct KaspikoNormalizer {
    classifier: TextClassifier,
    context: NormalizeContext,
}

impl KaspikoNormalizer {
    pub fn new(classifier: TextClassifier, context: NormalizeContext) -> Self {
        Self {
            classifier,
            context,
        }
    }

    fn to_record(&self, row: &FlatCheckpointRow, ordinal: usize) -> CheckpointRecord {
        let classification = self.classifier.classify(&row.description);
        let region = row.region.trim();

        CheckpointRecord {
            id: synthesize_checkpoint_id(
                &self.context.country_prefix,
                region,
                &self.context.fallback_region_code,
                ordinal,
            ),
            name_ru: row.name_ru.trim().to_string(),
            checkpoint_type: classification.checkpoint_type,
            category: classification.category,
            status: classification.status,
            region_rf: region.to_string(),
            working_hours: classification.working_hours,
            notes: row.description.trim().to_string(),
            last_update: self.context.run_date.clone(),
            sources: self.context.source_url.clone(),
            confidence_level: self.context.confidence_level.clone(),
            ..CheckpointRecord::default()
        }
    }
}

impl SourceNormalizer for KaspikoNormalizer {
    fn source_id(&self) -> &'static str {
        crate::constants::KASPIKO_SOURCE
    }

    fn normalize(&self, snapshot: &RawSnapshot) -> Result<NormalizeOutcome> {
        let mut outcome = NormalizeOutcome::default();

        let Some(rows) = snapshot.payload.as_array() else {
            warn!("kaspiko payload is not a sequence of rows");
            outcome.skipped_branches += 1;
            return Ok(outcome);
        };

        for (index, row) in rows.iter().enumerate() {
            // The ordinal is the 1-based input position, advanced exactly
            // once per row in input order, including rows that fail to
            // decode
            let ordinal = index + 1;
            let row: FlatCheckpointRow = match serde_json::from_value(row.clone()) {
                Ok(row) => row,
                Err(_) => {
                    warn!(ordinal, "row is not a flat checkpoint record, skipping");
                    outcome.skipped_branches += 1;
                    continue;
                }
            };
            outcome.records.push(self.to_record(&row, ordinal));
        }

        Ok(outcome)
    }
}
