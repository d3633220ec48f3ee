use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical output columns in contract order. Column order drives the CSV
/// header and must mirror the field order of [`CheckpointRecord`].
pub const CANONICAL_COLUMNS: [&str; 25] = [
    "id",
    "name_ru",
    "name_en",
    "type",
    "category",
    "status",
    "region_rf",
    "municipality",
    "border_country",
    "border_section",
    "counterpart_name",
    "latitude",
    "longitude",
    "coord_accuracy",
    "infrastructure",
    "transport_allowed",
    "customs_control",
    "veterinary_control",
    "working_hours",
    "seasonality",
    "weather_dependency",
    "notes",
    "last_update",
    "sources",
    "confidence_level",
];

/// One normalized checkpoint in the canonical schema.
///
/// Every field is present in every record; absent source data maps to an
/// empty string, never to an omitted field. All values are strings so the
/// record serializes identically into the CSV artifact and the GeoJSON
/// property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub id: String,
    pub name_ru: String,
    pub name_en: String,
    #[serde(rename = "type")]
    pub checkpoint_type: String,
    pub category: String,
    pub status: String,
    pub region_rf: String,
    pub municipality: String,
    pub border_country: String,
    pub border_section: String,
    pub counterpart_name: String,
    pub latitude: String,
    pub longitude: String,
    pub coord_accuracy: String,
    pub infrastructure: String,
    pub transport_allowed: String,
    pub customs_control: String,
    pub veterinary_control: String,
    pub working_hours: String,
    pub seasonality: String,
    pub weather_dependency: String,
    pub notes: String,
    pub last_update: String,
    pub sources: String,
    pub confidence_level: String,
}

impl CheckpointRecord {
    /// Ordered `(column, value)` view of the record, matching
    /// [`CANONICAL_COLUMNS`].
    pub fn as_row(&self) -> [(&'static str, &str); 25] {
        [
            ("id", &self.id),
            ("name_ru", &self.name_ru),
            ("name_en", &self.name_en),
            ("type", &self.checkpoint_type),
            ("category", &self.category),
            ("status", &self.status),
            ("region_rf", &self.region_rf),
            ("municipality", &self.municipality),
            ("border_country", &self.border_country),
            ("border_section", &self.border_section),
            ("counterpart_name", &self.counterpart_name),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
            ("coord_accuracy", &self.coord_accuracy),
            ("infrastructure", &self.infrastructure),
            ("transport_allowed", &self.transport_allowed),
            ("customs_control", &self.customs_control),
            ("veterinary_control", &self.veterinary_control),
            ("working_hours", &self.working_hours),
            ("seasonality", &self.seasonality),
            ("weather_dependency", &self.weather_dependency),
            ("notes", &self.notes),
            ("last_update", &self.last_update),
            ("sources", &self.sources),
            ("confidence_level", &self.confidence_level),
        ]
    }
}

static NON_LATIN: Lazy<Regex> = Lazy::new(|| Regex::new("[^A-Z]").expect("static pattern"));

/// Derives a 3-letter region code: upper-cased, Latin capitals only,
/// truncated to three characters. Cyrillic names upper-case to non-Latin
/// letters and therefore resolve to `fallback`.
pub fn region_code(region: &str, fallback: &str) -> String {
    let upper = region.to_uppercase();
    let letters = NON_LATIN.replace_all(&upper, "");
    let code: String = letters.chars().take(3).collect();
    if code.is_empty() {
        fallback.to_string()
    } else {
        code
    }
}

/// Synthesizes an identifier for records with no source-provided id:
/// `<country>-<region code>-<zero-padded ordinal>`.
///
/// The ordinal is the 1-based position of the record within the current
/// run's input sequence. Identifiers are therefore only stable while the
/// input order and length are unchanged; a partial re-ingestion reassigns
/// them. Known limitation of the id contract, kept as-is.
pub fn synthesize_checkpoint_id(
    country_prefix: &str,
    region: &str,
    fallback_region_code: &str,
    ordinal: usize,
) -> String {
    format!(
        "{}-{}-{:03}",
        country_prefix,
        region_code(region, fallback_region_code),
        ordinal
    )
}
