use serde::{Deserialize, Serialize};

use crate::pipeline::processing::schema::CheckpointRecord;

pub mod normalizers;
pub mod registry;

pub use registry::NormalizationRegistry;

/// A raw snapshot handed to normalization: one source's full payload plus
/// the source id that selects the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub source_id: String,
    pub payload: serde_json::Value,
}

/// Result of normalizing one snapshot into canonical records.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Canonical records in input order
    pub records: Vec<CheckpointRecord>,
    /// Structurally malformed branches that were skipped instead of
    /// aborting the run
    pub skipped_branches: usize,
}

/// Per-source construction context: explicit configuration instead of
/// module-level globals, so tests can substitute constants.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// Locale key for locale-keyed leaf values
    pub preferred_locale: String,
    pub country_prefix: String,
    pub fallback_region_code: String,
    /// Recorded verbatim in the `sources` provenance column
    pub source_url: String,
    pub confidence_level: String,
    /// `last_update` stamp for sources that carry no per-record timestamp
    pub run_date: String,
}

/// Trait for normalizing a source snapshot into canonical checkpoint records
pub trait SourceNormalizer {
    fn source_id(&self) -> &'static str;

    /// Transform a raw snapshot into canonical records. A malformed record
    /// or branch is skipped and counted, never an error; `Err` is reserved
    /// for payloads that are not this source's shape at all.
    fn normalize(&self, snapshot: &RawSnapshot) -> anyhow::Result<NormalizeOutcome>;
}
