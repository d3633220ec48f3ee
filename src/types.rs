use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Raw feed data as returned from external APIs/scrapers
pub type RawFeedData = serde_json::Value;

/// One row of the flat (scraped) checkpoint snapshot: a name, the federal
/// subject it belongs to, and a free-text description that carries the
/// classification signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatCheckpointRow {
    #[serde(default)]
    pub name_ru: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub description: String,
}

/// Core trait that all checkpoint data sources must implement
#[async_trait::async_trait]
pub trait CheckpointSource: Send + Sync {
    /// Unique identifier for this source
    fn source_id(&self) -> &'static str;

    /// Fetch the raw payload from this data source
    async fn fetch_raw(&self) -> Result<RawFeedData>;
}
