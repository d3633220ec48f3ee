use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::types::RawFeedData;

pub mod kaspiko;
pub mod rosgranstroy;

pub use kaspiko::KaspikoPageSource;
pub use rosgranstroy::RosgranstroyFetcher;

/// Metadata recorded alongside every raw snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMeta {
    pub envelope_id: Uuid,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    /// Hex SHA-256 of the serialized payload
    pub sha256: String,
    /// Record count when the payload is a sequence
    pub count: Option<usize>,
}

/// Raw payload plus fetch metadata, persisted as the snapshot artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchEnvelope {
    pub meta: FetchMeta,
    pub data: RawFeedData,
}

impl FetchEnvelope {
    pub fn wrap(source: &str, data: RawFeedData) -> Self {
        let checksum = hex::encode(Sha256::digest(data.to_string().as_bytes()));
        let count = data.as_array().map(|items| items.len());
        Self {
            meta: FetchMeta {
                envelope_id: Uuid::new_v4(),
                source: source.to_string(),
                fetched_at: Utc::now(),
                sha256: checksum,
                count,
            },
            data,
        }
    }
}
