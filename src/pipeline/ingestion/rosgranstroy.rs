use std::time::Duration;

use async_trait::async_trait;

use crate::config::SourcesConfig;
use crate::constants;
use crate::error::{Result, ScraperError};
use crate::types::{CheckpointSource, RawFeedData};

/// Fetches the Rosgranstroy map feed as nested JSON.
pub struct RosgranstroyFetcher {
    client: reqwest::Client,
    url: String,
}

impl RosgranstroyFetcher {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.rosgranstroy_url.clone(),
        })
    }
}

#[async_trait]
impl CheckpointSource for RosgranstroyFetcher {
    fn source_id(&self) -> &'static str {
        constants::ROSGRANSTROY_SOURCE
    }

    async fn fetch_raw(&self) -> Result<RawFeedData> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Source {
                message: format!("{} returned HTTP {}", self.url, status),
            });
        }
        let data = response.json::<RawFeedData>().await?;
        Ok(data)
    }
}
