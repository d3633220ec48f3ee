use std::collections::HashMap;

use anyhow::Result;

use super::normalizers::{KaspikoNormalizer, RosgranstroyNormalizer};
use super::{NormalizeContext, NormalizeOutcome, RawSnapshot, SourceNormalizer};
use crate::config::Config;
use crate::constants;
use crate::pipeline::processing::classify::TextClassifier;

/// Registry for source-specific normalization strategies
pub struct NormalizationRegistry {
    normalizers: HashMap<String, Box<dyn SourceNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a registry with the built-in normalizers, configured from the
    /// pipeline config.
    pub fn from_config(config: &Config) -> Self {
        let base = NormalizeContext {
            preferred_locale: config.normalize.preferred_locale.clone(),
            country_prefix: config.normalize.country_prefix.clone(),
            fallback_region_code: config.normalize.fallback_region_code.clone(),
            source_url: String::new(),
            confidence_level: String::new(),
            run_date: config.run_date(),
        };

        let mut normalizers: HashMap<String, Box<dyn SourceNormalizer>> = HashMap::new();
        normalizers.insert(
            constants::ROSGRANSTROY_SOURCE.to_string(),
            Box::new(RosgranstroyNormalizer::new(
                TextClassifier::default(),
                NormalizeContext {
                    source_url: config.sources.rosgranstroy_url.clone(),
                    confidence_level: constants::CONFIDENCE_HIGH.to_string(),
                    ..base.clone()
                },
            )),
        );
        normalizers.insert(
            constants::KASPIKO_SOURCE.to_string(),
            Box::new(KaspikoNormalizer::new(
                TextClassifier::default(),
                NormalizeContext {
                    source_url: config.sources.kaspiko_url.clone(),
                    confidence_level: constants::CONFIDENCE_MEDIUM.to_string(),
                    ..base
                },
            )),
        );

        Self { normalizers }
    }

    /// Register a normalizer for a specific source
    pub fn register(&mut self, source_id: String, normalizer: Box<dyn SourceNormalizer>) {
        self.normalizers.insert(source_id, normalizer);
    }

    /// Get the appropriate normalizer for a source
    pub fn get_normalizer(&self, source_id: &str) -> Option<&dyn SourceNormalizer> {
        self.normalizers.get(source_id).map(|n| n.as_ref())
    }

    /// Normalize a snapshot using the normalizer registered for its source
    pub fn normalize(&self, snapshot: &RawSnapshot) -> Result<NormalizeOutcome> {
        if let Some(normalizer) = self.get_normalizer(&snapshot.source_id) {
            normalizer.normalize(snapshot)
        } else {
            Err(anyhow::anyhow!(
                "No normalizer registered for source: {}",
                snapshot.source_id
            ))
        }
    }

    /// List all registered source IDs
    pub fn list_sources(&self) -> Vec<&str> {
        self.normalizers.keys().map(|k| k.as_str()).collect()
    }
}
