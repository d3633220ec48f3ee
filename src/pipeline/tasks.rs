use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::constants;
use crate::error::{Result, ScraperError};
use crate::pipeline::ingestion::{kaspiko, FetchEnvelope, KaspikoPageSource, RosgranstroyFetcher};
use crate::pipeline::output;
use crate::pipeline::processing::geojson::project_records;
use crate::pipeline::processing::normalize::{NormalizationRegistry, RawSnapshot};
use crate::types::{CheckpointSource, FlatCheckpointRow};

#[derive(Debug, Serialize)]
pub struct FetchOnceResult {
    pub source_id: String,
    pub envelope_id: Option<Uuid>,
    pub record_count: Option<usize>,
    pub snapshot_path: PathBuf,
}

/// Fetches one source's raw snapshot and persists it under `raw_data/`.
pub async fn fetch_once(config: &Config, source_id: &str) -> Result<FetchOnceResult> {
    match source_id {
        constants::ROSGRANSTROY_SOURCE => {
            let fetcher = RosgranstroyFetcher::new(&config.sources)?;
            info!("fetching {}", config.sources.rosgranstroy_url);
            let data = fetcher.fetch_raw().await?;
            let envelope = FetchEnvelope::wrap(fetcher.source_id(), data);

            let path = config
                .paths
                .raw_data_dir
                .join(constants::ROSGRANSTROY_SNAPSHOT_FILE);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;
            info!(snapshot = %path.display(), "raw snapshot saved");

            Ok(FetchOnceResult {
                source_id: source_id.to_string(),
                envelope_id: Some(envelope.meta.envelope_id),
                record_count: envelope.meta.count,
                snapshot_path: path,
            })
        }
        constants::KASPIKO_SOURCE => {
            let source = KaspikoPageSource::new(&config.sources)?;
            info!("scraping {}", config.sources.kaspiko_url);
            let data = source.fetch_raw().await?;
            let rows: Vec<FlatCheckpointRow> = serde_json::from_value(data)?;

            let path = config
                .paths
                .raw_data_dir
                .join(constants::KASPIKO_SNAPSHOT_FILE);
            kaspiko::write_snapshot_csv(&rows, &path)?;
            info!(snapshot = %path.display(), "raw snapshot saved");

            Ok(FetchOnceResult {
                source_id: source_id.to_string(),
                envelope_id: None,
                record_count: Some(rows.len()),
                snapshot_path: path,
            })
        }
        other => Err(ScraperError::Config(format!(
            "Unknown source '{}'. Supported: {}",
            other,
            constants::get_supported_sources().join(", ")
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct NormalizeOnceResult {
    pub source_id: String,
    pub record_count: usize,
    pub skipped_branches: usize,
    pub csv_path: PathBuf,
}

/// Normalizes a previously fetched raw snapshot into the canonical CSV.
pub fn normalize_once(config: &Config, source_id: &str) -> Result<NormalizeOnceResult> {
    let payload = match source_id {
        constants::ROSGRANSTROY_SOURCE => {
            let path = config
                .paths
                .raw_data_dir
                .join(constants::ROSGRANSTROY_SNAPSHOT_FILE);
            serde_json::from_str(&fs::read_to_string(&path)?)?
        }
        constants::KASPIKO_SOURCE => {
            let path = config
                .paths
                .raw_data_dir
                .join(constants::KASPIKO_SNAPSHOT_FILE);
            serde_json::to_value(kaspiko::load_snapshot_csv(&path)?)?
        }
        other => {
            return Err(ScraperError::Config(format!(
                "Unknown source '{}'. Supported: {}",
                other,
                constants::get_supported_sources().join(", ")
            )))
        }
    };

    let registry = NormalizationRegistry::from_config(config);
    let snapshot = RawSnapshot {
        source_id: source_id.to_string(),
        payload,
    };
    let outcome = registry
        .normalize(&snapshot)
        .map_err(|e| ScraperError::Stage(format!("normalize failed for {}: {}", source_id, e)))?;

    if outcome.skipped_branches > 0 {
        warn!(
            skipped = outcome.skipped_branches,
            "malformed branches were skipped during normalization"
        );
    }

    let csv_path = config.paths.data_dir.join(constants::CHECKPOINTS_CSV_FILE);
    output::write_checkpoints_csv(&outcome.records, &csv_path)?;
    info!(
        records = outcome.records.len(),
        csv = %csv_path.display(),
        "canonical checkpoint table written"
    );

    Ok(NormalizeOnceResult {
        source_id: source_id.to_string(),
        record_count: outcome.records.len(),
        skipped_branches: outcome.skipped_branches,
        csv_path,
    })
}

#[derive(Debug, Serialize)]
pub struct GeojsonOnceResult {
    pub feature_count: usize,
    pub skipped_records: usize,
    pub geojson_path: PathBuf,
    pub frontend_path: PathBuf,
}

/// Projects the canonical CSV into the GeoJSON artifact and synchronizes a
/// copy for the map frontend.
pub fn build_geojson_once(config: &Config) -> Result<GeojsonOnceResult> {
    let csv_path = config.paths.data_dir.join(constants::CHECKPOINTS_CSV_FILE);
    let records = output::read_checkpoints_csv(&csv_path)?;

    let outcome = project_records(&records);
    if outcome.skipped > 0 {
        warn!(
            skipped = outcome.skipped,
            "records without a valid coordinate pair were excluded from geojson"
        );
    }

    let geojson_path = config
        .paths
        .data_dir
        .join(constants::CHECKPOINTS_GEOJSON_FILE);
    output::write_geojson(&outcome.collection, &geojson_path)?;

    let frontend_path = config
        .paths
        .frontend_data_dir
        .join(constants::FRONTEND_GEOJSON_FILE);
    output::write_geojson(&outcome.collection, &frontend_path)?;

    info!(
        features = outcome.collection.features.len(),
        geojson = %geojson_path.display(),
        "geojson artifacts written"
    );

    Ok(GeojsonOnceResult {
        feature_count: outcome.collection.features.len(),
        skipped_records: outcome.skipped,
        geojson_path,
        frontend_path,
    })
}

/// Removes stale generated artifacts before a full run. Returns the paths
/// that were actually deleted.
pub fn clean_artifacts(config: &Config) -> Result<Vec<PathBuf>> {
    let candidates = [
        config.paths.data_dir.join(constants::CHECKPOINTS_CSV_FILE),
        config
            .paths
            .data_dir
            .join(constants::CHECKPOINTS_GEOJSON_FILE),
        config
            .paths
            .frontend_data_dir
            .join(constants::FRONTEND_GEOJSON_FILE),
    ];

    let mut removed = Vec::new();
    for path in candidates {
        if path.exists() {
            fs::remove_file(&path)?;
            info!(file = %path.display(), "removed stale artifact");
            removed.push(path);
        }
    }
    Ok(removed)
}

#[derive(Debug, Serialize)]
pub struct PipelineRunResult {
    pub fetch: FetchOnceResult,
    pub normalize: NormalizeOnceResult,
    pub geojson: GeojsonOnceResult,
}

/// Full pipeline: cleanup, fetch, normalize, geojson. Stops at the first
/// failed stage.
pub async fn run_full(config: &Config, source_id: &str) -> Result<PipelineRunResult> {
    clean_artifacts(config)?;
    let fetch = fetch_once(config, source_id).await?;
    let normalize = normalize_once(config, source_id)?;
    let geojson = build_geojson_once(config)?;
    Ok(PipelineRunResult {
        fetch,
        normalize,
        geojson,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;

    fn test_config(root: &std::path::Path) -> Config {
        Config {
            paths: PathsConfig {
                raw_data_dir: root.join("raw_data"),
                data_dir: root.join("data"),
                frontend_data_dir: root.join("frontend/data"),
            },
            ..Config::default()
        }
    }

    #[test]
    fn normalize_and_geojson_stages_chain_over_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let rows = vec![FlatCheckpointRow {
            name_ru: "Верхний Ларс".to_string(),
            region: "Северная Осетия".to_string(),
            description: "Автомобильный многосторонний, круглосуточно".to_string(),
        }];
        kaspiko::write_snapshot_csv(
            &rows,
            &config
                .paths
                .raw_data_dir
                .join(constants::KASPIKO_SNAPSHOT_FILE),
        )
        .unwrap();

        let normalized = normalize_once(&config, constants::KASPIKO_SOURCE).unwrap();
        assert_eq!(normalized.record_count, 1);
        assert!(normalized.csv_path.exists());

        // Kaspiko rows carry no coordinates, so the geojson stage filters
        // them all while still succeeding
        let geojson = build_geojson_once(&config).unwrap();
        assert_eq!(geojson.feature_count, 0);
        assert_eq!(geojson.skipped_records, 1);
        assert!(geojson.geojson_path.exists());
        assert!(geojson.frontend_path.exists());
    }

    #[test]
    fn unknown_source_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        assert!(normalize_once(&config, "nope").is_err());
    }

    #[test]
    fn clean_artifacts_removes_only_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        assert!(clean_artifacts(&config).unwrap().is_empty());

        let csv_path = config.paths.data_dir.join(constants::CHECKPOINTS_CSV_FILE);
        fs::create_dir_all(csv_path.parent().unwrap()).unwrap();
        fs::write(&csv_path, "stale").unwrap();

        let removed = clean_artifacts(&config).unwrap();
        assert_eq!(removed, vec![csv_path.clone()]);
        assert!(!csv_path.exists());
    }
}
