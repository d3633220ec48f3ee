use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::pipeline::processing::geojson::FeatureCollection;
use crate::pipeline::processing::schema::CheckpointRecord;

/// Writes the canonical tabular artifact. The header row is the canonical
/// column list in declared order; one row per record, input order preserved.
pub fn write_checkpoints_csv(records: &[CheckpointRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a canonical tabular artifact back into records.
pub fn read_checkpoints_csv(path: &Path) -> Result<Vec<CheckpointRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: CheckpointRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Writes the feature collection as a pretty-printed UTF-8 GeoJSON file.
pub fn write_geojson(collection: &FeatureCollection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(collection)?;
    fs::write(path, json)?;
    Ok(())
}
