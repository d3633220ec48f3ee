use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::SourcesConfig;
use crate::constants;
use crate::error::{Result, ScraperError};
use crate::types::{CheckpointSource, FlatCheckpointRow, RawFeedData};

/// Extracts flat checkpoint rows from the Kaspiko info page.
///
/// The page carries one large table whose data rows are
/// (name, region, description) cells; rows with fewer than three cells are
/// headers or spacers and are ignored. Extra trailing cells are folded into
/// the description.
pub fn parse_checkpoint_table(html: &str) -> Vec<FlatCheckpointRow> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table tr").expect("static selector");
    let cell_selector = Selector::parse("td").expect("static selector");

    let mut rows = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 3 {
            continue;
        }
        rows.push(FlatCheckpointRow {
            name_ru: cells[0].clone(),
            region: cells[1].clone(),
            description: cells[2..].join(" "),
        });
    }
    debug!("extracted {} rows from checkpoint table", rows.len());
    rows
}

/// Loads a previously scraped snapshot CSV (`name_ru,region,description`).
pub fn load_snapshot_csv(path: &Path) -> Result<Vec<FlatCheckpointRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: FlatCheckpointRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Writes the scraped rows as the snapshot CSV artifact.
pub fn write_snapshot_csv(rows: &[FlatCheckpointRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Scrapes the Kaspiko checkpoint list page into a flat row sequence.
pub struct KaspikoPageSource {
    client: reqwest::Client,
    url: String,
}

impl KaspikoPageSource {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.kaspiko_url.clone(),
        })
    }
}

#[async_trait]
impl CheckpointSource for KaspikoPageSource {
    fn source_id(&self) -> &'static str {
        constants::KASPIKO_SOURCE
    }

    async fn fetch_raw(&self) -> Result<RawFeedData> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Source {
                message: format!("{} returned HTTP {}", self.url, status),
            });
        }
        let body = response.text().await?;
        let rows = parse_checkpoint_table(&body);
        if rows.is_empty() {
            warn!("no checkpoint table rows found at {}", self.url);
        }
        Ok(serde_json::to_value(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_rows_and_skips_headers() {
        let html = r#"
            <table>
              <tr><th>Пункт</th><th>Регион</th><th>Описание</th></tr>
              <tr><td>Верхний Ларс</td><td>Северная Осетия</td>
                  <td>Автомобильный, многосторонний, круглосуточный</td></tr>
              <tr><td colspan="3">раздел</td></tr>
              <tr><td>Ивангород</td><td>Ленинградская область</td>
                  <td>Пешеходный</td><td>двусторонний</td></tr>
            </table>
        "#;
        let rows = parse_checkpoint_table(html);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name_ru, "Верхний Ларс");
        assert_eq!(rows[0].region, "Северная Осетия");
        // Trailing cells fold into the description
        assert_eq!(rows[1].description, "Пешеходный двусторонний");
    }

    #[test]
    fn snapshot_csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kaspiko_checkpoints_raw.csv");
        let rows = vec![
            FlatCheckpointRow {
                name_ru: "Верхний Ларс".to_string(),
                region: "Северная Осетия".to_string(),
                description: "Автомобильный, круглосуточный".to_string(),
            },
            FlatCheckpointRow {
                name_ru: "Ивангород".to_string(),
                region: "Ленинградская область".to_string(),
                description: "Пешеходный".to_string(),
            },
        ];

        write_snapshot_csv(&rows, &path).unwrap();
        let loaded = load_snapshot_csv(&path).unwrap();
        assert_eq!(loaded, rows);
    }
}
