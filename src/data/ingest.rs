use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::art::ArtError;

use super::record::SourceRecord;

const ENTITY_COLUMN: &str = "Entity";
const CODE_COLUMN: &str = "Code";
const YEAR_COLUMN: &str = "Year";

struct Columns {
    entity: usize,
    code: Option<usize>,
    year: Option<usize>,
    metric: usize,
}

impl Columns {
    fn locate(headers: &StringRecord, metric_column: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);

        Ok(Self {
            entity: find(ENTITY_COLUMN)
                .ok_or_else(|| anyhow!("missing `{ENTITY_COLUMN}` column"))?,
            code: find(CODE_COLUMN),
            year: find(YEAR_COLUMN),
            metric: find(metric_column)
                .ok_or_else(|| anyhow!("missing metric column `{metric_column}`"))?,
        })
    }
}

pub fn load_records(path: &Path, metric_column: &str) -> Result<Vec<SourceRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let records = parse_records(file, metric_column)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "dataset read");
    Ok(records)
}

/// Reads every row. Rows without an entity name are skipped; an unreadable metric becomes `None`.
pub fn parse_records(reader: impl Read, metric_column: &str) -> Result<Vec<SourceRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let columns = Columns::locate(&headers, metric_column)?;

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("malformed CSV row {}", line + 2))?;
        let Some(name) = row.get(columns.entity).filter(|name| !name.is_empty()) else {
            continue;
        };

        let metric = row
            .get(columns.metric)
            .filter(|value| !value.is_empty())
            .and_then(|value| match value.parse::<f32>() {
                Ok(metric) if metric.is_finite() => Some(metric),
                _ => {
                    warn!(entity = name, value, "unreadable metric");
                    None
                }
            });

        records.push(SourceRecord {
            name: name.to_owned(),
            code: columns
                .code
                .and_then(|index| row.get(index))
                .filter(|code| !code.is_empty())
                .map(str::to_owned),
            year: columns
                .year
                .and_then(|index| row.get(index))
                .and_then(|year| year.parse().ok()),
            metric,
        });
    }

    if records.is_empty() {
        return Err(ArtError::EmptyDataset.into());
    }

    Ok(records)
}

/// Keeps one row per entity: rows carrying a metric beat rows without one, then the
/// latest year wins, then the later row. Output is ordered by entity name.
pub fn latest_per_group(records: &[SourceRecord]) -> Vec<SourceRecord> {
    let mut latest: BTreeMap<&str, &SourceRecord> = BTreeMap::new();

    for record in records {
        let replace = latest
            .get(record.name.as_str())
            .is_none_or(|current| recency(record) >= recency(current));
        if replace {
            latest.insert(record.name.as_str(), record);
        }
    }

    latest.into_values().cloned().collect()
}

fn recency(record: &SourceRecord) -> (bool, i32) {
    (record.has_metric(), record.year.unwrap_or(i32::MIN))
}
