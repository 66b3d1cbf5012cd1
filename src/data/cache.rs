use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::art::{ArtError, MAPPING_RULE_VERSION, MappedDataset, MappedEntry, map_records};

use super::record::SourceRecord;
use super::stats::DatasetStats;

const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    key: String,
    entries: Vec<MappedEntry>,
    #[serde(default)]
    dropped: Vec<String>,
    stats: DatasetStats,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedDataset {
    pub dataset: MappedDataset,
    pub stats: DatasetStats,
    pub from_cache: bool,
}

/// Read-through JSON cache of mapped parameters, keyed by the input records.
#[derive(Clone, Debug)]
pub struct ParamCache {
    path: PathBuf,
}

impl ParamCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// SHA-256 over the mapping rule version and every record, hex encoded.
    pub fn key_for(records: &[SourceRecord]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(CACHE_FORMAT_VERSION.to_le_bytes());
        hasher.update(MAPPING_RULE_VERSION.to_le_bytes());

        for record in records {
            hasher.update(record.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(record.code.as_deref().unwrap_or_default().as_bytes());
            hasher.update([0u8]);
            match record.year {
                Some(year) => hasher.update(year.to_le_bytes()),
                None => hasher.update([0xffu8; 4]),
            }
            match record.metric {
                Some(metric) => hasher.update(metric.to_bits().to_le_bytes()),
                None => hasher.update([0xffu8; 4]),
            }
            hasher.update([0x1eu8]);
        }

        format!("{:x}", hasher.finalize())
    }

    /// Returns the cached mapping when the key matches, otherwise maps the records and
    /// writes the result back. A failed write only costs the next run a recompute.
    pub fn load_or_compute(&self, records: &[SourceRecord]) -> Result<CachedDataset, ArtError> {
        let key = Self::key_for(records);

        if let Some(cached) = self.read(&key) {
            info!(path = %self.path.display(), entries = cached.dataset.entries.len(), "parameter cache hit");
            return Ok(cached);
        }

        let computed = compute_dataset(records)?;
        if let Err(error) = self.write(&key, &computed) {
            warn!(path = %self.path.display(), error = %format!("{error:#}"), "failed to write parameter cache");
        }

        Ok(computed)
    }

    fn read(&self, key: &str) -> Option<CachedDataset> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no parameter cache yet");
                return None;
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "unreadable parameter cache");
                return None;
            }
        };

        let file = match serde_json::from_str::<CacheFile>(&raw) {
            Ok(file) => file,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "corrupt parameter cache");
                return None;
            }
        };

        if file.version != CACHE_FORMAT_VERSION || file.key != key || file.entries.is_empty() {
            info!(path = %self.path.display(), "parameter cache is stale");
            return None;
        }

        Some(CachedDataset {
            dataset: MappedDataset {
                entries: file.entries,
                dropped: file.dropped,
            },
            stats: file.stats,
            from_cache: true,
        })
    }

    fn write(&self, key: &str, computed: &CachedDataset) -> Result<()> {
        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            key: key.to_owned(),
            entries: computed.dataset.entries.clone(),
            dropped: computed.dataset.dropped.clone(),
            stats: computed.stats.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("failed to encode parameter cache")?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), "parameter cache written");
        Ok(())
    }
}

/// Maps the records and aggregates them, bypassing any cache.
pub fn compute_dataset(records: &[SourceRecord]) -> Result<CachedDataset, ArtError> {
    let dataset = map_records(records)?;
    let stats = DatasetStats::from_entries(&dataset.entries).ok_or(ArtError::EmptyDataset)?;

    Ok(CachedDataset {
        dataset,
        stats,
        from_cache: false,
    })
}
