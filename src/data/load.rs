use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use super::cache::{CachedDataset, ParamCache, compute_dataset};
use super::ingest::{latest_per_group, load_records};
use super::sample::stratified_sample;

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub data_path: PathBuf,
    pub metric_column: String,
    pub cache_path: Option<PathBuf>,
    /// Seed for stratified sampling; `None` keeps every entity.
    pub sample_seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct LoadedDataset {
    pub cached: CachedDataset,
    pub source_rows: usize,
    pub entity_groups: usize,
}

/// Read, reduce to one row per entity, optionally sample, then map through the cache.
pub fn load_dataset(options: &LoadOptions) -> Result<LoadedDataset> {
    let rows = load_records(&options.data_path, &options.metric_column)?;
    let latest = latest_per_group(&rows);
    let entity_groups = latest.len();

    let records = match options.sample_seed {
        Some(seed) => stratified_sample(&latest, seed),
        None => latest,
    };

    let cached = match &options.cache_path {
        Some(path) => ParamCache::new(path).load_or_compute(&records),
        None => compute_dataset(&records),
    }
    .with_context(|| format!("failed to map {}", options.data_path.display()))?;

    info!(
        rows = rows.len(),
        groups = entity_groups,
        entities = cached.dataset.entries.len(),
        dropped = cached.dataset.dropped.len(),
        from_cache = cached.from_cache,
        "dataset loaded"
    );

    Ok(LoadedDataset {
        cached,
        source_rows: rows.len(),
        entity_groups,
    })
}
