mod cache;
mod ingest;
mod load;
mod record;
mod sample;
mod stats;

pub use load::{LoadOptions, LoadedDataset, load_dataset};
pub use record::SourceRecord;
pub use stats::DatasetStats;
