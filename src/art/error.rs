use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtError {
    #[error("record `{entity}` has no value for the mapped metric")]
    MissingMetric { entity: String },
    #[error("dataset has no usable records")]
    EmptyDataset,
    #[error("viewport must have a positive size, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}
