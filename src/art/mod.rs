mod bounds;
mod config;
mod entity;
mod error;
mod input;
mod mapping;
mod motion;
mod scene;
mod selection;
mod tooltip;

pub use bounds::Bounds;
pub use config::ArtConfig;
pub use entity::Entity;
pub use error::ArtError;
pub use input::{InputEvent, InputQueue};
pub use mapping::{
    FillPattern, MAPPING_RULE_VERSION, MappedDataset, MappedEntry, ShapeKind, VisualParams,
    map_records,
};
pub use scene::Scene;
pub use tooltip::TooltipPlacement;

#[cfg(test)]
pub(crate) use entity::test_entity;
#[cfg(test)]
pub use mapping::map_metric;
