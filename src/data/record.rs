use serde::{Deserialize, Serialize};

/// One input row: an entity and its latest observed metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub metric: Option<f32>,
}

impl SourceRecord {
    pub fn has_metric(&self) -> bool {
        self.metric.is_some_and(f32::is_finite)
    }
}
