use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::art::{MappedEntry, ShapeKind};

/// Aggregates over the mapped metric, shown in the info panel and stored with the cache.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub count: usize,
    pub mean: f32,
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub shape_distribution: BTreeMap<ShapeKind, usize>,
}

impl DatasetStats {
    pub fn from_entries(entries: &[MappedEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let mut metrics = entries
            .iter()
            .map(|entry| f64::from(entry.metric()))
            .collect::<Vec<_>>();
        metrics.sort_by(f64::total_cmp);

        let count = metrics.len();
        let mean = metrics.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (metrics[count / 2 - 1] + metrics[count / 2]) / 2.0
        } else {
            metrics[count / 2]
        };
        let variance = metrics
            .iter()
            .map(|metric| (metric - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        let mut shape_distribution = BTreeMap::new();
        for entry in entries {
            *shape_distribution.entry(entry.params.shape).or_insert(0) += 1;
        }

        Some(Self {
            count,
            mean: mean as f32,
            median: median as f32,
            std_dev: variance.sqrt() as f32,
            min: metrics[0] as f32,
            max: metrics[count - 1] as f32,
            shape_distribution,
        })
    }

    pub fn shape_count(&self, shape: ShapeKind) -> usize {
        self.shape_distribution.get(&shape).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::map_records;
    use crate::data::SourceRecord;

    fn entries(metrics: &[f32]) -> Vec<MappedEntry> {
        let records = metrics
            .iter()
            .enumerate()
            .map(|(index, &metric)| SourceRecord {
                name: format!("E{index}"),
                code: None,
                year: None,
                metric: Some(metric),
            })
            .collect::<Vec<_>>();
        map_records(&records).unwrap().entries
    }

    #[test]
    fn empty_input_has_no_stats() {
        assert_eq!(DatasetStats::from_entries(&[]), None);
    }

    #[test]
    fn aggregates_match_hand_computation() {
        let stats = DatasetStats::from_entries(&entries(&[10.0, 90.0, 50.0, 30.0])).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 45.0);
        assert_eq!(stats.median, 40.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 90.0);
        assert!((stats.std_dev - 29.580_4).abs() < 1e-3);
    }

    #[test]
    fn odd_count_median_and_clamped_values() {
        let stats = DatasetStats::from_entries(&entries(&[120.0, -5.0, 60.0])).unwrap();

        assert_eq!(stats.median, 60.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn shape_distribution_counts_every_entry() {
        let stats = DatasetStats::from_entries(&entries(&[5.0, 15.0, 45.0, 95.0, 100.0])).unwrap();

        assert_eq!(stats.shape_count(ShapeKind::Circle), 2);
        assert_eq!(stats.shape_count(ShapeKind::Square), 1);
        assert_eq!(stats.shape_count(ShapeKind::Hexagon), 2);
        assert_eq!(stats.shape_count(ShapeKind::Triangle), 0);
        assert_eq!(stats.shape_distribution.values().sum::<usize>(), 5);
    }
}
