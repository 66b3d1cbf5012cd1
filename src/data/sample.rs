use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::info;

use super::record::SourceRecord;

/// Entities taken first from the top tier when present.
const PRIORITY_ENTITIES: [&str; 11] = [
    "Finland",
    "Norway",
    "Denmark",
    "Germany",
    "Japan",
    "United States",
    "Canada",
    "Australia",
    "United Kingdom",
    "France",
    "Sweden",
];
const MAX_PRIORITY_PICKS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricTier {
    High,
    MediumHigh,
    Medium,
    Low,
}

impl MetricTier {
    pub const ALL: [Self; 4] = [Self::High, Self::MediumHigh, Self::Medium, Self::Low];

    pub fn for_metric(metric: f32) -> Self {
        if metric >= 90.0 {
            Self::High
        } else if metric >= 70.0 {
            Self::MediumHigh
        } else if metric >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn quota(self) -> usize {
        match self {
            Self::High => 15,
            Self::MediumHigh => 12,
            Self::Medium => 10,
            Self::Low => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::MediumHigh => "medium-high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Draws up to [`MetricTier::quota`] records from every tier, highest tier first.
/// Records without a metric pass through untouched so mapping can report them.
pub fn stratified_sample(records: &[SourceRecord], seed: u64) -> Vec<SourceRecord> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut sampled = Vec::new();

    for tier in MetricTier::ALL {
        let members = records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record
                    .metric
                    .filter(|metric| metric.is_finite())
                    .is_some_and(|metric| MetricTier::for_metric(metric) == tier)
            })
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let quota = tier.quota().min(members.len());
        let mut picked = Vec::with_capacity(quota);
        if tier == MetricTier::High {
            picked.extend(
                members
                    .iter()
                    .copied()
                    .filter(|&index| PRIORITY_ENTITIES.contains(&records[index].name.as_str()))
                    .take(MAX_PRIORITY_PICKS.min(quota)),
            );
        }

        let mut rest = members
            .iter()
            .copied()
            .filter(|index| !picked.contains(index))
            .collect::<Vec<_>>();
        rest.shuffle(&mut rng);
        let remaining = quota - picked.len();
        picked.extend(rest.into_iter().take(remaining));
        picked.sort_unstable();

        info!(tier = tier.label(), available = members.len(), kept = picked.len(), "tier sampled");
        sampled.extend(picked.into_iter().map(|index| records[index].clone()));
    }

    sampled.extend(records.iter().filter(|record| !record.has_metric()).cloned());
    sampled
}
