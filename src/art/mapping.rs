use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::SourceRecord;

use super::error::ArtError;

/// Bumped whenever any mapping rule below changes, which invalidates cached params.
pub const MAPPING_RULE_VERSION: u32 = 2;

const METRIC_MAX: f32 = 100.0;
const SHAPE_BAND_WIDTH: f32 = 20.0;
const HUE_BAND_WIDTH: f32 = 60.0;
const BASE_SIZE_PX: f32 = 30.0;
const GOLDEN_FRACTION: f32 = 0.618_034;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
    Pentagon,
    Hexagon,
}

impl ShapeKind {
    pub const ALL: [Self; 5] = [
        Self::Circle,
        Self::Triangle,
        Self::Square,
        Self::Pentagon,
        Self::Hexagon,
    ];

    /// Bands of width 20; a value sitting on a boundary belongs to the lower band.
    pub fn for_metric(metric: f32) -> Self {
        let metric = clamp_metric(metric);
        if metric <= 20.0 {
            Self::Circle
        } else if metric <= 40.0 {
            Self::Triangle
        } else if metric <= 60.0 {
            Self::Square
        } else if metric <= 80.0 {
            Self::Pentagon
        } else {
            Self::Hexagon
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Square => "Square",
            Self::Pentagon => "Pentagon",
            Self::Hexagon => "Hexagon",
        }
    }

    pub fn sides(self) -> Option<usize> {
        match self {
            Self::Circle => None,
            Self::Triangle => Some(3),
            Self::Square => Some(4),
            Self::Pentagon => Some(5),
            Self::Hexagon => Some(6),
        }
    }

    fn metric_band_floor(self) -> f32 {
        match self {
            Self::Circle => 0.0,
            Self::Triangle => 20.0,
            Self::Square => 40.0,
            Self::Pentagon => 60.0,
            Self::Hexagon => 80.0,
        }
    }

    fn hue_band_start(self) -> f32 {
        match self {
            Self::Pentagon => 0.0,
            Self::Hexagon => 60.0,
            Self::Circle => 180.0,
            Self::Triangle => 240.0,
            Self::Square => 300.0,
        }
    }
}

/// Surface treatment, coarser bands than the shape: richer fills for higher metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPattern {
    Solid,
    Outline,
    Dotted,
    Striped,
    Gradient,
}

impl FillPattern {
    /// Lower bounds are inclusive: 30 is outline, 85 is gradient.
    pub fn for_metric(metric: f32) -> Self {
        let metric = clamp_metric(metric);
        if metric >= 85.0 {
            Self::Gradient
        } else if metric >= 70.0 {
            Self::Striped
        } else if metric >= 50.0 {
            Self::Dotted
        } else if metric >= 30.0 {
            Self::Outline
        } else {
            Self::Solid
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Solid => "Solid",
            Self::Outline => "Outline",
            Self::Dotted => "Dotted",
            Self::Striped => "Striped",
            Self::Gradient => "Gradient",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualParams {
    pub shape: ShapeKind,
    pub pattern: FillPattern,
    pub size_base: f32,
    pub speed_scale: f32,
    pub clarity: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub opacity: f32,
    pub wobble: f32,
    pub spin_scale: f32,
}

pub fn clamp_metric(metric: f32) -> f32 {
    if metric.is_nan() {
        return 0.0;
    }
    metric.clamp(0.0, METRIC_MAX)
}

pub fn clarity(metric: f32) -> f32 {
    (0.3 + (clamp_metric(metric) / METRIC_MAX) * 0.7).clamp(0.3, 1.0)
}

pub fn map_metric(metric: f32, index: usize) -> VisualParams {
    let metric = clamp_metric(metric);
    let t = metric / METRIC_MAX;
    let shape = ShapeKind::for_metric(metric);

    let hue = shape_hue(shape, metric, index);
    let (saturation, lightness) = macaron_tone(metric, hue);

    VisualParams {
        shape,
        pattern: FillPattern::for_metric(metric),
        size_base: BASE_SIZE_PX * (0.3 + 0.7 * t) * (0.8 + 0.4 * t),
        speed_scale: 0.5 + 2.0 * (1.0 - t),
        clarity: clarity(metric),
        hue,
        saturation,
        lightness,
        opacity: 0.6 + 0.4 * t,
        wobble: 1.0 - t,
        spin_scale: if metric >= 80.0 { 0.35 } else { 1.0 },
    }
}

fn shape_hue(shape: ShapeKind, metric: f32, index: usize) -> f32 {
    let within_band = ((metric - shape.metric_band_floor()) / SHAPE_BAND_WIDTH).clamp(0.0, 1.0);
    let jitter = (index as f32 * GOLDEN_FRACTION).fract();
    let offset = HUE_BAND_WIDTH * (0.8 * within_band + 0.2 * jitter);
    (shape.hue_band_start() + offset.min(HUE_BAND_WIDTH * 0.9999)).rem_euclid(360.0)
}

fn macaron_tone(metric: f32, hue: f32) -> (f32, f32) {
    let (mut saturation, mut lightness) = if metric >= 90.0 {
        (0.95, 0.72)
    } else if metric >= 70.0 {
        (0.92, 0.68)
    } else if metric >= 50.0 {
        (0.88, 0.63)
    } else {
        (0.85, 0.58)
    };

    saturation *= if hue < 60.0 {
        1.08
    } else if hue < 120.0 {
        lightness *= 1.03;
        1.06
    } else if hue < 180.0 {
        1.05
    } else if hue < 240.0 {
        1.07
    } else if hue < 300.0 {
        1.12
    } else {
        1.10
    };

    (
        f32::clamp(saturation, 0.6, 1.0),
        f32::clamp(lightness, 0.45, 0.85),
    )
}

pub fn map_record(record: &SourceRecord, index: usize) -> Result<VisualParams, ArtError> {
    match record.metric {
        Some(metric) if metric.is_finite() => Ok(map_metric(metric, index)),
        _ => Err(ArtError::MissingMetric {
            entity: record.name.clone(),
        }),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappedEntry {
    pub record: SourceRecord,
    pub params: VisualParams,
}

impl MappedEntry {
    /// Metric as rendered, after clamping into range.
    pub fn metric(&self) -> f32 {
        clamp_metric(self.record.metric.unwrap_or_default())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MappedDataset {
    pub entries: Vec<MappedEntry>,
    pub dropped: Vec<String>,
}

/// Records without a metric are dropped with a warning; an all-dropped set is an error.
pub fn map_records(records: &[SourceRecord]) -> Result<MappedDataset, ArtError> {
    let mut dataset = MappedDataset::default();

    for (index, record) in records.iter().enumerate() {
        match map_record(record, index) {
            Ok(params) => dataset.entries.push(MappedEntry {
                record: record.clone(),
                params,
            }),
            Err(error) => {
                warn!(%error, "dropping record");
                dataset.dropped.push(record.name.clone());
            }
        }
    }

    if dataset.entries.is_empty() {
        return Err(ArtError::EmptyDataset);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, metric: Option<f32>) -> SourceRecord {
        SourceRecord {
            name: name.to_owned(),
            code: None,
            year: Some(2020),
            metric,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn mapping_is_deterministic() {
        for step in 0..=200 {
            let metric = step as f32 * 0.5;
            let first = map_metric(metric, 17);
            let second = map_metric(metric, 17);
            assert_eq!(first.clarity.to_bits(), second.clarity.to_bits());
            assert_eq!(first.hue.to_bits(), second.hue.to_bits());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn clarity_boundaries_and_monotonicity() {
        assert!(approx(clarity(0.0), 0.3));
        assert!(approx(clarity(50.0), 0.65));
        assert!(approx(clarity(100.0), 1.0));

        let mut previous = clarity(0.0);
        for step in 1..=1000 {
            let current = clarity(step as f32 * 0.1);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn out_of_range_metrics_are_clamped() {
        assert_eq!(map_metric(-10.0, 3), map_metric(0.0, 3));
        assert_eq!(map_metric(110.0, 3), map_metric(100.0, 3));
    }

    #[test]
    fn shape_bands_resolve_ties_downward() {
        assert_eq!(ShapeKind::for_metric(0.0), ShapeKind::Circle);
        assert_eq!(ShapeKind::for_metric(20.0), ShapeKind::Circle);
        assert_eq!(ShapeKind::for_metric(20.5), ShapeKind::Triangle);
        assert_eq!(ShapeKind::for_metric(40.0), ShapeKind::Triangle);
        assert_eq!(ShapeKind::for_metric(60.0), ShapeKind::Square);
        assert_eq!(ShapeKind::for_metric(80.0), ShapeKind::Pentagon);
        assert_eq!(ShapeKind::for_metric(80.1), ShapeKind::Hexagon);
        assert_eq!(ShapeKind::for_metric(100.0), ShapeKind::Hexagon);
    }

    #[test]
    fn pattern_bands_include_their_lower_edge() {
        assert_eq!(FillPattern::for_metric(-5.0), FillPattern::Solid);
        assert_eq!(FillPattern::for_metric(29.9), FillPattern::Solid);
        assert_eq!(FillPattern::for_metric(30.0), FillPattern::Outline);
        assert_eq!(FillPattern::for_metric(49.9), FillPattern::Outline);
        assert_eq!(FillPattern::for_metric(50.0), FillPattern::Dotted);
        assert_eq!(FillPattern::for_metric(70.0), FillPattern::Striped);
        assert_eq!(FillPattern::for_metric(84.9), FillPattern::Striped);
        assert_eq!(FillPattern::for_metric(85.0), FillPattern::Gradient);
        assert_eq!(FillPattern::for_metric(120.0), FillPattern::Gradient);
        assert_eq!(map_metric(72.0, 4).pattern, FillPattern::Striped);
    }

    #[test]
    fn color_stays_inside_shape_band_and_palette() {
        for index in 0..12 {
            for step in 0..=100 {
                let params = map_metric(step as f32, index);
                let start = params.shape.hue_band_start();
                assert!(params.hue >= start && params.hue < start + HUE_BAND_WIDTH);
                assert!(params.hue < 360.0);
                assert!((0.6..=1.0).contains(&params.saturation));
                assert!((0.45..=0.85).contains(&params.lightness));
            }
        }
    }

    #[test]
    fn higher_metric_is_larger_and_calmer() {
        let mut previous = map_metric(0.0, 0);
        for step in 1..=100 {
            let current = map_metric(step as f32, 0);
            assert!(current.size_base > previous.size_base);
            assert!(current.speed_scale <= previous.speed_scale);
            assert!(current.speed_scale > 0.0);
            assert!(current.wobble <= previous.wobble);
            previous = current;
        }
    }

    #[test]
    fn three_entity_scenario() {
        let low = map_metric(0.0, 0);
        let mid = map_metric(50.0, 1);
        let high = map_metric(100.0, 2);

        assert!(approx(low.clarity, 0.3));
        assert!(approx(mid.clarity, 0.65));
        assert!(approx(high.clarity, 1.0));
        assert!(low.size_base < mid.size_base && mid.size_base < high.size_base);
    }

    #[test]
    fn missing_metric_is_an_error_not_zero() {
        let error = map_record(&record("Atlantis", None), 0).unwrap_err();
        assert_eq!(
            error,
            ArtError::MissingMetric {
                entity: "Atlantis".to_owned()
            }
        );
        assert!(map_record(&record("Nowhere", Some(f32::NAN)), 0).is_err());
    }

    #[test]
    fn map_records_drops_missing_and_rejects_empty() {
        let records = vec![
            record("Finland", Some(99.0)),
            record("Atlantis", None),
            record("Chad", Some(22.3)),
        ];
        let dataset = map_records(&records).unwrap();
        assert_eq!(dataset.entries.len(), 2);
        assert_eq!(dataset.dropped, vec!["Atlantis".to_owned()]);
        assert_eq!(dataset.entries[1].params, map_metric(22.3, 2));

        let empty = map_records(&[record("Atlantis", None)]).unwrap_err();
        assert_eq!(empty, ArtError::EmptyDataset);
        assert_eq!(map_records(&[]).unwrap_err(), ArtError::EmptyDataset);
    }
}
