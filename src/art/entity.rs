use std::f32::consts::TAU;

use eframe::egui::{Pos2, Rect, Vec2, vec2};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::data::SourceRecord;

use super::bounds::Bounds;
use super::config::MotionConfig;
use super::mapping::{MappedEntry, VisualParams};

const POINTER_SWELL: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct Entity {
    pub record: SourceRecord,
    pub metric: f32,
    pub params: VisualParams,
    pub position: Pos2,
    /// Momentum from pointer attraction, pixels per nominal frame.
    pub velocity: Vec2,
    pub heading: f32,
    pub heading_rate: f32,
    pub drift_speed: f32,
    /// Oscillation offsets for the x and y axes.
    pub phase: Vec2,
    pub frequency: f32,
    /// Degrees; only the renderer reads this.
    pub rotation: f32,
    pub angular_velocity: f32,
    pub scale: f32,
    pub selected: bool,
    pub influence: f32,
}

impl Entity {
    pub fn spawn(
        entry: &MappedEntry,
        bounds: Bounds,
        config: &MotionConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let metric = entry.metric();
        let t = metric / 100.0;
        let area = bounds.inset(config.boundary_margin);
        let position = Pos2::new(
            sample_span(rng, area.left(), area.right()),
            sample_span(rng, area.top(), area.bottom()),
        );
        let heading_limit = config.max_heading_rate.abs();

        Self {
            record: entry.record.clone(),
            metric,
            params: entry.params,
            position,
            velocity: Vec2::ZERO,
            heading: rng.gen_range(0.0..TAU),
            heading_rate: sample_span(rng, -heading_limit, heading_limit),
            drift_speed: rng.gen_range(0.35..1.0),
            phase: vec2(rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)),
            frequency: 0.5 + 1.5 * t,
            rotation: rng.gen_range(0.0..360.0),
            angular_velocity: rng.gen_range(-3.0..3.0),
            scale: 1.0,
            selected: false,
            influence: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Current on-screen radius including the click animation.
    pub fn radius(&self) -> f32 {
        self.params.size_base * self.scale
    }

    /// Radius as drawn: the click scale plus a swell of up to 30% while the pointer is near.
    pub fn display_radius(&self) -> f32 {
        self.radius() * (1.0 + self.influence.clamp(0.0, 1.0) * POINTER_SWELL)
    }

    pub fn bounding_rect(&self) -> Rect {
        let radius = self.display_radius();
        Rect::from_center_size(self.position, vec2(radius * 2.0, radius * 2.0))
    }

    /// Hit test against the drawn circle, so the rim of a swollen shape still counts.
    pub fn contains(&self, point: Pos2) -> bool {
        let radius = self.display_radius();
        self.position.distance_sq(point) <= radius * radius
    }
}

fn sample_span(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    if high - low <= f32::EPSILON {
        return (low + high) * 0.5;
    }
    rng.gen_range(low..high)
}

/// Entities are created once per session, in dataset order, from a seeded generator.
pub fn spawn_entities(
    entries: &[MappedEntry],
    bounds: Bounds,
    config: &MotionConfig,
    seed: u64,
) -> Vec<Entity> {
    let mut rng = SmallRng::seed_from_u64(seed);
    entries
        .iter()
        .map(|entry| Entity::spawn(entry, bounds, config, &mut rng))
        .collect()
}

#[cfg(test)]
pub(crate) fn test_entity(name: &str, metric: f32, position: Pos2) -> Entity {
    let entry = MappedEntry {
        record: SourceRecord {
            name: name.to_owned(),
            code: None,
            year: None,
            metric: Some(metric),
        },
        params: super::mapping::map_metric(metric, 0),
    };
    let bounds = Bounds::new(1200.0, 800.0).expect("valid test bounds");
    let mut entity = Entity::spawn(
        &entry,
        bounds,
        &MotionConfig::default(),
        &mut SmallRng::seed_from_u64(0),
    );
    entity.position = position;
    entity.heading_rate = 0.0;
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::mapping::map_metric;

    fn entry(name: &str, metric: f32, index: usize) -> MappedEntry {
        MappedEntry {
            record: SourceRecord {
                name: name.to_owned(),
                code: None,
                year: None,
                metric: Some(metric),
            },
            params: map_metric(metric, index),
        }
    }

    #[test]
    fn seeded_spawn_is_reproducible() {
        let entries = vec![entry("A", 10.0, 0), entry("B", 95.0, 1)];
        let bounds = Bounds::new(800.0, 600.0).unwrap();
        let config = MotionConfig::default();

        let first = spawn_entities(&entries, bounds, &config, 42);
        let second = spawn_entities(&entries, bounds, &config, 42);
        let other = spawn_entities(&entries, bounds, &config, 43);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.phase, b.phase);
            assert_eq!(a.heading, b.heading);
        }
        assert_ne!(first[0].phase, other[0].phase);
    }

    #[test]
    fn spawned_entities_start_idle_inside_bounds() {
        let entries = (0..40)
            .map(|index| entry("X", index as f32 * 2.5, index))
            .collect::<Vec<_>>();
        let bounds = Bounds::new(300.0, 200.0).unwrap();
        let config = MotionConfig::default();
        let area = bounds.inset(config.boundary_margin);

        for entity in spawn_entities(&entries, bounds, &config, 1) {
            assert!(area.contains(entity.position));
            assert_eq!(entity.scale, 1.0);
            assert!(!entity.selected);
            assert_eq!(entity.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn hit_area_follows_scale() {
        let bounds = Bounds::new(300.0, 200.0).unwrap();
        let mut entity = Entity::spawn(
            &entry("A", 100.0, 0),
            bounds,
            &MotionConfig::default(),
            &mut SmallRng::seed_from_u64(0),
        );
        entity.position = Pos2::new(100.0, 100.0);
        let point = Pos2::new(100.0 + entity.params.size_base * 1.5, 100.0);

        assert!(!entity.contains(point));
        entity.scale = 2.0;
        assert!(entity.contains(point));
        assert_eq!(entity.bounding_rect().width(), entity.params.size_base * 4.0);
    }

    #[test]
    fn pointer_swell_extends_hit_area() {
        let bounds = Bounds::new(300.0, 200.0).unwrap();
        let mut entity = Entity::spawn(
            &entry("A", 60.0, 0),
            bounds,
            &MotionConfig::default(),
            &mut SmallRng::seed_from_u64(0),
        );
        entity.position = Pos2::new(100.0, 100.0);
        let rim = Pos2::new(100.0 + entity.radius() * 1.2, 100.0);

        assert!(!entity.contains(rim));
        entity.influence = 1.0;
        assert!((entity.display_radius() - entity.radius() * 1.3).abs() < 1e-4);
        assert!(entity.contains(rim));
        assert!(entity.bounding_rect().contains(rim));
    }
}
