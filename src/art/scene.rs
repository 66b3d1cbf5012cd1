use eframe::egui::Pos2;
use tracing::{debug, info};

use super::bounds::Bounds;
use super::config::ArtConfig;
use super::entity::{Entity, spawn_entities};
use super::error::ArtError;
use super::input::{InputEvent, InputQueue};
use super::mapping::MappedDataset;
use super::motion::{FrameInput, MotionField};
use super::selection::{SelectionChange, SelectionController};
use super::tooltip::{TooltipPlacement, TooltipPlacer};

/// Owns the entity set and runs the per-frame pipeline:
/// input, motion, selection easing, tooltip placement.
pub struct Scene {
    entities: Vec<Entity>,
    dropped: Vec<String>,
    bounds: Bounds,
    motion: MotionField,
    selection: SelectionController,
    placer: TooltipPlacer,
    pointer: Option<Pos2>,
    paused: bool,
    tooltip: Option<TooltipPlacement>,
}

impl Scene {
    pub fn new(dataset: MappedDataset, config: &ArtConfig, bounds: Bounds) -> Result<Self, ArtError> {
        if dataset.entries.is_empty() {
            return Err(ArtError::EmptyDataset);
        }

        let entities = spawn_entities(&dataset.entries, bounds, &config.motion, config.seed);
        info!(
            entities = entities.len(),
            dropped = dataset.dropped.len(),
            width = bounds.width(),
            height = bounds.height(),
            "scene ready"
        );

        Ok(Self {
            entities,
            dropped: dataset.dropped,
            bounds,
            motion: MotionField::new(config.motion),
            selection: SelectionController::new(config.selection),
            placer: TooltipPlacer::new(config.tooltip),
            pointer: None,
            paused: false,
            tooltip: None,
        })
    }

    /// Runs one frame. Events the scene does not handle are returned to the caller in order.
    pub fn frame(&mut self, dt: f32, queue: &mut InputQueue) -> Vec<InputEvent> {
        let mut unhandled = Vec::new();

        for event in queue.drain() {
            match event {
                InputEvent::PointerMoved(point) => {
                    self.pointer = (point.x.is_finite() && point.y.is_finite()).then_some(point);
                }
                InputEvent::PointerLeft => self.pointer = None,
                InputEvent::Click(point) => {
                    self.selection.on_click(&mut self.entities, point);
                }
                InputEvent::TogglePause => self.toggle_pause(),
                other => unhandled.push(other),
            }
        }

        self.motion.advance(
            &mut self.entities,
            FrameInput {
                dt,
                pointer: self.pointer,
                paused: self.paused,
            },
            self.bounds,
        );
        self.selection.on_pointer_move(&self.entities, self.pointer);
        self.selection.tick(&mut self.entities, dt);
        self.tooltip = self
            .placer
            .place(self.selection.active_entity(), &self.entities, self.bounds);

        unhandled
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "animation toggled");
    }

    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        debug!(width = bounds.width(), height = bounds.height(), "viewport resized");
        self.bounds = bounds;
        self.motion.contain(&mut self.entities, bounds);
        self.tooltip = self
            .placer
            .place(self.selection.active_entity(), &self.entities, self.bounds);
    }

    pub fn select(&mut self, index: usize) -> SelectionChange {
        self.selection.select(&mut self.entities, index)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        self.selection.on_click_empty(&mut self.entities)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn active_entity(&self) -> Option<&Entity> {
        self.selection
            .active_entity()
            .and_then(|index| self.entities.get(index))
    }

    pub fn hovered(&self) -> Option<usize> {
        self.selection.hovered()
    }

    pub fn tooltip(&self) -> Option<&TooltipPlacement> {
        self.tooltip.as_ref()
    }

    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Attraction keeps running while paused, so a pointer on the canvas counts as motion.
    pub fn is_animating(&self) -> bool {
        !self.paused || self.pointer.is_some() || self.selection.is_animating()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn attraction_radius(&self) -> f32 {
        self.motion.config().attraction_radius
    }

    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.motion.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::config::MotionConfig;
    use crate::art::mapping::{ShapeKind, map_records};
    use crate::data::SourceRecord;

    const DT: f32 = 1.0 / 60.0;

    fn record(name: &str, metric: Option<f32>) -> SourceRecord {
        SourceRecord {
            name: name.to_owned(),
            code: None,
            year: Some(2022),
            metric,
        }
    }

    fn bounds() -> Bounds {
        Bounds::new(1200.0, 800.0).unwrap()
    }

    fn scenario_scene(motion: MotionConfig) -> Scene {
        let dataset = map_records(&[
            record("Chad", Some(0.0)),
            record("Peru", Some(50.0)),
            record("Finland", Some(100.0)),
        ])
        .unwrap();
        let config = ArtConfig {
            motion,
            ..ArtConfig::default()
        };
        let mut scene = Scene::new(dataset, &config, bounds()).unwrap();
        scene.entities[0].position = Pos2::new(150.0, 150.0);
        scene.entities[1].position = Pos2::new(300.0, 650.0);
        scene.entities[2].position = Pos2::new(600.0, 400.0);
        scene
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let result = Scene::new(MappedDataset::default(), &ArtConfig::default(), bounds());
        assert!(matches!(result, Err(ArtError::EmptyDataset)));
    }

    #[test]
    fn three_entity_scenario() {
        let mut scene = scenario_scene(MotionConfig::still());
        let shapes = scene
            .entities()
            .iter()
            .map(|entity| entity.params.shape)
            .collect::<Vec<_>>();
        assert_eq!(
            shapes,
            vec![ShapeKind::Circle, ShapeKind::Square, ShapeKind::Hexagon]
        );
        for (entity, expected) in scene.entities().iter().zip([0.3, 0.65, 1.0]) {
            assert!((entity.params.clarity - expected).abs() < 1e-5);
        }

        let mut queue = InputQueue::new();
        queue.push(InputEvent::Click(Pos2::new(600.0, 400.0)));
        scene.frame(DT, &mut queue);
        for _ in 0..30 {
            scene.frame(DT, &mut queue);
        }

        let active = scene.active_entity().unwrap();
        assert_eq!(active.name(), "Finland");
        assert_eq!(active.scale, 2.0);

        let tooltip = scene.tooltip().unwrap();
        assert!(!tooltip.forced);
        for entity in scene.entities().iter().filter(|entity| !entity.selected) {
            assert!(!entity.bounding_rect().intersects(tooltip.rect()));
        }
        assert_eq!(
            scene.entities().iter().filter(|entity| entity.selected).count(),
            1
        );
    }

    #[test]
    fn stationary_pointer_pulls_entity_in() {
        let dataset = map_records(&[record("Solo", Some(40.0))]).unwrap();
        let config = ArtConfig {
            motion: MotionConfig::still(),
            ..ArtConfig::default()
        };
        let mut scene = Scene::new(dataset, &config, bounds()).unwrap();
        scene.entities[0].position = Pos2::new(500.0, 400.0);
        let pointer = Pos2::new(600.0, 400.0);

        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerMoved(pointer));
        let start = scene.entities()[0].position.distance(pointer);
        let mut distance = start;
        for _ in 0..1500 {
            scene.frame(DT, &mut queue);
            distance = scene.entities()[0].position.distance(pointer);
            assert!(distance <= start + 0.5);
        }

        assert!(distance < 1.0);
        assert!(scene.entities()[0].influence > 0.99);
    }

    #[test]
    fn pause_freezes_drift_but_keeps_selection_working() {
        let mut scene = scenario_scene(MotionConfig::default());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::TogglePause);
        scene.frame(DT, &mut queue);
        assert!(scene.paused());

        let before = scene
            .entities()
            .iter()
            .map(|entity| entity.position)
            .collect::<Vec<_>>();
        let elapsed = scene.elapsed_ms();
        queue.push(InputEvent::Click(Pos2::new(300.0, 650.0)));
        for _ in 0..60 {
            scene.frame(DT, &mut queue);
        }

        let after = scene
            .entities()
            .iter()
            .map(|entity| entity.position)
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(scene.elapsed_ms(), elapsed);
        assert_eq!(scene.active_entity().unwrap().name(), "Peru");
        assert_eq!(scene.active_entity().unwrap().scale, 2.0);
    }

    #[test]
    fn paused_scene_idles_until_something_moves() {
        let mut scene = scenario_scene(MotionConfig::default());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::TogglePause);
        scene.frame(DT, &mut queue);
        assert!(!scene.is_animating());

        queue.push(InputEvent::Click(Pos2::new(300.0, 650.0)));
        scene.frame(DT, &mut queue);
        assert!(scene.is_animating());
        for _ in 0..60 {
            scene.frame(DT, &mut queue);
        }
        assert!(!scene.is_animating());

        queue.push(InputEvent::PointerMoved(Pos2::new(600.0, 400.0)));
        scene.frame(DT, &mut queue);
        assert!(scene.is_animating());
        queue.push(InputEvent::PointerLeft);
        scene.frame(DT, &mut queue);
        assert!(!scene.is_animating());
    }

    #[test]
    fn host_events_are_handed_back_in_order() {
        let mut scene = scenario_scene(MotionConfig::still());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::ToggleInfoPanel);
        queue.push(InputEvent::PointerMoved(Pos2::new(10.0, 10.0)));
        queue.push(InputEvent::Screenshot);
        queue.push(InputEvent::Quit);

        let unhandled = scene.frame(DT, &mut queue);

        assert_eq!(
            unhandled,
            vec![
                InputEvent::ToggleInfoPanel,
                InputEvent::Screenshot,
                InputEvent::Quit
            ]
        );
        assert!(queue.is_empty());
        assert_eq!(scene.pointer(), Some(Pos2::new(10.0, 10.0)));
    }

    #[test]
    fn clicking_empty_space_removes_tooltip() {
        let mut scene = scenario_scene(MotionConfig::still());
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Click(Pos2::new(600.0, 400.0)));
        scene.frame(DT, &mut queue);
        assert!(scene.tooltip().is_some());

        queue.push(InputEvent::Click(Pos2::new(1000.0, 100.0)));
        scene.frame(DT, &mut queue);

        assert!(scene.tooltip().is_none());
        assert!(scene.active_entity().is_none());
    }

    #[test]
    fn resize_keeps_entities_inside() {
        let mut scene = scenario_scene(MotionConfig::still());
        let smaller = Bounds::new(400.0, 300.0).unwrap();

        scene.resize(smaller);

        let area = smaller.inset(scene.motion.config().boundary_margin);
        for entity in scene.entities() {
            assert!(area.contains(entity.position));
        }
        assert_eq!(scene.bounds(), smaller);
    }
}
