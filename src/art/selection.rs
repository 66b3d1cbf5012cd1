use eframe::egui::Pos2;
use tracing::info;

use super::config::SelectionConfig;
use super::entity::Entity;

const SCALE_EPSILON: f32 = 0.0001;

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScaleTween {
    index: usize,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl ScaleTween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn value(&self) -> f32 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress())
    }

    fn finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Selected {
        index: usize,
        previous: Option<usize>,
    },
    Cleared {
        previous: usize,
    },
}

#[derive(Clone, Debug)]
pub struct SelectionController {
    config: SelectionConfig,
    selected: Option<usize>,
    hovered: Option<usize>,
    tweens: Vec<ScaleTween>,
}

impl SelectionController {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            selected: None,
            hovered: None,
            tweens: Vec::new(),
        }
    }

    pub fn active_entity(&self) -> Option<usize> {
        self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Later entities are drawn on top, so they win when shapes overlap.
    pub fn hit_test(entities: &[Entity], point: Pos2) -> Option<usize> {
        entities
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entity)| entity.contains(point))
            .map(|(index, _)| index)
    }

    pub fn on_pointer_move(&mut self, entities: &[Entity], pointer: Option<Pos2>) {
        self.hovered = pointer.and_then(|point| Self::hit_test(entities, point));
    }

    pub fn on_click(&mut self, entities: &mut [Entity], point: Pos2) -> SelectionChange {
        match Self::hit_test(entities, point) {
            Some(index) => self.select(entities, index),
            None => self.on_click_empty(entities),
        }
    }

    pub fn on_click_empty(&mut self, entities: &mut [Entity]) -> SelectionChange {
        let Some(previous) = self.selected.take() else {
            return SelectionChange::Unchanged;
        };

        if let Some(entity) = entities.get_mut(previous) {
            entity.selected = false;
            info!(entity = entity.name(), "selection cleared");
        }
        self.retarget(entities, previous, 1.0);
        SelectionChange::Cleared { previous }
    }

    pub fn select(&mut self, entities: &mut [Entity], index: usize) -> SelectionChange {
        if index >= entities.len() || self.selected == Some(index) {
            return SelectionChange::Unchanged;
        }

        let previous = self.selected.take();
        if let Some(previous) = previous {
            if let Some(entity) = entities.get_mut(previous) {
                entity.selected = false;
            }
            self.retarget(entities, previous, 1.0);
        }

        entities[index].selected = true;
        self.selected = Some(index);
        self.retarget(entities, index, self.config.selected_scale);

        let entity = &entities[index];
        info!(
            entity = entity.name(),
            metric = entity.metric,
            shape = entity.params.shape.label(),
            "entity selected"
        );
        SelectionChange::Selected { index, previous }
    }

    fn retarget(&mut self, entities: &mut [Entity], index: usize, target: f32) {
        self.tweens.retain(|tween| tween.index != index);
        let Some(entity) = entities.get_mut(index) else {
            return;
        };

        if (entity.scale - target).abs() <= SCALE_EPSILON {
            entity.scale = target;
            return;
        }

        self.tweens.push(ScaleTween {
            index,
            from: entity.scale,
            to: target,
            elapsed: 0.0,
            duration: self.config.animation_secs.max(0.0),
        });
    }

    pub fn tick(&mut self, entities: &mut [Entity], dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.tweens.retain_mut(|tween| {
            tween.elapsed += dt;
            let Some(entity) = entities.get_mut(tween.index) else {
                return false;
            };

            if tween.finished() {
                entity.scale = tween.to;
                false
            } else {
                entity.scale = tween.value();
                true
            }
        });
    }
}
