use eframe::egui::{Pos2, Rect, Vec2, vec2};
use tracing::debug;

use super::bounds::Bounds;
use super::config::TooltipConfig;
use super::entity::Entity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TooltipDirection {
    Right,
    Left,
    Top,
    Bottom,
}

/// Tried in order; the first candidate that fits wins.
pub const PLACEMENT_ORDER: [TooltipDirection; 4] = [
    TooltipDirection::Right,
    TooltipDirection::Left,
    TooltipDirection::Top,
    TooltipDirection::Bottom,
];

impl TooltipDirection {
    fn candidate_origin(self, center: Pos2, radius: f32, size: Vec2, gap: f32) -> Pos2 {
        let reach = radius + gap;
        match self {
            Self::Right => Pos2::new(center.x + reach, center.y - size.y * 0.5),
            Self::Left => Pos2::new(center.x - size.x - reach, center.y - size.y * 0.5),
            Self::Top => Pos2::new(center.x - size.x * 0.5, center.y - size.y - reach),
            Self::Bottom => Pos2::new(center.x - size.x * 0.5, center.y + reach),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPlacement {
    pub direction: TooltipDirection,
    pub origin: Pos2,
    pub size: Vec2,
    /// Every candidate collided; this is the clamped first candidate.
    pub forced: bool,
    pub target: Pos2,
}

impl TooltipPlacement {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin, self.size)
    }

    /// Midpoint of the tooltip edge that faces the entity.
    pub fn arrow_base(&self) -> Pos2 {
        let rect = self.rect();
        match self.direction {
            TooltipDirection::Right => rect.left_center(),
            TooltipDirection::Left => rect.right_center(),
            TooltipDirection::Top => rect.center_bottom(),
            TooltipDirection::Bottom => rect.center_top(),
        }
    }

    /// Triangle `[base_a, base_b, tip]` whose tip points at the entity center.
    pub fn arrow(&self, half_width: f32, length: f32) -> [Pos2; 3] {
        let base = self.arrow_base();
        let toward = self.target - base;
        let distance = toward.length();
        let direction = if distance > 0.0001 {
            toward / distance
        } else {
            match self.direction {
                TooltipDirection::Right => vec2(-1.0, 0.0),
                TooltipDirection::Left => vec2(1.0, 0.0),
                TooltipDirection::Top => vec2(0.0, 1.0),
                TooltipDirection::Bottom => vec2(0.0, -1.0),
            }
        };
        let across = direction.rot90() * half_width;
        let tip = base + direction * length.min(distance.max(0.0));
        [base + across, base - across, tip]
    }
}

#[derive(Clone, Debug)]
pub struct TooltipPlacer {
    config: TooltipConfig,
}

impl TooltipPlacer {
    pub fn new(config: TooltipConfig) -> Self {
        Self { config }
    }

    pub fn place(
        &self,
        active: Option<usize>,
        entities: &[Entity],
        viewport: Bounds,
    ) -> Option<TooltipPlacement> {
        let active_index = active?;
        let active = entities.get(active_index)?;

        let size = vec2(self.config.width.max(1.0), self.config.height.max(1.0));
        let area = viewport.inset(self.config.viewport_margin);
        let center = active.position;
        let radius = active.display_radius();

        for direction in PLACEMENT_ORDER {
            let origin = direction.candidate_origin(center, radius, size, self.config.gap);
            let rect = Rect::from_min_size(origin, size);
            if !area.contains_rect(rect) {
                continue;
            }

            let blocked = entities
                .iter()
                .enumerate()
                .any(|(index, other)| index != active_index && other.bounding_rect().intersects(rect));
            if !blocked {
                return Some(TooltipPlacement {
                    direction,
                    origin,
                    size,
                    forced: false,
                    target: center,
                });
            }
        }

        let direction = PLACEMENT_ORDER[0];
        let preferred = direction.candidate_origin(center, radius, size, self.config.gap);
        let origin = Pos2::new(
            preferred
                .x
                .min(area.right() - size.x)
                .max(area.left()),
            preferred
                .y
                .min(area.bottom() - size.y)
                .max(area.top()),
        );
        debug!(entity = active.name(), "no free tooltip slot, clamping");

        Some(TooltipPlacement {
            direction,
            origin,
            size,
            forced: true,
            target: center,
        })
    }
}
