use std::f32::consts::{PI, TAU};

use eframe::egui::{Pos2, Rect, Vec2, vec2};

use super::bounds::Bounds;
use super::config::MotionConfig;
use super::entity::Entity;

const MIN_ATTRACTION_DISTANCE: f32 = 0.0001;
const MIN_SLEEP_SPEED_SQ: f32 = 0.01 * 0.01;
/// A slow entity this close to the pointer is placed on it and comes to rest.
const ARRIVAL_SNAP_DISTANCE: f32 = 0.05;

/// Everything an entity may observe during one frame. Taken once, shared by all entities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub dt: f32,
    pub pointer: Option<Pos2>,
    pub paused: bool,
}

#[derive(Clone, Debug)]
pub struct MotionField {
    config: MotionConfig,
    elapsed_ms: f64,
}

impl MotionField {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            elapsed_ms: 0.0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn advance(&mut self, entities: &mut [Entity], frame: FrameInput, bounds: Bounds) {
        let config = self.config;
        let dt = if frame.dt.is_finite() {
            frame.dt.max(0.0)
        } else {
            0.0
        };
        let time_step_scale = (dt * 60.0).clamp(0.0, config.max_time_scale.max(0.0));
        let pointer = frame
            .pointer
            .filter(|pointer| pointer.x.is_finite() && pointer.y.is_finite());
        let ambient = !frame.paused;
        if ambient {
            self.elapsed_ms += f64::from(dt) * 1000.0;
        }

        let area = bounds.inset(config.boundary_margin);
        let drift_extent = bounds.width().min(bounds.height());
        let damping_factor = config.damping.clamp(0.0, 1.0).powf(time_step_scale);
        let max_speed = config.max_speed.max(0.0);
        let max_speed_sq = max_speed * max_speed;
        let restitution = config.bounce_restitution.clamp(0.0, 1.0);

        for entity in entities.iter_mut() {
            if ambient {
                entity.heading = (entity.heading + entity.heading_rate * dt).rem_euclid(TAU);
                let direction = vec2(entity.heading.cos(), entity.heading.sin());
                let drift = entity.drift_speed
                    * entity.params.speed_scale
                    * config.base_movement_factor
                    * drift_extent
                    * time_step_scale;
                entity.position += direction * drift;
                entity.position += self.oscillation(entity) * time_step_scale;
                entity.rotation = (entity.rotation
                    + entity.angular_velocity * entity.params.spin_scale * time_step_scale)
                    .rem_euclid(360.0);
            }

            let (force, influence) = match pointer {
                Some(pointer) => self.attraction(entity.position, pointer),
                None => (Vec2::ZERO, 0.0),
            };
            entity.influence = influence;

            let mut velocity = (entity.velocity + force * time_step_scale) * damping_factor;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= max_speed / speed_sq.sqrt();
            }
            if velocity.length_sq() < MIN_SLEEP_SPEED_SQ {
                match pointer.filter(|_| influence > 0.0) {
                    Some(pointer) if entity.position.distance(pointer) <= ARRIVAL_SNAP_DISTANCE => {
                        entity.position = pointer;
                        velocity = Vec2::ZERO;
                    }
                    // Still being pulled in; sleeping here would strand it short of the pointer.
                    Some(_) => {}
                    None => velocity = Vec2::ZERO,
                }
            }

            entity.velocity = velocity;
            entity.position += velocity * time_step_scale;

            reflect_at_bounds(entity, area, restitution);
        }
    }

    fn oscillation(&self, entity: &Entity) -> Vec2 {
        let amplitude = self.config.oscillation_amplitude * entity.params.wobble;
        if amplitude == 0.0 {
            return Vec2::ZERO;
        }

        let angle = self.elapsed_ms
            * f64::from(self.config.oscillation_factor)
            * f64::from(entity.frequency);
        let x = (angle + f64::from(entity.phase.x)).sin() as f32;
        let y = (angle * 1.3 + f64::from(entity.phase.y)).cos() as f32;
        vec2(x, y) * amplitude
    }

    /// Cubic falloff toward the radius edge, faded to zero inside the arrival radius.
    pub fn attraction(&self, position: Pos2, pointer: Pos2) -> (Vec2, f32) {
        let radius = self.config.attraction_radius;
        let delta = pointer - position;
        let distance = delta.length();
        if !distance.is_finite() || radius <= 0.0 || distance >= radius {
            return (Vec2::ZERO, 0.0);
        }
        if distance <= MIN_ATTRACTION_DISTANCE {
            return (Vec2::ZERO, 1.0);
        }

        let falloff = (1.0 - distance / radius).powi(3);
        let arrival = if self.config.arrival_radius > 0.0 {
            (distance / self.config.arrival_radius).min(1.0)
        } else {
            1.0
        };
        let direction = delta / distance;
        (
            direction * (self.config.attraction_strength * falloff * arrival),
            falloff,
        )
    }

    /// Keeps entities inside a resized viewport without touching their velocity.
    pub fn contain(&self, entities: &mut [Entity], bounds: Bounds) {
        let area = bounds.inset(self.config.boundary_margin);
        for entity in entities {
            entity.position = area.clamp(entity.position);
        }
    }
}

fn reflect_at_bounds(entity: &mut Entity, area: Rect, restitution: f32) {
    if entity.position.x < area.left() || entity.position.x > area.right() {
        let inward = if entity.position.x < area.left() {
            1.0
        } else {
            -1.0
        };
        entity.velocity.x = entity.velocity.x.abs() * restitution * inward;
        if entity.heading.cos() * inward < 0.0 {
            entity.heading = (PI - entity.heading).rem_euclid(TAU);
        }
        entity.position.x = entity.position.x.clamp(area.left(), area.right());
    }

    if entity.position.y < area.top() || entity.position.y > area.bottom() {
        let inward = if entity.position.y < area.top() {
            1.0
        } else {
            -1.0
        };
        entity.velocity.y = entity.velocity.y.abs() * restitution * inward;
        if entity.heading.sin() * inward < 0.0 {
            entity.heading = (-entity.heading).rem_euclid(TAU);
        }
        entity.position.y = entity.position.y.clamp(area.top(), area.bottom());
    }
}
