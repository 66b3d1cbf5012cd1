use std::f32::consts::TAU;

use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, vec2};

use crate::art::{Entity, FillPattern, ShapeKind, VisualParams};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(248, 250, 252);
pub(super) const TOOLTIP_FILL: Color32 = Color32::from_rgba_premultiplied(23, 26, 33, 240);
pub(super) const TOOLTIP_BORDER: Color32 = Color32::from_rgb(135, 206, 235);
pub(super) const INK: Color32 = Color32::from_rgb(45, 55, 70);
pub(super) const MUTED_INK: Color32 = Color32::from_rgb(120, 130, 140);

const MAX_BLUR_PX: f32 = 8.0;
const CIRCLE_SEGMENTS: usize = 48;
const GRADIENT_RINGS: usize = 4;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// HSL to RGB, darkened for a light background: lightness is scaled by 0.6 and capped at 0.7.
pub(super) fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = (lightness * 0.6).clamp(0.0, 0.7);

    if s <= 0.0 {
        let gray = (l * 255.0) as u8;
        return Color32::from_rgb(gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let value = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (value.clamp(0.0, 1.0) * 255.0) as u8
    };

    Color32::from_rgb(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

pub(super) fn base_color(params: &VisualParams) -> Color32 {
    hsl_to_rgb(params.hue, params.saturation, params.lightness)
}

/// Blur radius in whole pixels for a clarity value.
pub(super) fn blur_radius_px(clarity: f32) -> u8 {
    ((1.0 - clarity.clamp(0.0, 1.0)) * MAX_BLUR_PX).round() as u8
}

/// Clarity after interaction: the pointer sharpens an entity, selection makes it fully clear.
pub(super) fn effective_clarity(entity: &Entity) -> f32 {
    if entity.selected {
        1.0
    } else {
        (entity.params.clarity + entity.influence * 0.3).min(1.0)
    }
}

/// Opacity as drawn: brightened by up to half again under the pointer, then faded by clarity.
pub(super) fn effective_alpha(entity: &Entity) -> f32 {
    let boosted = (entity.params.opacity * (1.0 + entity.influence * 0.5)).min(1.0);
    boosted * effective_clarity(entity)
}

/// Color bands for metric values, as used in the panel and tooltip.
pub(super) fn metric_color(metric: f32) -> Color32 {
    if metric >= 90.0 {
        Color32::from_rgb(76, 175, 80)
    } else if metric >= 70.0 {
        Color32::from_rgb(255, 152, 0)
    } else {
        Color32::from_rgb(244, 67, 54)
    }
}

pub(super) fn tooltip_metric_color(metric: f32) -> Color32 {
    if metric >= 90.0 {
        Color32::from_rgb(120, 220, 120)
    } else if metric >= 70.0 {
        Color32::from_rgb(220, 200, 120)
    } else {
        Color32::from_rgb(220, 140, 120)
    }
}

pub(super) fn fps_color(fps: f32) -> Color32 {
    if fps >= 50.0 {
        Color32::from_rgb(76, 175, 80)
    } else if fps >= 30.0 {
        Color32::from_rgb(255, 152, 0)
    } else {
        Color32::from_rgb(244, 67, 54)
    }
}

/// Regular polygon vertices, first vertex pointing up before rotation.
pub(super) fn polygon_points(center: Pos2, radius: f32, sides: usize, rotation_deg: f32) -> Vec<Pos2> {
    let sides = sides.max(3);
    let start = rotation_deg.to_radians() - TAU / 4.0;
    (0..sides)
        .map(|index| {
            let angle = start + TAU * index as f32 / sides as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

pub(super) struct ShapeStyle {
    pub shape: ShapeKind,
    pub pattern: FillPattern,
    pub rotation_deg: f32,
    /// Opaque base color; `alpha` is applied on top.
    pub color: Color32,
    pub alpha: f32,
    pub clarity: f32,
}

/// Draws one entity. Blur is approximated by stacked translucent halos that widen with the radius.
pub(super) fn draw_shape(painter: &Painter, style: &ShapeStyle, center: Pos2, radius: f32) {
    for layer in (1..=blur_radius_px(style.clarity)).rev() {
        paint_pattern(painter, style, center, radius, f32::from(layer), style.alpha * 0.12);
    }
    paint_pattern(painter, style, center, radius, 0.0, style.alpha);
}

fn paint_pattern(
    painter: &Painter,
    style: &ShapeStyle,
    center: Pos2,
    radius: f32,
    grow: f32,
    alpha: f32,
) {
    let color = with_alpha(style.color, alpha);
    match style.pattern {
        FillPattern::Solid => {
            fill_shape(painter, style.shape, center, radius + grow, style.rotation_deg, color);
        }
        FillPattern::Outline => {
            let width = outline_width(style.clarity) + grow * 2.0;
            outline_shape(
                painter,
                style.shape,
                center,
                radius,
                style.rotation_deg,
                Stroke::new(width, color),
            );
        }
        FillPattern::Dotted => {
            let dot = dot_radius(style.clarity) + grow;
            for position in dot_ring(center, radius, style.clarity) {
                painter.circle_filled(position, dot, color);
            }
            outline_shape(
                painter,
                style.shape,
                center,
                radius,
                style.rotation_deg,
                Stroke::new(1.0 + grow, with_alpha(style.color, alpha * 0.35)),
            );
        }
        FillPattern::Striped => {
            fill_shape(
                painter,
                style.shape,
                center,
                radius + grow,
                style.rotation_deg,
                with_alpha(style.color, alpha * 0.35),
            );
            if grow == 0.0 {
                let outline = outline_points(style.shape, center, radius, style.rotation_deg);
                for segment in stripe_segments(&outline, (radius / 3.0).max(4.0)) {
                    painter.line_segment(segment, Stroke::new(2.0, color));
                }
            }
        }
        FillPattern::Gradient => {
            // Nested translucent fills build up toward the center.
            for ring in 0..GRADIENT_RINGS {
                let ring_radius = (radius + grow) * (1.0 - ring as f32 * 0.18);
                fill_shape(
                    painter,
                    style.shape,
                    center,
                    ring_radius,
                    style.rotation_deg,
                    with_alpha(style.color, alpha * 0.4),
                );
            }
        }
    }
}

fn outline_width(clarity: f32) -> f32 {
    (6.0 * clarity).max(3.0)
}

fn dot_radius(clarity: f32) -> f32 {
    (3.0 * clarity).max(1.0)
}

/// Dots on a ring at 70% of the radius; sharper entities get more of them.
pub(super) fn dot_ring(center: Pos2, radius: f32, clarity: f32) -> Vec<Pos2> {
    let count = ((12.0 * clarity.clamp(0.0, 1.0)) as usize).max(6);
    (0..count)
        .map(|index| {
            let angle = TAU * index as f32 / count as f32;
            center + vec2(angle.cos(), angle.sin()) * radius * 0.7
        })
        .collect()
}

fn outline_points(shape: ShapeKind, center: Pos2, radius: f32, rotation_deg: f32) -> Vec<Pos2> {
    polygon_points(
        center,
        radius,
        shape.sides().unwrap_or(CIRCLE_SEGMENTS),
        rotation_deg,
    )
}

/// Horizontal chords of a convex outline, one every `spacing` pixels starting half a step in.
pub(super) fn stripe_segments(outline: &[Pos2], spacing: f32) -> Vec<[Pos2; 2]> {
    let (Some(top), Some(bottom)) = (
        outline.iter().map(|point| point.y).reduce(f32::min),
        outline.iter().map(|point| point.y).reduce(f32::max),
    ) else {
        return Vec::new();
    };
    if spacing <= 0.0 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut y = top + spacing * 0.5;
    while y < bottom {
        let crossings = outline
            .iter()
            .zip(outline.iter().cycle().skip(1))
            .filter(|(a, b)| (a.y <= y && b.y > y) || (b.y <= y && a.y > y))
            .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
        let (left, right) = crossings.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if left < right {
            segments.push([Pos2::new(left, y), Pos2::new(right, y)]);
        }
        y += spacing;
    }
    segments
}

fn fill_shape(
    painter: &Painter,
    shape: ShapeKind,
    center: Pos2,
    radius: f32,
    rotation_deg: f32,
    color: Color32,
) {
    match shape.sides() {
        None => {
            painter.circle_filled(center, radius, color);
        }
        Some(sides) => {
            painter.add(Shape::convex_polygon(
                polygon_points(center, radius, sides, rotation_deg),
                color,
                Stroke::NONE,
            ));
        }
    }
}

pub(super) fn outline_shape(
    painter: &Painter,
    shape: ShapeKind,
    center: Pos2,
    radius: f32,
    rotation_deg: f32,
    stroke: Stroke,
) {
    match shape.sides() {
        None => {
            painter.circle_stroke(center, radius, stroke);
        }
        Some(sides) => {
            painter.add(Shape::closed_line(
                polygon_points(center, radius, sides, rotation_deg),
                stroke,
            ));
        }
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

pub(super) fn to_screen(canvas: Rect, position: Pos2) -> Pos2 {
    canvas.min + position.to_vec2()
}

pub(super) fn to_scene(canvas: Rect, position: Pos2) -> Pos2 {
    Pos2::ZERO + (position - canvas.min)
}

pub(super) fn offset_rect(canvas: Rect, rect: Rect) -> Rect {
    rect.translate(canvas.min.to_vec2())
}
