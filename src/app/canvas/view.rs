use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Sense, Shape, Stroke, StrokeKind, Ui};

use crate::art::{Bounds, InputEvent, TooltipPlacement};
use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    INK, MUTED_INK, ShapeStyle, TOOLTIP_BORDER, TOOLTIP_FILL, base_color, blend_color,
    circle_visible, draw_background, draw_shape, effective_alpha, effective_clarity, offset_rect,
    outline_shape, to_screen, tooltip_metric_color,
};

const INFLUENCE_FILL: Color32 = Color32::from_rgba_premultiplied(12, 12, 30, 30);
const INFLUENCE_STROKE: Color32 = Color32::from_rgba_premultiplied(31, 31, 80, 80);
const SELECTION_RING_GAP: f32 = 8.0;
const TOOLTIP_NAME_CHARS: usize = 22;

impl ViewModel {
    /// Runs one scene frame against the canvas and paints it. Returns events the host must handle.
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) -> Vec<InputEvent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());

        if let Ok(bounds) = Bounds::from_size(rect.size())
            && bounds != self.scene.bounds()
        {
            self.scene.resize(bounds);
        }

        self.queue_pointer_events(ui, rect, &response);
        let dt = ui.input(|input| input.stable_dt);
        let host_events = self.scene.frame(dt, &mut self.queue);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        self.draw_influence(&painter, rect);
        self.draw_entities(&painter, rect);
        if let Some(placement) = self.scene.tooltip() {
            self.draw_tooltip(&painter, rect, placement);
        }
        if self.scene.paused() {
            painter.text(
                rect.right_bottom() + egui::vec2(-14.0, -12.0),
                Align2::RIGHT_BOTTOM,
                "Paused",
                FontId::proportional(14.0),
                MUTED_INK,
            );
        }

        if self.scene.is_animating() {
            ui.ctx().request_repaint();
        }

        host_events
    }

    fn draw_influence(&self, painter: &Painter, canvas: Rect) {
        let Some(pointer) = self.scene.pointer() else {
            return;
        };
        painter.circle(
            to_screen(canvas, pointer),
            self.scene.attraction_radius(),
            INFLUENCE_FILL,
            Stroke::new(2.0, INFLUENCE_STROKE),
        );
    }

    fn draw_entities(&self, painter: &Painter, canvas: Rect) {
        // Later entities sit on top, matching hit testing.
        for entity in self.scene.entities() {
            let center = to_screen(canvas, entity.position);
            let radius = entity.display_radius();
            if !circle_visible(canvas, center, radius + SELECTION_RING_GAP) {
                continue;
            }

            let color = base_color(&entity.params);
            let style = ShapeStyle {
                shape: entity.params.shape,
                pattern: entity.params.pattern,
                rotation_deg: entity.rotation,
                color,
                alpha: effective_alpha(entity),
                clarity: effective_clarity(entity),
            };
            draw_shape(painter, &style, center, radius);

            if entity.selected {
                outline_shape(
                    painter,
                    entity.params.shape,
                    center,
                    radius + SELECTION_RING_GAP,
                    entity.rotation,
                    Stroke::new(2.5, blend_color(color, INK, 0.45)),
                );
            }
        }
    }

    fn draw_tooltip(&self, painter: &Painter, canvas: Rect, placement: &TooltipPlacement) {
        let Some(entity) = self.scene.active_entity() else {
            return;
        };

        let rect = offset_rect(canvas, placement.rect());
        let arrow = placement
            .arrow(7.0, 9.0)
            .map(|point| to_screen(canvas, point));
        painter.add(Shape::convex_polygon(arrow.to_vec(), TOOLTIP_FILL, Stroke::NONE));
        painter.rect_filled(rect, 12.0, TOOLTIP_FILL);
        painter.rect_stroke(rect, 12.0, Stroke::new(1.5, TOOLTIP_BORDER), StrokeKind::Inside);

        let left = rect.left() + 14.0;
        painter.text(
            egui::pos2(left, rect.top() + 12.0),
            Align2::LEFT_TOP,
            truncate_label(entity.name(), TOOLTIP_NAME_CHARS),
            FontId::proportional(15.0),
            Color32::WHITE,
        );
        painter.text(
            egui::pos2(left, rect.top() + 36.0),
            Align2::LEFT_TOP,
            format!("{:.1}% {}", entity.metric, self.metric_label),
            FontId::proportional(13.0),
            tooltip_metric_color(entity.metric),
        );
        painter.text(
            egui::pos2(left, rect.top() + 56.0),
            Align2::LEFT_TOP,
            format!(
                "Shape: {} ({})",
                entity.params.shape.label(),
                entity.params.pattern.label()
            ),
            FontId::proportional(12.0),
            Color32::from_gray(190),
        );
    }
}
