use std::sync::Arc;

use chrono::Local;
use eframe::egui::{self, Align, ColorImage, Context, Layout, RichText};
use tracing::{info, warn};

use crate::art::{InputEvent, ShapeKind};
use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::screenshot::save_screenshot;
use super::super::render_utils::{BACKGROUND, INK, MUTED_INK, fps_color, metric_color};

const CONTROL_HINTS: [(&str, &str); 5] = [
    ("Click", "select a shape"),
    ("Space", "pause motion"),
    ("H", "toggle this panel"),
    ("S", "screenshot"),
    ("Esc", "quit"),
];

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.queue_key_events(ctx);
        self.store_captured_screenshot(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("geo-drift");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_label));
                    ui.label(format!("metric: {}", self.metric_label));
                    ui.label(format!("entities: {}", self.scene.entities().len()));
                    if !self.scene.dropped().is_empty() {
                        ui.label(format!("dropped: {}", self.scene.dropped().len()))
                            .on_hover_text(self.scene.dropped().join(", "));
                    }
                    ui.label(if self.from_cache { "cached" } else { "computed" });
                    if self.scene.paused() {
                        ui.label(RichText::new("paused").strong());
                    }
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.fps_display_text());
                    });
                });
            });

        let mut show_info_panel = self.show_info_panel;
        egui::Window::new("Geometric Art")
            .open(&mut show_info_panel)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
            .show(ctx, |ui| self.draw_info_panel(ui));
        self.show_info_panel = show_info_panel;

        let mut host_events = Vec::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                host_events = self.draw_canvas(ui);
            });

        for event in host_events {
            self.handle_host_event(ctx, event);
        }
    }

    fn handle_host_event(&mut self, ctx: &Context, event: InputEvent) {
        match event {
            InputEvent::ToggleInfoPanel => {
                self.show_info_panel = !self.show_info_panel;
            }
            InputEvent::Quit => {
                info!("quit requested");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            InputEvent::Screenshot if self.screenshot_pending => {}
            InputEvent::Screenshot => {
                self.screenshot_pending = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                ctx.request_repaint();
            }
            other => warn!(?other, "scene event reached the host"),
        }
    }

    /// The capture requested with S arrives as an input event on a later frame.
    fn store_captured_screenshot(&mut self, ctx: &Context) {
        let captured: Option<Arc<ColorImage>> = ctx.input(|input| {
            input.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });
        let Some(frame) = captured else {
            return;
        };

        self.screenshot_pending = false;
        match save_screenshot(&frame, &self.screenshot_dir, Local::now()) {
            Ok(path) => info!(path = %path.display(), "screenshot saved"),
            Err(error) => warn!("{error:#}"),
        }
    }

    fn draw_info_panel(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Data-driven geometric drift").color(INK));
        ui.label(
            RichText::new(format!("{} across {} entities", self.metric_label, self.scene.entities().len()))
                .small()
                .color(MUTED_INK),
        );
        ui.separator();

        let stats = &self.stats;
        egui::Grid::new("stats_grid").num_columns(2).show(ui, |ui| {
            ui.label("Entities");
            ui.label(format!(
                "{} of {} groups ({} rows)",
                stats.count, self.entity_groups, self.source_rows
            ));
            ui.end_row();

            ui.label("Average");
            let average_color = if stats.mean >= 80.0 {
                metric_color(90.0)
            } else if stats.mean >= 60.0 {
                metric_color(70.0)
            } else {
                metric_color(0.0)
            };
            ui.label(RichText::new(format!("{:.1}%", stats.mean)).color(average_color));
            ui.end_row();

            ui.label("Median");
            ui.label(format!("{:.1}%", stats.median));
            ui.end_row();

            ui.label("Std dev");
            ui.label(format!("{:.1}", stats.std_dev));
            ui.end_row();

            ui.label("Range");
            ui.label(format!("{:.1}% to {:.1}%", stats.min, stats.max));
            ui.end_row();

            ui.label("Running");
            ui.label(format!("{:.1} s", self.scene.elapsed_ms() / 1000.0));
            ui.end_row();

            ui.label("FPS");
            let fps = self.average_fps().unwrap_or(self.fps_current);
            ui.label(RichText::new(format!("{fps:.0}")).color(fps_color(fps)));
            ui.end_row();
        });

        ui.collapsing("Shapes", |ui| {
            for shape in ShapeKind::ALL {
                ui.label(format!("{}: {}", shape.label(), stats.shape_count(shape)));
            }
        });
        ui.separator();

        let mut clear_clicked = false;
        match self.scene.active_entity() {
            Some(entity) => {
                ui.label(RichText::new(truncate_label(entity.name(), 22)).strong());
                ui.label(
                    RichText::new(format!("{:.1}%", entity.metric))
                        .color(metric_color(entity.metric)),
                );
                ui.label(format!(
                    "Shape: {} ({})",
                    entity.params.shape.label(),
                    entity.params.pattern.label()
                ));
                if let Some(year) = entity.record.year {
                    ui.label(RichText::new(format!("Year {year}")).small().color(MUTED_INK));
                }
                clear_clicked = ui.button("Clear selection").clicked();
            }
            None => {
                ui.label(RichText::new("Nothing selected").color(MUTED_INK));
            }
        }
        if clear_clicked {
            self.scene.clear_selection();
        }
        ui.separator();

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Find an entity")
                    .desired_width(170.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            let select_clicked = ui
                .add_enabled(self.search_candidate().is_some(), egui::Button::new("Select"))
                .clicked();
            if submitted || select_clicked {
                self.select_search_match();
            }
        });
        if let Some(index) = self.search_candidate()
            && let Some(entity) = self.scene.entities().get(index)
        {
            ui.label(RichText::new(format!("best match: {}", entity.name())).small().color(MUTED_INK));
        }
        ui.separator();

        for (key, action) in CONTROL_HINTS {
            ui.horizontal(|ui| {
                ui.label(RichText::new(key).monospace().strong());
                ui.label(action);
            });
        }
    }
}
