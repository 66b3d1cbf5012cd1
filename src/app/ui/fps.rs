use eframe::egui::Context;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 120;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn average_fps(&self) -> Option<f32> {
        if self.fps_samples.is_empty() {
            return None;
        }
        Some(self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32)
    }

    pub(in crate::app) fn fps_display_text(&self) -> String {
        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];

        if let Some(avg) = self.average_fps() {
            parts.push(format!("avg {avg:.1}"));
        }

        if let Some(low) = self.fps_samples.iter().copied().reduce(f32::min) {
            parts.push(format!("low {low:.0}"));
        }

        if self.fps_current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        }

        parts.join(" | ")
    }
}
