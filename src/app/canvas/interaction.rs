use eframe::egui::{self, Key, Rect, Ui};

use crate::art::InputEvent;

use super::super::ViewModel;
use super::super::render_utils::to_scene;

const KEY_BINDINGS: [(Key, InputEvent); 4] = [
    (Key::Space, InputEvent::TogglePause),
    (Key::H, InputEvent::ToggleInfoPanel),
    (Key::S, InputEvent::Screenshot),
    (Key::Escape, InputEvent::Quit),
];

impl ViewModel {
    /// Keys are ignored while a text field has focus.
    pub(in crate::app) fn queue_key_events(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let pressed = ctx.input(|input| {
            KEY_BINDINGS
                .iter()
                .filter(|(key, _)| input.key_pressed(*key))
                .map(|(_, event)| *event)
                .collect::<Vec<_>>()
        });
        self.queue.extend(pressed);
    }

    pub(in crate::app) fn queue_pointer_events(
        &mut self,
        ui: &Ui,
        canvas: Rect,
        response: &egui::Response,
    ) {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|position| canvas.contains(*position))
            .map(|position| to_scene(canvas, position));

        match (pointer, self.last_pointer) {
            (Some(position), last) if last != Some(position) => {
                self.queue.push(InputEvent::PointerMoved(position));
            }
            (None, Some(_)) => self.queue.push(InputEvent::PointerLeft),
            _ => {}
        }
        self.last_pointer = pointer;

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(position) = response.interact_pointer_pos()
        {
            self.queue.push(InputEvent::Click(to_scene(canvas, position)));
        }

        // Hover is resolved by the scene on the previous frame.
        if pointer.is_some() && self.scene.hovered().is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
    }
}
