use std::collections::VecDeque;

use eframe::egui::Pos2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMoved(Pos2),
    PointerLeft,
    Click(Pos2),
    TogglePause,
    ToggleInfoPanel,
    Screenshot,
    Quit,
}

/// Events collected between frames, drained once at the start of the next one.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }
}

impl Extend<InputEvent> for InputQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties_queue() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerMoved(Pos2::new(1.0, 2.0)));
        queue.push(InputEvent::Click(Pos2::new(1.0, 2.0)));
        queue.extend([InputEvent::TogglePause, InputEvent::Quit]);
        let drained = queue.drain().collect::<Vec<_>>();

        assert_eq!(
            drained,
            vec![
                InputEvent::PointerMoved(Pos2::new(1.0, 2.0)),
                InputEvent::Click(Pos2::new(1.0, 2.0)),
                InputEvent::TogglePause,
                InputEvent::Quit,
            ]
        );
        assert!(queue.is_empty());
    }
}
