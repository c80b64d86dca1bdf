use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed
/// since the last frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame, repeats excluded.
    pub keys_pressed: HashSet<Key>,

    pub keys_released: HashSet<Key>,

    /// Button presses this frame with the pointer position at press time.
    pub clicks: Vec<(MouseButton, Vec2)>,

    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.clicks.clear();
        self.buttons_released.clear();
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Positions of left-button presses this frame, in arrival order.
    pub fn left_clicks(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.clicks
            .iter()
            .filter(|(b, _)| *b == MouseButton::Left)
            .map(|(_, p)| *p)
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
