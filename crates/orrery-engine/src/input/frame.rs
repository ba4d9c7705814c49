use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed
/// since the last rendered frame. The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame. A key pressed and released between two frames
    /// is still reported here.
    pub keys_pressed: HashSet<Key>,

    /// Accumulated pointer motion this frame.
    pub pointer_delta: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
    }

    #[inline]
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
