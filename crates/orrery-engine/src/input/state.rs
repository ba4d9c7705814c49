use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoids stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerMotion { dx, dy } => {
                // Ignored while unfocused.
                if self.focused {
                    frame.pointer_delta.0 += dx;
                    frame.pointer_delta.1 += dy;
                }
            }
        }
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if any of `keys` is held.
    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state }
    }

    #[test]
    fn press_and_release_are_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));
        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed));
        assert!(state.key_down(Key::W));
        assert_eq!(frame.keys_pressed.len(), 1);

        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Released));
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn press_between_frames_is_not_lost() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Released));
        assert!(!state.key_down(Key::Escape));
        assert!(frame.pressed(Key::Escape));

        frame.clear();
        assert!(!frame.pressed(Key::Escape));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.any_down(&[Key::ArrowUp, Key::W]));
    }

    #[test]
    fn pointer_motion_accumulates_while_focused() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMotion { dx: 5.0, dy: 1.0 });
        assert_eq!(frame.pointer_delta, (0.0, 0.0));

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, InputEvent::PointerMotion { dx: 3.0, dy: -1.0 });
        state.apply_event(&mut frame, InputEvent::PointerMotion { dx: 2.0, dy: -2.0 });
        assert_eq!(frame.pointer_delta, (5.0, -3.0));

        frame.clear();
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
    }
}
