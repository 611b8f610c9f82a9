//! Frame-coherent keyboard state.
//!
//! Keys are tracked by physical code, so the face keys sit in the same place
//! on every layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The parts of a winit [`KeyEvent`] the tracker needs.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// A non-repeat event for `code`.
    #[must_use]
    pub fn new(code: KeyCode, state: ElementState) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        }
    }
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Held keys plus the keys that changed during the current frame.
///
/// Feed events with [`process_event`](Self::process_event), read, then call
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed_this_frame: Vec<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent::from(event));
    }

    /// Applies one event. Repeats and unidentified keys are ignored, so a
    /// held face key turns its layer once.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(code) {
                    self.pressed_this_frame.push(code);
                }
            }
            ElementState::Released => {
                if self.held.remove(&code) {
                    self.released_this_frame.insert(code);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// True during the frame the key went down.
    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.pressed_this_frame.contains(&code)
    }

    /// True during the frame the key went up.
    #[must_use]
    pub fn just_released(&self, code: KeyCode) -> bool {
        self.released_this_frame.contains(&code)
    }

    /// Keys that went down this frame, in arrival order.
    pub fn just_pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed_this_frame.iter().copied()
    }

    /// Releases every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.released_this_frame.extend(self.held.drain());
    }

    /// Clears the per-frame sets. Held keys stay held.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }
}
