//! Frame-coherent mouse state with click/drag separation.
//!
//! A press and release that stays within [`CLICK_SLOP_PX`] counts as a
//! click (used for picking). Anything longer is a drag (used for orbiting).

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Cursor travel, in logical pixels, below which a press/release is a click.
pub const CLICK_SLOP_PX: f32 = 4.0;

/// Pixels per scroll line for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
    press_position: Vec2,
    travelled: f32,
}

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

/// Cursor position, motion, buttons and wheel for the current frame.
///
/// Forward winit events to the `on_*` methods, read, then call
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    buttons: [ButtonFrame; 3],
    scroll: f32,
    captured: bool,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// `WindowEvent::CursorMoved`, in logical pixels.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        let step = new_pos - self.position;
        if !self.captured {
            self.delta += step;
        }
        for b in self.buttons.iter_mut().filter(|b| b.pressed) {
            b.travelled += step.length();
        }
        self.position = new_pos;
    }

    /// `DeviceEvent::MouseMotion`, only counted while the cursor is captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// `WindowEvent::MouseInput`. Buttons other than left/right/middle are ignored.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(idx) = button_index(button) else {
            return;
        };
        let b = &mut self.buttons[idx];
        match state {
            ElementState::Pressed => {
                b.pressed = true;
                b.just_pressed = true;
                b.press_position = self.position;
                b.travelled = 0.0;
            }
            ElementState::Released => {
                b.pressed = false;
                b.just_released = true;
            }
        }
    }

    /// `WindowEvent::MouseWheel`. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Switches between cursor-position deltas and raw device deltas.
    /// Grabbing and hiding the OS cursor is the window owner's job.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Clears motion, wheel and button edges. Held buttons and their drag
    /// origins persist.
    pub fn end_frame(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        for b in &mut self.buttons {
            b.just_pressed = false;
            b.just_released = false;
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Motion accumulated this frame.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.frame(button).is_some_and(|b| b.pressed)
    }

    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        self.frame(button).is_some_and(|b| b.just_pressed)
    }

    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        self.frame(button).is_some_and(|b| b.just_released)
    }

    /// Released this frame without moving further than [`CLICK_SLOP_PX`].
    #[must_use]
    pub fn just_clicked(&self, button: MouseButton) -> bool {
        self.frame(button)
            .is_some_and(|b| b.just_released && b.travelled <= CLICK_SLOP_PX)
    }

    /// Held and moved beyond [`CLICK_SLOP_PX`] since the press.
    #[must_use]
    pub fn is_dragging(&self, button: MouseButton) -> bool {
        self.frame(button)
            .is_some_and(|b| b.pressed && b.travelled > CLICK_SLOP_PX)
    }

    /// Offset from the press position while `button` is held.
    #[must_use]
    pub fn drag_offset(&self, button: MouseButton) -> Option<Vec2> {
        self.frame(button)
            .filter(|b| b.pressed)
            .map(|b| self.position - b.press_position)
    }

    fn frame(&self, button: MouseButton) -> Option<&ButtonFrame> {
        button_index(button).map(|i| &self.buttons[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_and_delta() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        ms.end_frame();
        ms.on_cursor_moved(110.0, 195.0);
        assert_eq!(ms.position(), Vec2::new(110.0, 195.0));
        assert_eq!(ms.delta(), Vec2::new(10.0, -5.0));
        ms.end_frame();
        assert_eq!(ms.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_button_edges() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        assert!(ms.is_button_pressed(MouseButton::Left));
        assert!(ms.just_button_pressed(MouseButton::Left));
        ms.end_frame();
        assert!(!ms.just_button_pressed(MouseButton::Left));

        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(!ms.is_button_pressed(MouseButton::Left));
        assert!(ms.just_button_released(MouseButton::Left));
    }

    #[test]
    fn test_small_motion_is_click() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(50.0, 50.0);
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        ms.on_cursor_moved(52.0, 51.0);
        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(ms.just_clicked(MouseButton::Left));
    }

    #[test]
    fn test_long_motion_is_drag() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(50.0, 50.0);
        ms.on_button(MouseButton::Right, ElementState::Pressed);
        ms.on_cursor_moved(80.0, 50.0);
        assert!(ms.is_dragging(MouseButton::Right));
        assert_eq!(ms.drag_offset(MouseButton::Right), Some(Vec2::new(30.0, 0.0)));

        ms.on_button(MouseButton::Right, ElementState::Released);
        assert!(!ms.just_clicked(MouseButton::Right));
        assert_eq!(ms.drag_offset(MouseButton::Right), None);
    }

    #[test]
    fn test_scroll_accumulates_and_resets() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 0.5));
        assert!((ms.scroll() - 1.5).abs() < f32::EPSILON);
        ms.end_frame();
        assert!(ms.scroll().abs() < f32::EPSILON);
    }

    #[test]
    fn test_captured_uses_raw_motion() {
        let mut ms = MouseState::new();
        ms.set_captured(true);
        ms.on_cursor_moved(400.0, 300.0);
        assert_eq!(ms.delta(), Vec2::ZERO);
        ms.on_raw_motion(3.0, -2.0);
        assert_eq!(ms.delta(), Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_unknown_buttons_ignored() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Back, ElementState::Pressed);
        assert!(!ms.is_button_pressed(MouseButton::Back));
    }

    #[test]
    fn test_cursor_enter_leave() {
        let mut ms = MouseState::new();
        ms.on_cursor_entered();
        assert!(ms.is_cursor_in_window());
        ms.on_cursor_left();
        assert!(!ms.is_cursor_in_window());
    }
}
