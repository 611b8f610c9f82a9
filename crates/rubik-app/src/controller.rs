//! Turns the frame's input into cube commands and camera motion.
//!
//! The controller holds the interactive turn settings: direction, step
//! size, and which layer the face keys rotate. Face keys turn about the
//! face's outward normal; the default direction is positive, which is
//! counter-clockwise seen from that face.

use glam::{Mat4, Vec2, Vec3};
use tracing::{debug, info};

use rubik_cube::{CubeLattice, Face, LayerSelect, Selection, Sign, TurnEngine};
use rubik_input::{CubeAction, KeyBindings, KeyboardState, MouseState};
use rubik_render::{CameraMode, CameraRig, FlyInput, PickSource, pick};

/// Smallest turn step: a quarter turn.
pub const MIN_STEP_DEG: f32 = 90.0;
/// Largest turn step: a half turn.
pub const MAX_STEP_DEG: f32 = 180.0;

/// How far a desynced cubie is pushed out of its slot, in world units.
const DESYNC_OFFSET: f32 = 0.5;

/// The state a frame of input acts on.
pub struct FrameTargets<'a> {
    pub lattice: &'a mut CubeLattice,
    pub engine: &'a mut TurnEngine,
    pub selection: &'a mut Selection,
    pub rig: &'a mut CameraRig,
}

/// Interactive turn settings plus the per-frame dispatch from bound
/// actions to the engine, selection and cameras.
#[derive(Debug, Clone, PartialEq)]
pub struct InputController {
    direction: Sign,
    step_deg: f32,
    layer: LayerSelect,
    /// Multiplier on mouse motion before it reaches a camera.
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(MIN_STEP_DEG)
    }
}

fn action_face(action: CubeAction) -> Option<Face> {
    match action {
        CubeAction::TurnRight => Some(Face::PosX),
        CubeAction::TurnLeft => Some(Face::NegX),
        CubeAction::TurnUp => Some(Face::PosY),
        CubeAction::TurnDown => Some(Face::NegY),
        CubeAction::TurnFront => Some(Face::PosZ),
        CubeAction::TurnBack => Some(Face::NegZ),
        _ => None,
    }
}

impl InputController {
    /// `step_deg` is clamped to the quarter/half turn range.
    pub fn new(step_deg: f32) -> Self {
        Self {
            direction: Sign::Positive,
            step_deg: step_deg.clamp(MIN_STEP_DEG, MAX_STEP_DEG),
            layer: LayerSelect::Outer,
            mouse_sensitivity: 1.0,
            invert_y: false,
        }
    }

    pub fn direction(&self) -> Sign {
        self.direction
    }

    pub fn step_deg(&self) -> f32 {
        self.step_deg
    }

    pub fn layer(&self) -> LayerSelect {
        self.layer
    }

    /// Processes one frame: one-shot actions first, then held camera
    /// controls. `picker` reads the id pass; without one, picking and
    /// hover are skipped. Returns the one-shot actions that fired.
    pub fn handle_frame(
        &mut self,
        bindings: &KeyBindings,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        dt: f32,
        targets: FrameTargets<'_>,
        mut picker: Option<&mut dyn PickSource>,
    ) -> Vec<CubeAction> {
        let FrameTargets {
            lattice,
            engine,
            selection,
            rig,
        } = targets;

        let cursor = cursor_pixel(mouse);
        if mouse.is_cursor_in_window() && mouse.delta() != Vec2::ZERO {
            if let Some(source) = picker.as_deref_mut() {
                selection.hover(pick(source, cursor.0, cursor.1));
            }
        }

        let actions = bindings.triggered(keyboard, mouse);
        for &action in &actions {
            if let Some(face) = action_face(action) {
                engine.start_turn(face.normal(), self.layer, self.step_deg, self.direction);
                continue;
            }
            match action {
                CubeAction::ToggleDirection => {
                    self.direction = self.direction.flip();
                    info!("Turn direction: {:?}", self.direction);
                }
                CubeAction::DoubleStep => self.set_step(self.step_deg * 2.0),
                CubeAction::HalveStep => self.set_step(self.step_deg / 2.0),
                CubeAction::NextLayer => self.cycle_layer(lattice.size(), true),
                CubeAction::PreviousLayer => self.cycle_layer(lattice.size(), false),
                CubeAction::WholeLayer => {
                    self.layer = LayerSelect::Outer;
                    info!("Layer selection: outer");
                }
                CubeAction::ToggleCamera => {
                    rig.toggle_mode();
                }
                CubeAction::Pick => {
                    if let Some(source) = picker.as_deref_mut() {
                        selection.pick(pick(source, cursor.0, cursor.1));
                    }
                }
                CubeAction::Desync => desync_selected(lattice, selection),
                CubeAction::Reset => {
                    if engine.is_turning() {
                        debug!("Reset ignored while a turn is animating");
                    } else {
                        lattice.reset();
                        selection.clear();
                        info!("Cube reset");
                    }
                }
                _ => {}
            }
        }

        self.drive_camera(bindings, keyboard, mouse, dt, rig);
        actions
    }

    fn set_step(&mut self, step_deg: f32) {
        self.step_deg = step_deg.clamp(MIN_STEP_DEG, MAX_STEP_DEG);
        info!("Turn step: {}°", self.step_deg);
    }

    /// Steps through explicit layer indices, entering from either end.
    fn cycle_layer(&mut self, size: u32, forward: bool) {
        let size = size.max(1);
        self.layer = match (self.layer, forward) {
            (LayerSelect::Outer, true) => LayerSelect::Index(0),
            (LayerSelect::Outer, false) => LayerSelect::Index(size - 1),
            (LayerSelect::Index(i), true) => LayerSelect::Index((i.min(size - 1) + 1) % size),
            (LayerSelect::Index(i), false) => LayerSelect::Index((i.min(size - 1) + size - 1) % size),
        };
        info!("Layer selection: {:?}", self.layer);
    }

    fn drive_camera(
        &self,
        bindings: &KeyBindings,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        dt: f32,
        rig: &mut CameraRig,
    ) {
        let held = |action| bindings.is_held(action, keyboard, mouse);
        let axis = |pos, neg| f32::from(u8::from(held(pos))) - f32::from(u8::from(held(neg)));

        let mut look = mouse.delta() * self.mouse_sensitivity;
        if self.invert_y {
            look.y = -look.y;
        }
        let looking = held(CubeAction::Orbit) && look != Vec2::ZERO;

        match rig.mode() {
            CameraMode::Orbit => {
                if looking {
                    rig.orbit.rotate(look);
                }
                if mouse.scroll() != 0.0 {
                    rig.orbit.zoom(mouse.scroll());
                }
            }
            CameraMode::FreeFly => {
                if looking {
                    rig.free_fly.look(look);
                }
                let input = FlyInput {
                    forward: axis(CubeAction::FlyForward, CubeAction::FlyBack),
                    right: axis(CubeAction::FlyRight, CubeAction::FlyLeft),
                    up: axis(CubeAction::FlyUp, CubeAction::FlyDown),
                };
                rig.free_fly.fly(input, dt);
            }
        }
        rig.sync();
    }
}

fn cursor_pixel(mouse: &MouseState) -> (u32, u32) {
    let p = mouse.position().max(Vec2::ZERO);
    (p.x as u32, p.y as u32)
}

/// Pushes the picked cubie outward from the lattice centre, or puts it
/// back if it is already out.
fn desync_selected(lattice: &mut CubeLattice, selection: &Selection) {
    let Some(cubie) = selection.picked().and_then(|id| lattice.cubie(id)) else {
        debug!("Desync ignored: nothing picked");
        return;
    };
    if cubie.is_desynced() {
        let id = cubie.id();
        lattice.resync_cubie(id);
        info!("Cubie {id} returned to its slot");
        return;
    }
    let outward = lattice
        .slot_position(cubie.grid_position())
        .try_normalize()
        .unwrap_or(Vec3::Y);
    selection.desync_picked(lattice, Mat4::from_translation(outward * DESYNC_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use rubik_cube::{CubieId, DEFAULT_SPACING};
    use rubik_input::RawKeyEvent;
    use rubik_render::CpuPickBuffer;
    use winit::event::{ElementState, MouseButton};
    use winit::keyboard::KeyCode;

    struct Harness {
        controller: InputController,
        bindings: KeyBindings,
        keyboard: KeyboardState,
        mouse: MouseState,
        lattice: CubeLattice,
        engine: TurnEngine,
        selection: Selection,
        rig: CameraRig,
        picker: CpuPickBuffer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                controller: InputController::default(),
                bindings: KeyBindings::default(),
                keyboard: KeyboardState::new(),
                mouse: MouseState::new(),
                lattice: CubeLattice::new(3, DEFAULT_SPACING),
                engine: TurnEngine::new(90.0),
                selection: Selection::default(),
                rig: CameraRig::default(),
                picker: CpuPickBuffer::new(64, 64),
            }
        }

        fn frame(&mut self, dt: f32) -> Vec<CubeAction> {
            let actions = self.controller.handle_frame(
                &self.bindings,
                &self.keyboard,
                &self.mouse,
                dt,
                FrameTargets {
                    lattice: &mut self.lattice,
                    engine: &mut self.engine,
                    selection: &mut self.selection,
                    rig: &mut self.rig,
                },
                Some(&mut self.picker as &mut dyn PickSource),
            );
            self.keyboard.end_frame();
            self.mouse.end_frame();
            actions
        }

        fn tap(&mut self, code: KeyCode) -> Vec<CubeAction> {
            self.keyboard
                .process_raw(RawKeyEvent::new(code, ElementState::Pressed));
            let actions = self.frame(0.0);
            self.keyboard
                .process_raw(RawKeyEvent::new(code, ElementState::Released));
            self.frame(0.0);
            actions
        }

        fn click(&mut self, x: f64, y: f64) {
            self.mouse.on_cursor_moved(x, y);
            self.mouse.on_button(MouseButton::Left, ElementState::Pressed);
            self.mouse.on_button(MouseButton::Left, ElementState::Released);
            self.frame(0.0);
        }

        fn active_angle(&self) -> Option<f32> {
            self.engine.active_turn().map(|t| t.spec().angle_deg)
        }
    }

    #[test]
    fn test_face_key_starts_turn() {
        let mut h = Harness::new();
        assert_eq!(h.tap(KeyCode::KeyR), vec![CubeAction::TurnRight]);
        let spec = h.engine.active_turn().unwrap().spec();
        assert_eq!(spec.axis, Face::PosX.signed_axis());
        assert_eq!(spec.layer, LayerSelect::Outer);
        assert_eq!(spec.angle_deg, 90.0);
    }

    #[test]
    fn test_toggle_direction() {
        let mut h = Harness::new();
        h.tap(KeyCode::Space);
        assert_eq!(h.controller.direction(), Sign::Negative);
        h.tap(KeyCode::KeyU);
        assert_eq!(h.active_angle(), Some(-90.0));
    }

    #[test]
    fn test_step_doubles_and_halves_within_range() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyA);
        assert_eq!(h.controller.step_deg(), 180.0);
        h.tap(KeyCode::KeyA);
        assert_eq!(h.controller.step_deg(), 180.0);
        h.tap(KeyCode::KeyZ);
        assert_eq!(h.controller.step_deg(), 90.0);
        h.tap(KeyCode::KeyZ);
        assert_eq!(h.controller.step_deg(), 90.0);
    }

    #[test]
    fn test_half_step_turn() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyA);
        h.tap(KeyCode::KeyF);
        assert_eq!(h.active_angle(), Some(180.0));
    }

    #[test]
    fn test_layer_cycling() {
        let mut h = Harness::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            h.tap(KeyCode::Period);
            seen.push(h.controller.layer());
        }
        assert_eq!(
            seen,
            vec![
                LayerSelect::Index(0),
                LayerSelect::Index(1),
                LayerSelect::Index(2),
                LayerSelect::Index(0)
            ]
        );
        h.tap(KeyCode::KeyO);
        assert_eq!(h.controller.layer(), LayerSelect::Outer);
        h.tap(KeyCode::Comma);
        assert_eq!(h.controller.layer(), LayerSelect::Index(2));
        h.tap(KeyCode::Comma);
        assert_eq!(h.controller.layer(), LayerSelect::Index(1));
    }

    #[test]
    fn test_middle_layer_turn() {
        let mut h = Harness::new();
        h.tap(KeyCode::Period);
        h.tap(KeyCode::Period);
        h.tap(KeyCode::KeyR);
        assert_eq!(
            h.engine.active_turn().unwrap().layer(),
            LayerSelect::Index(1)
        );
        assert_eq!(h.engine.affected_cubies(&h.lattice).len(), 9);
    }

    #[test]
    fn test_second_turn_while_busy_is_ignored() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyR);
        h.tap(KeyCode::KeyU);
        assert_eq!(
            h.engine.active_turn().unwrap().axis(),
            Face::PosX.signed_axis()
        );
    }

    #[test]
    fn test_click_picks_cubie() {
        let mut h = Harness::new();
        h.picker.fill_rect(CubieId(13), 10, 10, 20, 20);
        h.click(15.0, 15.0);
        assert_eq!(h.selection.picked(), Some(CubieId(13)));
        h.click(50.0, 50.0);
        assert_eq!(h.selection.picked(), None);
    }

    #[test]
    fn test_drag_does_not_pick() {
        let mut h = Harness::new();
        h.picker.fill_rect(CubieId(5), 0, 0, 64, 64);
        h.mouse.on_cursor_moved(10.0, 10.0);
        h.mouse.on_button(MouseButton::Left, ElementState::Pressed);
        h.frame(0.0);
        h.mouse.on_cursor_moved(40.0, 10.0);
        h.mouse.on_button(MouseButton::Left, ElementState::Released);
        h.frame(0.0);
        assert_eq!(h.selection.picked(), None);
    }

    #[test]
    fn test_hover_follows_cursor() {
        let mut h = Harness::new();
        h.picker.fill_rect(CubieId(7), 0, 0, 32, 64);
        h.mouse.on_cursor_entered();
        h.mouse.on_cursor_moved(5.0, 5.0);
        h.frame(0.0);
        assert_eq!(h.selection.hovered(), Some(CubieId(7)));
        h.mouse.on_cursor_moved(40.0, 5.0);
        h.frame(0.0);
        assert_eq!(h.selection.hovered(), None);
    }

    #[test]
    fn test_desync_moves_picked_cubie() {
        let mut h = Harness::new();
        let corner = h.lattice.cubie_at(IVec3::new(2, 2, 2)).unwrap().id();
        h.picker.fill_rect(corner, 0, 0, 8, 8);
        h.click(1.0, 1.0);
        h.tap(KeyCode::KeyX);
        let cubie = h.lattice.cubie(corner).unwrap();
        assert!(cubie.is_desynced());
        assert!(cubie.translation_offset().x > 0.0);
        assert_eq!(cubie.grid_position(), IVec3::new(2, 2, 2));
    }

    #[test]
    fn test_second_desync_returns_cubie() {
        let mut h = Harness::new();
        let edge = h.lattice.cubie_at(IVec3::new(2, 1, 2)).unwrap().id();
        h.picker.fill_rect(edge, 0, 0, 8, 8);
        h.click(1.0, 1.0);
        h.tap(KeyCode::KeyX);
        assert!(h.lattice.cubie(edge).unwrap().is_desynced());

        h.tap(KeyCode::KeyX);
        let cubie = h.lattice.cubie(edge).unwrap();
        assert!(!cubie.is_desynced());
        assert_eq!(cubie.translation_offset(), Vec3::ZERO);
        assert!(h.lattice.is_solved());
    }

    #[test]
    fn test_desync_without_pick_is_noop() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyX);
        assert!(h.lattice.cubies().iter().all(|c| !c.is_desynced()));
    }

    #[test]
    fn test_reset_restores_solved() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyR);
        h.engine.advance(&mut h.lattice, 1.0).unwrap();
        assert!(!h.lattice.is_solved());

        h.tap(KeyCode::KeyF);
        h.tap(KeyCode::Backspace);
        assert!(!h.lattice.is_solved(), "reset must wait for the turn");

        h.engine.advance(&mut h.lattice, 1.0).unwrap();
        h.tap(KeyCode::Backspace);
        assert!(h.lattice.is_solved());
        assert_eq!(h.selection.picked(), None);
    }

    #[test]
    fn test_right_drag_orbits() {
        let mut h = Harness::new();
        let yaw = h.rig.orbit.yaw_deg();
        h.mouse.on_cursor_moved(10.0, 10.0);
        h.frame(0.0);
        h.mouse.on_button(MouseButton::Right, ElementState::Pressed);
        h.frame(0.0);
        assert_eq!(h.rig.orbit.yaw_deg(), yaw);
        h.mouse.on_cursor_moved(30.0, 10.0);
        h.frame(0.0);
        assert!((h.rig.orbit.yaw_deg() - (yaw + 20.0 * 0.3)).abs() < 1e-3);
        assert!((h.rig.camera().position - h.rig.orbit.position()).length() < 1e-5);
    }

    #[test]
    fn test_motion_without_orbit_button_keeps_camera() {
        let mut h = Harness::new();
        let yaw = h.rig.orbit.yaw_deg();
        h.mouse.on_cursor_moved(50.0, 50.0);
        h.frame(0.0);
        assert_eq!(h.rig.orbit.yaw_deg(), yaw);
    }

    #[test]
    fn test_free_fly_moves_with_arrows() {
        let mut h = Harness::new();
        h.tap(KeyCode::KeyC);
        assert_eq!(h.rig.mode(), CameraMode::FreeFly);
        let start = h.rig.camera().position;
        let forward = h.rig.camera().forward();

        h.keyboard
            .process_raw(RawKeyEvent::new(KeyCode::ArrowUp, ElementState::Pressed));
        h.frame(0.5);
        let moved = h.rig.camera().position - start;
        assert!((moved - forward * h.rig.free_fly.speed * 0.5).length() < 1e-3);
    }

    #[test]
    fn test_rebound_key() {
        let mut h = Harness::new();
        h.bindings
            .set(CubeAction::TurnRight, vec![rubik_input::Binding::Key(KeyCode::KeyI)]);
        h.tap(KeyCode::KeyR);
        assert!(!h.engine.is_turning());
        h.tap(KeyCode::KeyI);
        assert!(h.engine.is_turning());
    }
}
