//! One running cube: lattice, turn engine, selection, cameras and input,
//! plus a queue of moves waiting to be animated.

use std::collections::VecDeque;

use tracing::{info, instrument, warn};
use winit::event::{DeviceEvent, WindowEvent};

use rubik_config::Config;
use rubik_cube::{
    CubeLattice, Move, NotationError, Selection, TurnEngine, TurnError, TurnProgress, TurnSpec,
    parse_moves, scramble,
};
use rubik_input::{KeyBindings, KeyboardState, MouseState};
use rubik_render::{
    Camera, CameraMode, CameraRig, DrawList, OrbitCamera, PickInstance, PickSource,
    build_draw_list, build_picking_list,
};

use crate::controller::{FrameTargets, InputController};

/// Starting orbit yaw. The camera starts on the -Z side of the cube.
const INITIAL_YAW_DEG: f32 = -90.0;

/// Everything one interactive cube needs between frames.
///
/// Feed winit events through [`handle_window_event`](Self::handle_window_event)
/// and [`handle_device_event`](Self::handle_device_event), call
/// [`update`](Self::update) once per fixed step, then draw from
/// [`draw_list`](Self::draw_list).
pub struct Session {
    lattice: CubeLattice,
    engine: TurnEngine,
    selection: Selection,
    rig: CameraRig,
    controller: InputController,
    bindings: KeyBindings,
    keyboard: KeyboardState,
    mouse: MouseState,
    queue: VecDeque<TurnSpec>,
}

impl Session {
    /// Builds a solved cube from `config`. Key binding overrides from the
    /// config are applied on top of `bindings`.
    #[instrument(skip_all, fields(size = config.cube.size))]
    pub fn new(config: &Config, mut bindings: KeyBindings) -> Self {
        let applied = bindings.apply_overrides(&config.input.keybindings);
        if applied > 0 {
            info!("Applied {applied} key binding overrides");
        }
        for conflict in bindings.detect_conflicts() {
            warn!(
                "{:?} is bound to several actions: {:?}",
                conflict.binding, conflict.actions
            );
        }

        let cam = &config.camera;
        let mut orbit = OrbitCamera::new(INITIAL_YAW_DEG, 0.0, cam.orbit_radius);
        orbit.sensitivity = cam.orbit_sensitivity;
        orbit.zoom_step = cam.zoom_step;
        let camera = Camera::perspective(cam.fov_deg, 1.0, cam.near, cam.far);
        let mut rig = CameraRig::new(camera, orbit, cam.fly_speed);
        rig.set_viewport(config.window.width, config.window.height);
        if cam.free_fly {
            rig.toggle_mode();
        }

        let mut controller = InputController::new(config.cube.step_deg);
        controller.mouse_sensitivity = config.input.mouse_sensitivity;
        controller.invert_y = config.input.invert_y;

        let lattice = CubeLattice::new(config.cube.size, config.cube.spacing);
        info!(
            "Created {0}x{0}x{0} cube with {1} cubies",
            lattice.size(),
            lattice.cubies().len()
        );

        let mut mouse = MouseState::new();
        mouse.set_captured(rig.mode() == CameraMode::FreeFly);

        Self {
            lattice,
            engine: TurnEngine::new(config.cube.turn_speed_deg_s),
            selection: Selection::default(),
            rig,
            controller,
            bindings,
            keyboard: KeyboardState::new(),
            mouse,
            queue: VecDeque::new(),
        }
    }

    pub fn lattice(&self) -> &CubeLattice {
        &self.lattice
    }

    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardState {
        &mut self.keyboard
    }

    pub fn mouse_mut(&mut self) -> &mut MouseState {
        &mut self.mouse
    }

    /// Turns waiting behind the active one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// No turn animating and nothing queued.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && !self.engine.is_turning()
    }

    /// Queues `moves` for animation. Either every move is queued or, on
    /// error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`NotationError::DepthOutOfRange`] for a move deeper than the
    /// cube.
    pub fn queue_moves(&mut self, moves: &[Move]) -> Result<usize, NotationError> {
        let size = self.lattice.size();
        let specs = moves
            .iter()
            .map(|m| m.to_turn(size))
            .collect::<Result<Vec<_>, _>>()?;
        self.queue.extend(specs);
        Ok(moves.len())
    }

    /// Parses and queues a move sequence such as `"R U R' U'"`.
    ///
    /// # Errors
    ///
    /// Returns the first parse or range error; nothing is queued then.
    #[instrument(skip(self))]
    pub fn queue_notation(&mut self, notation: &str) -> Result<usize, NotationError> {
        let moves = parse_moves(notation)?;
        self.queue_moves(&moves)
    }

    /// Queues a reproducible random scramble and returns its moves.
    #[instrument(skip(self))]
    pub fn queue_scramble(&mut self, length: usize, seed: u64) -> Vec<Move> {
        let moves = scramble(self.lattice.size(), length, seed);
        // Scramble depths never exceed the cube, so conversion cannot fail.
        let size = self.lattice.size();
        self.queue
            .extend(moves.iter().filter_map(|m| m.to_turn(size).ok()));
        moves
    }

    /// Routes a window event into the input state.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(*button, *state),
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(*delta),
            WindowEvent::CursorEntered { .. } => self.mouse.on_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::Resized(size) => self.rig.set_viewport(size.width, size.height),
            _ => {}
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse.on_raw_motion(*dx, *dy);
        }
    }

    /// Advances the session by `dt` seconds: applies this frame's input,
    /// starts the next queued turn when the engine is free, and animates.
    ///
    /// # Errors
    ///
    /// A [`TurnError`] from a commit. The lattice is unchanged by the failed
    /// turn, but the error means an invariant broke and the session should
    /// stop.
    pub fn update(
        &mut self,
        dt: f32,
        picker: Option<&mut dyn PickSource>,
    ) -> Result<TurnProgress, TurnError> {
        self.controller.handle_frame(
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
            picker,
        );
        self.keyboard.end_frame();
        self.mouse.end_frame();
        self.mouse
            .set_captured(self.rig.mode() == CameraMode::FreeFly);

        if !self.engine.is_turning() {
            if let Some(spec) = self.queue.pop_front() {
                if !self.engine.start(spec).is_started() {
                    warn!("Dropped queued turn {spec:?}");
                }
            }
        }

        let progress = self.engine.advance(&mut self.lattice, dt)?;
        if progress.committed && self.lattice.is_solved() {
            info!("Cube solved");
        }
        Ok(progress)
    }

    pub fn draw_list(&self) -> DrawList {
        build_draw_list(&self.lattice, &self.engine, &self.selection)
    }

    pub fn picking_list(&self) -> Vec<PickInstance> {
        build_picking_list(&self.lattice, &self.engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubik_cube::{Face, LayerSelect, invert_moves};
    use rubik_input::RawKeyEvent;
    use rubik_render::Projection;
    use winit::dpi::PhysicalSize;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    fn session() -> Session {
        Session::new(&Config::default(), KeyBindings::default())
    }

    /// One second per update finishes any quarter or half turn at the
    /// default speed.
    fn run_until_idle(session: &mut Session) -> usize {
        let mut frames = 0;
        while !session.is_idle() {
            session.update(1.0, None).unwrap();
            frames += 1;
            assert!(frames < 10_000, "session never went idle");
        }
        frames
    }

    #[test]
    fn test_new_session_is_solved_and_idle() {
        let session = session();
        assert_eq!(session.lattice().cubies().len(), 27);
        assert!(session.lattice().is_solved());
        assert!(session.is_idle());
        assert_eq!(session.draw_list().len(), 27);
        assert_eq!(session.picking_list().len(), 27);
    }

    #[test]
    fn test_config_sets_up_cube_and_camera() {
        let mut config = Config::default();
        config.cube.size = 4;
        config.cube.turn_speed_deg_s = 360.0;
        config.window.width = 1600;
        config.camera.free_fly = true;
        let session = Session::new(&config, KeyBindings::default());
        assert_eq!(session.lattice().size(), 4);
        assert_eq!(session.engine().speed(), 360.0);
        assert_eq!(session.rig().mode(), CameraMode::FreeFly);
        assert!(matches!(
            session.rig().camera().projection,
            Projection::Perspective { aspect_ratio, .. } if (aspect_ratio - 2.0).abs() < 1e-6
        ));
    }

    #[test]
    fn test_queued_moves_play_in_order() {
        let mut session = session();
        assert_eq!(session.queue_notation("R U R' U'").unwrap(), 4);
        assert_eq!(session.queued(), 4);
        assert_eq!(run_until_idle(&mut session), 4);
        assert_eq!(session.engine().committed_turns(), 4);
        assert!(!session.lattice().is_solved());

        session.queue_notation("U R U' R'").unwrap();
        run_until_idle(&mut session);
        assert!(session.lattice().is_solved());
    }

    #[test]
    fn test_bad_notation_queues_nothing() {
        let mut session = session();
        assert!(matches!(
            session.queue_notation("R Q"),
            Err(NotationError::UnknownFace('Q'))
        ));
        assert!(matches!(
            session.queue_notation("R 4R"),
            Err(NotationError::DepthOutOfRange { depth: 4, size: 3 })
        ));
        assert_eq!(session.queued(), 0);
        assert_eq!(session.queue_notation("").unwrap(), 0);
    }

    #[test]
    fn test_scramble_and_inverse_solve() {
        let mut config = Config::default();
        config.cube.size = 4;
        let mut session = Session::new(&config, KeyBindings::default());
        let moves = session.queue_scramble(25, 7);
        assert_eq!(session.queued(), 25);
        run_until_idle(&mut session);
        assert!(!session.lattice().is_solved());

        session.queue_moves(&invert_moves(&moves)).unwrap();
        run_until_idle(&mut session);
        assert!(session.lattice().is_solved());
    }

    #[test]
    fn test_slice_move_uses_inner_layer() {
        let mut session = session();
        session.queue_notation("2R").unwrap();
        session.update(0.1, None).unwrap();
        let turn = session.engine().active_turn().unwrap();
        assert_eq!(turn.axis(), Face::PosX.signed_axis());
        assert_eq!(turn.layer(), LayerSelect::Index(1));
    }

    #[test]
    fn test_key_turn_waits_for_queue() {
        let mut session = session();
        session.queue_notation("U").unwrap();
        session.update(0.1, None).unwrap();
        session
            .keyboard_mut()
            .process_raw(RawKeyEvent::new(KeyCode::KeyR, ElementState::Pressed));
        session.update(0.1, None).unwrap();
        // The key press arrived while U was animating and was dropped.
        assert_eq!(
            session.engine().active_turn().unwrap().axis(),
            Face::PosY.signed_axis()
        );
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut session = session();
        session.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(900, 300)));
        assert!(matches!(
            session.rig().camera().projection,
            Projection::Perspective { aspect_ratio, .. } if (aspect_ratio - 3.0).abs() < 1e-6
        ));
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let mut session = session();
        session
            .keyboard_mut()
            .process_raw(RawKeyEvent::new(KeyCode::ArrowUp, ElementState::Pressed));
        session.handle_window_event(&WindowEvent::Focused(false));
        assert!(!session.keyboard_mut().is_pressed(KeyCode::ArrowUp));
    }

    #[test]
    fn test_raw_motion_only_in_free_fly() {
        let mut session = session();
        session.handle_device_event(&DeviceEvent::MouseMotion { delta: (5.0, 0.0) });
        assert_eq!(session.mouse_mut().delta(), glam::Vec2::ZERO);

        session
            .keyboard_mut()
            .process_raw(RawKeyEvent::new(KeyCode::KeyC, ElementState::Pressed));
        session.update(0.0, None).unwrap();
        assert_eq!(session.rig().mode(), CameraMode::FreeFly);
        session.handle_device_event(&DeviceEvent::MouseMotion { delta: (5.0, 0.0) });
        assert_eq!(session.mouse_mut().delta(), glam::Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_config_keybinding_override() {
        let mut config = Config::default();
        config
            .input
            .keybindings
            .insert("TurnRight".to_string(), "KeyI".to_string());
        let session = Session::new(&config, KeyBindings::default());
        assert_eq!(
            session.bindings().get(rubik_input::CubeAction::TurnRight),
            &[rubik_input::Binding::Key(KeyCode::KeyI)]
        );
    }
}
