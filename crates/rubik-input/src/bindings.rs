//! Rebindable mapping from keys and mouse buttons to cube actions.
//!
//! [`KeyBindings`] is stored as RON. Discrete actions fire once, on the frame
//! their key goes down or their mouse button is clicked. Held actions
//! (camera fly and orbit) are active while the input stays down.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;
use crate::mouse::MouseState;

/// Serde for [`KeyCode`] using its variant name (`"KeyR"`, `"Space"`).
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        key_from_name(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }

    /// Parses the `Debug` name of the keys the viewer can bind.
    pub fn key_from_name(s: &str) -> Option<KeyCode> {
        Some(match s {
            "KeyA" => KeyCode::KeyA,
            "KeyB" => KeyCode::KeyB,
            "KeyC" => KeyCode::KeyC,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyG" => KeyCode::KeyG,
            "KeyH" => KeyCode::KeyH,
            "KeyI" => KeyCode::KeyI,
            "KeyJ" => KeyCode::KeyJ,
            "KeyK" => KeyCode::KeyK,
            "KeyL" => KeyCode::KeyL,
            "KeyM" => KeyCode::KeyM,
            "KeyN" => KeyCode::KeyN,
            "KeyO" => KeyCode::KeyO,
            "KeyP" => KeyCode::KeyP,
            "KeyQ" => KeyCode::KeyQ,
            "KeyR" => KeyCode::KeyR,
            "KeyS" => KeyCode::KeyS,
            "KeyT" => KeyCode::KeyT,
            "KeyU" => KeyCode::KeyU,
            "KeyV" => KeyCode::KeyV,
            "KeyW" => KeyCode::KeyW,
            "KeyX" => KeyCode::KeyX,
            "KeyY" => KeyCode::KeyY,
            "KeyZ" => KeyCode::KeyZ,
            "Digit0" => KeyCode::Digit0,
            "Digit1" => KeyCode::Digit1,
            "Digit2" => KeyCode::Digit2,
            "Digit3" => KeyCode::Digit3,
            "Digit4" => KeyCode::Digit4,
            "Digit5" => KeyCode::Digit5,
            "Digit6" => KeyCode::Digit6,
            "Digit7" => KeyCode::Digit7,
            "Digit8" => KeyCode::Digit8,
            "Digit9" => KeyCode::Digit9,
            "Space" => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "Comma" => KeyCode::Comma,
            "Period" => KeyCode::Period,
            "Minus" => KeyCode::Minus,
            "Equal" => KeyCode::Equal,
            "BracketLeft" => KeyCode::BracketLeft,
            "BracketRight" => KeyCode::BracketRight,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            _ => return None,
        })
    }
}

/// Everything the user can ask the viewer to do.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CubeAction {
    TurnRight,
    TurnLeft,
    TurnUp,
    TurnDown,
    TurnFront,
    TurnBack,
    /// Flip between clockwise and counter-clockwise turns.
    ToggleDirection,
    /// Double the turn step, up to a half turn.
    DoubleStep,
    /// Halve the turn step, down to a quarter turn.
    HalveStep,
    /// Move the explicit layer selection one slice inward.
    NextLayer,
    PreviousLayer,
    /// Go back to turning the outer face layer.
    WholeLayer,
    /// Switch between orbit and free-fly cameras.
    ToggleCamera,
    /// Select the cubie under the cursor.
    Pick,
    /// Nudge the picked cubie out of its slot.
    Desync,
    /// Restore the solved cube.
    Reset,
    /// Rotate the orbit camera while held.
    Orbit,
    FlyForward,
    FlyBack,
    FlyLeft,
    FlyRight,
    FlyUp,
    FlyDown,
}

impl CubeAction {
    /// Every action, in dispatch order.
    pub const ALL: [CubeAction; 23] = [
        CubeAction::TurnRight,
        CubeAction::TurnLeft,
        CubeAction::TurnUp,
        CubeAction::TurnDown,
        CubeAction::TurnFront,
        CubeAction::TurnBack,
        CubeAction::ToggleDirection,
        CubeAction::DoubleStep,
        CubeAction::HalveStep,
        CubeAction::NextLayer,
        CubeAction::PreviousLayer,
        CubeAction::WholeLayer,
        CubeAction::ToggleCamera,
        CubeAction::Pick,
        CubeAction::Desync,
        CubeAction::Reset,
        CubeAction::Orbit,
        CubeAction::FlyForward,
        CubeAction::FlyBack,
        CubeAction::FlyLeft,
        CubeAction::FlyRight,
        CubeAction::FlyUp,
        CubeAction::FlyDown,
    ];

    /// Whether the action is continuous rather than a one-shot command.
    #[must_use]
    pub fn is_held(self) -> bool {
        matches!(
            self,
            CubeAction::Orbit
                | CubeAction::FlyForward
                | CubeAction::FlyBack
                | CubeAction::FlyLeft
                | CubeAction::FlyRight
                | CubeAction::FlyUp
                | CubeAction::FlyDown
        )
    }

    /// Looks an action up by its variant name, as written in `config.ron`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| format!("{action:?}") == name)
    }
}

/// Serde-friendly subset of [`MouseButton`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseButtonBinding {
    Left,
    Right,
    Middle,
}

impl MouseButtonBinding {
    #[must_use]
    pub fn to_winit(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

/// A physical input an action can be bound to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Binding {
    Key(#[serde(with = "keycode_serde")] KeyCode),
    Mouse(MouseButtonBinding),
}

impl Binding {
    /// Parses `"KeyR"`-style key names and `"MouseLeft"`, `"MouseRight"`, `"MouseMiddle"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "MouseLeft" => Some(Self::Mouse(MouseButtonBinding::Left)),
            "MouseRight" => Some(Self::Mouse(MouseButtonBinding::Right)),
            "MouseMiddle" => Some(Self::Mouse(MouseButtonBinding::Middle)),
            _ => keycode_serde::key_from_name(name).map(Self::Key),
        }
    }

    fn fired(self, keyboard: &KeyboardState, mouse: &MouseState) -> bool {
        match self {
            Self::Key(code) => keyboard.just_pressed(code),
            Self::Mouse(button) => mouse.just_clicked(button.to_winit()),
        }
    }

    fn held(self, keyboard: &KeyboardState, mouse: &MouseState) -> bool {
        match self {
            Self::Key(code) => keyboard.is_pressed(code),
            Self::Mouse(button) => mouse.is_button_pressed(button.to_winit()),
        }
    }
}

/// The same input bound to more than one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub binding: Binding,
    pub actions: Vec<CubeAction>,
}

/// Errors from saving a binding file.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("failed to write bindings: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize bindings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Action to input table. Several inputs per action are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub bindings: HashMap<CubeAction, Vec<Binding>>,
}

impl Default for KeyBindings {
    /// Face letters turn their face, Space flips direction, A and Z
    /// double and halve the step. Arrows and PageUp/PageDown fly.
    fn default() -> Self {
        use Binding::{Key, Mouse};

        let table = [
            (CubeAction::TurnRight, Key(KeyCode::KeyR)),
            (CubeAction::TurnLeft, Key(KeyCode::KeyL)),
            (CubeAction::TurnUp, Key(KeyCode::KeyU)),
            (CubeAction::TurnDown, Key(KeyCode::KeyD)),
            (CubeAction::TurnFront, Key(KeyCode::KeyF)),
            (CubeAction::TurnBack, Key(KeyCode::KeyB)),
            (CubeAction::ToggleDirection, Key(KeyCode::Space)),
            (CubeAction::DoubleStep, Key(KeyCode::KeyA)),
            (CubeAction::HalveStep, Key(KeyCode::KeyZ)),
            (CubeAction::NextLayer, Key(KeyCode::Period)),
            (CubeAction::PreviousLayer, Key(KeyCode::Comma)),
            (CubeAction::WholeLayer, Key(KeyCode::KeyO)),
            (CubeAction::ToggleCamera, Key(KeyCode::KeyC)),
            (CubeAction::Pick, Mouse(MouseButtonBinding::Left)),
            (CubeAction::Desync, Key(KeyCode::KeyX)),
            (CubeAction::Reset, Key(KeyCode::Backspace)),
            (CubeAction::Orbit, Mouse(MouseButtonBinding::Right)),
            (CubeAction::FlyForward, Key(KeyCode::ArrowUp)),
            (CubeAction::FlyBack, Key(KeyCode::ArrowDown)),
            (CubeAction::FlyLeft, Key(KeyCode::ArrowLeft)),
            (CubeAction::FlyRight, Key(KeyCode::ArrowRight)),
            (CubeAction::FlyUp, Key(KeyCode::PageUp)),
            (CubeAction::FlyDown, Key(KeyCode::PageDown)),
        ];

        Self {
            bindings: table
                .into_iter()
                .map(|(action, binding)| (action, vec![binding]))
                .collect(),
        }
    }
}

impl KeyBindings {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Replaces every binding of `action`.
    pub fn set(&mut self, action: CubeAction, bindings: Vec<Binding>) {
        self.bindings.insert(action, bindings);
    }

    #[must_use]
    pub fn get(&self, action: CubeAction) -> &[Binding] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Applies `action name -> input name` overrides from the config file.
    ///
    /// Unknown names are skipped with a warning. Returns how many entries
    /// were applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> usize {
        let mut applied = 0;
        for (action_name, input_name) in overrides {
            let Some(action) = CubeAction::from_name(action_name) else {
                warn!("Unknown action in keybindings: {action_name}");
                continue;
            };
            let Some(binding) = Binding::from_name(input_name) else {
                warn!("Unknown input {input_name:?} for action {action_name}");
                continue;
            };
            self.set(action, vec![binding]);
            applied += 1;
        }
        applied
    }

    /// Discrete actions triggered this frame, in [`CubeAction::ALL`] order.
    #[must_use]
    pub fn triggered(&self, keyboard: &KeyboardState, mouse: &MouseState) -> Vec<CubeAction> {
        CubeAction::ALL
            .into_iter()
            .filter(|action| !action.is_held())
            .filter(|action| self.get(*action).iter().any(|b| b.fired(keyboard, mouse)))
            .collect()
    }

    /// Whether any input bound to `action` is currently down.
    #[must_use]
    pub fn is_held(&self, action: CubeAction, keyboard: &KeyboardState, mouse: &MouseState) -> bool {
        self.get(action).iter().any(|b| b.held(keyboard, mouse))
    }

    /// Inputs bound to more than one action, sorted for stable output.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut seen: HashMap<Binding, Vec<CubeAction>> = HashMap::new();
        for action in CubeAction::ALL {
            for binding in self.get(action) {
                seen.entry(*binding).or_default().push(action);
            }
        }
        let mut conflicts: Vec<Conflict> = seen
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(binding, actions)| Conflict { binding, actions })
            .collect();
        conflicts.sort_by_key(|c| format!("{:?}", c.binding));
        conflicts
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Writes the table to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), BindingError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Reads a table from `path`, falling back to the defaults (with a
    /// warning) if the file is missing or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_ron(&contents).unwrap_or_else(|e| {
                warn!("Malformed keybinding file {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(e) => {
                warn!("Could not read keybinding file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
