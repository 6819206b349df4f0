use crate::input::{KeyCode, NamedKey};

/// Logical inputs understood by the transform controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CameraForward,
    CameraBackward,
    CameraLeft,
    CameraRight,
    CameraUp,
    CameraDown,
    ObjectForward,
    ObjectBackward,
    ObjectLeft,
    ObjectRight,
    ObjectUp,
    ObjectDown,
    CameraPresetFront,
    CameraPresetBack,
    ToggleOrbit,
    ToggleSpin,
    Reset,
}

impl Action {
    pub const CAMERA_MOVES: [Action; 6] = [
        Action::CameraForward,
        Action::CameraBackward,
        Action::CameraLeft,
        Action::CameraRight,
        Action::CameraUp,
        Action::CameraDown,
    ];

    pub const OBJECT_MOVES: [Action; 6] = [
        Action::ObjectForward,
        Action::ObjectBackward,
        Action::ObjectLeft,
        Action::ObjectRight,
        Action::ObjectUp,
        Action::ObjectDown,
    ];
}

/// Key assigned to each [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    entries: Vec<(Action, KeyCode)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        Self {
            entries: vec![
                (CameraForward, KeyCode::character('W')),
                (CameraBackward, KeyCode::character('S')),
                (CameraLeft, KeyCode::character('A')),
                (CameraRight, KeyCode::character('D')),
                (CameraUp, KeyCode::character('Q')),
                (CameraDown, KeyCode::character('E')),
                (ObjectForward, KeyCode::character('I')),
                (ObjectBackward, KeyCode::character('K')),
                (ObjectLeft, KeyCode::character('J')),
                (ObjectRight, KeyCode::character('L')),
                (ObjectUp, KeyCode::character('U')),
                (ObjectDown, KeyCode::character('O')),
                (CameraPresetFront, KeyCode::Digit(1)),
                (CameraPresetBack, KeyCode::Digit(2)),
                (ToggleOrbit, KeyCode::character('R')),
                (ToggleSpin, KeyCode::character('T')),
                (Reset, KeyCode::Named(NamedKey::Backspace)),
            ],
        }
    }
}

impl KeyBindings {
    pub fn key_for(&self, action: Action) -> Option<KeyCode> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == action)
            .map(|(_, key)| *key)
    }
}
