use std::collections::HashSet;

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
    Digit(u8),
}

impl KeyCode {
    /// Letter keys are stored upper case so `'w'` and `'W'` name the same key.
    pub fn character(ch: char) -> Self {
        Self::Character(ch.to_ascii_uppercase())
    }
}

/// Non-printable keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Space,
    Enter,
    Escape,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

/// Keyboard snapshot for the current frame.
///
/// Tracks which keys are held and which went down since the last call to
/// [`InputState::end_frame`]. Auto-repeat presses of a key that is already
/// held do not count as a new press.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn set_key_up(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Accumulates scroll wheel movement in lines; positive is away from the user.
    pub fn add_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Forgets per-frame edges and scroll; held keys stay held.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.scroll = 0.0;
    }

    /// Drops all held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_are_case_insensitive() {
        assert_eq!(KeyCode::character('w'), KeyCode::character('W'));
        assert_eq!(KeyCode::character('q'), KeyCode::Character('Q'));
    }

    #[test]
    fn input_state_tracks_keys() {
        let mut state = InputState::new();
        state.set_key_down(KeyCode::Named(NamedKey::Space));
        assert!(state.is_key_down(KeyCode::Named(NamedKey::Space)));
        state.set_key_up(KeyCode::Named(NamedKey::Space));
        assert!(!state.is_key_down(KeyCode::Named(NamedKey::Space)));
    }

    #[test]
    fn press_is_reported_once_while_held() {
        let mut state = InputState::new();
        let key = KeyCode::character('r');
        state.set_key_down(key);
        assert!(state.was_key_pressed(key));
        state.end_frame();

        // auto-repeat
        state.set_key_down(key);
        assert!(state.is_key_down(key));
        assert!(!state.was_key_pressed(key));

        state.set_key_up(key);
        state.set_key_down(key);
        assert!(state.was_key_pressed(key));
    }

    #[test]
    fn scroll_resets_each_frame() {
        let mut state = InputState::new();
        state.add_scroll(1.0);
        state.add_scroll(0.5);
        assert_eq!(state.scroll(), 1.5);
        state.end_frame();
        assert_eq!(state.scroll(), 0.0);
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut state = InputState::new();
        state.set_key_down(KeyCode::Digit(1));
        state.release_all();
        assert!(!state.is_key_down(KeyCode::Digit(1)));
        assert!(!state.was_key_pressed(KeyCode::Digit(1)));
    }
}
