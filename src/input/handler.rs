use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Jump,
    Restart,
    Pause,
    /// Playback speed preset, 1 (slowest) to 4 (fastest)
    Speed(u8),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Up => KeyAction::Jump,
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Jump,

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,
            KeyCode::Char(c @ '1'..='4') => KeyAction::Speed(c as u8 - b'0'),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_jump_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char(' '))), KeyAction::Jump);
        assert_eq!(handler.handle_key_event(press(KeyCode::Up)), KeyAction::Jump);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('w'))), KeyAction::Jump);

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(w_upper), KeyAction::Jump);
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let q_upper = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(q_upper), KeyAction::Quit);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_restart_and_pause() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('p'))), KeyAction::Pause);
    }

    #[test]
    fn test_speed_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('1'))), KeyAction::Speed(1));
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('4'))), KeyAction::Speed(4));
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('5'))), KeyAction::None);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handler.handle_key_event(press(KeyCode::Left)), KeyAction::None);
    }
}
