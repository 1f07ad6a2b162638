//! Key bindings: arrows plus the a/d/s/w/q letter keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    Pause,
    Confirm,
    Quit,
    None,
}

/// Map key event to game action. Letters are matched case-insensitively.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('a') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') => Action::MoveRight,
        KeyCode::Down | KeyCode::Char('s') => Action::SoftDrop,
        KeyCode::Up | KeyCode::Char('w') => Action::RotateCw,
        KeyCode::Char('q') => Action::RotateCcw,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Confirm,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Action {
        key_to_action(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrows_and_letters_agree() {
        assert_eq!(press(KeyCode::Left), press(KeyCode::Char('a')));
        assert_eq!(press(KeyCode::Right), press(KeyCode::Char('d')));
        assert_eq!(press(KeyCode::Down), press(KeyCode::Char('s')));
        assert_eq!(press(KeyCode::Up), press(KeyCode::Char('w')));
        assert_eq!(press(KeyCode::Char('q')), Action::RotateCcw);
    }

    #[test]
    fn test_shifted_letters_still_map() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(key), Action::MoveLeft);
    }

    #[test]
    fn test_ctrl_c_quits_other_chords_ignored() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT)),
            Action::None
        );
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(press(KeyCode::Enter), Action::Confirm);
        assert_eq!(press(KeyCode::Char(' ')), Action::Confirm);
        assert_eq!(press(KeyCode::Esc), Action::Quit);
        assert_eq!(press(KeyCode::Char('p')), Action::Pause);
        assert_eq!(press(KeyCode::Char('x')), Action::None);
    }
}
