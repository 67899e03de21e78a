use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    None,
}

pub fn handle_key(key: KeyEvent) -> Action {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _)
        | (KeyCode::Char('Q'), _)
        | (KeyCode::Esc, _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Quit);
    }

    #[test]
    fn other_keys_ignored() {
        assert_eq!(handle_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), Action::None);
        assert_eq!(handle_key(key(KeyCode::Enter, KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn release_is_ignored() {
        let mut k = key(KeyCode::Char('q'), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(handle_key(k), Action::None);
    }
}
