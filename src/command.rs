use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Home,
    End,
    Next,
    Prev,
    M,
    P,
    Q,
    R,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if (ev.modifiers, ev.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
            return Some(Command::Quit);
        } else if !normal_modifiers.contains(ev.modifiers) {
            return None;
        }
        match ev.code {
            KeyCode::Char('w' | 'k') | KeyCode::Up => Some(Command::Up),
            KeyCode::Char('s' | 'j') | KeyCode::Down => Some(Command::Down),
            KeyCode::Char('a' | 'h') | KeyCode::Left => Some(Command::Left),
            KeyCode::Char('d' | 'l') | KeyCode::Right => Some(Command::Right),
            KeyCode::Enter => Some(Command::Enter),
            KeyCode::Char(' ') => Some(Command::Space),
            KeyCode::Esc => Some(Command::Esc),
            KeyCode::Home => Some(Command::Home),
            KeyCode::End => Some(Command::End),
            KeyCode::Tab => Some(Command::Next),
            KeyCode::BackTab => Some(Command::Prev),
            KeyCode::Char('m') => Some(Command::M),
            KeyCode::Char('p') => Some(Command::P),
            KeyCode::Char('q') => Some(Command::Q),
            KeyCode::Char('r') => Some(Command::R),
            _ => None,
        }
    }

    /// The `(dx, dy)` movement vector for an arrow command, with north/up
    /// being negative `y`
    pub(crate) fn movement(self) -> Option<(i32, i32)> {
        match self {
            Command::Up => Some((0, -1)),
            Command::Down => Some((0, 1)),
            Command::Left => Some((-1, 0)),
            Command::Right => Some((1, 0)),
            _ => None,
        }
    }
}
