use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    Parent,
    EnterDir,
    Open,
    Top,
    Bottom,
    PageUp,
    PageDown,
    Delete,
    Create,
    Rename,
    Yank,
    Paste,
    Edit,
    Run,
    Home,
    Find,
    Shell,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    Click { x: u16, y: u16 },
    Scroll { x: u16, y: u16, steps: isize },
    Resize { width: u16, height: u16 },
}

pub fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) => key_action(key).map(Input::Action),
        Event::Mouse(mouse) => mouse_input(mouse),
        Event::Resize(width, height) => Some(Input::Resize { width, height }),
        _ => None,
    }
}

pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Left | KeyCode::Char('h') => Action::Parent,
        KeyCode::Right | KeyCode::Char('l') => Action::EnterDir,
        KeyCode::Enter => Action::Open,
        KeyCode::Home | KeyCode::Char('g') => Action::Top,
        KeyCode::End | KeyCode::Char('G') => Action::Bottom,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Delete | KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('n') => Action::Create,
        KeyCode::Char('r') => Action::Rename,
        KeyCode::Char('y') => Action::Yank,
        KeyCode::Char('p') => Action::Paste,
        KeyCode::Char('e') => Action::Edit,
        KeyCode::Char('x') => Action::Run,
        KeyCode::Char('~') => Action::Home,
        KeyCode::Char('/') => Action::Find,
        KeyCode::Char('!') => Action::Shell,
        KeyCode::Char('R') => Action::Reload,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn mouse_input(mouse: MouseEvent) -> Option<Input> {
    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Input::Click { x, y }),
        MouseEventKind::ScrollDown => Some(Input::Scroll { x, y, steps: 1 }),
        MouseEventKind::ScrollUp => Some(Input::Scroll { x, y, steps: -1 }),
        _ => None,
    }
}

/// Any key press, used to leave modal screens.
pub fn is_key_press(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind == KeyEventKind::Press)
}
