// ui/keymap.rs
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::sheet::SheetAction;

// App-level commands, reached when the sheet doesn't consume a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextItem,
    PreviousItem,
    NextTab,
    ToggleHelp,
    Save,
}

pub fn sheet_action(key: KeyEvent) -> Option<SheetAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('r') => Some(SheetAction::Roll),
        KeyCode::Char('a') => Some(SheetAction::Accelerate),
        KeyCode::Char('d') => Some(SheetAction::Decelerate),
        KeyCode::Char('h') => Some(SheetAction::HumanityCostRoll),
        KeyCode::Char('f') => Some(SheetAction::FocusNextField),
        KeyCode::Char(']') | KeyCode::Right => Some(SheetAction::NextOption),
        KeyCode::Char('[') | KeyCode::Left => Some(SheetAction::PreviousOption),
        _ => None,
    }
}

pub fn app_action(key: KeyEvent) -> Option<Action> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(Action::Save),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(Action::Quit),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Action::NextItem),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Action::PreviousItem),
        (KeyCode::Tab, _) => Some(Action::NextTab),
        (KeyCode::Char('?'), _) => Some(Action::ToggleHelp),
        _ => None,
    }
}

pub fn sheet_hint(action: SheetAction) -> &'static str {
    match action {
        SheetAction::Roll => "r roll",
        SheetAction::Accelerate => "a accel",
        SheetAction::Decelerate => "d decel",
        SheetAction::HumanityCostRoll => "h humanity",
        SheetAction::FocusNextField => "f field",
        SheetAction::NextOption => "] next",
        SheetAction::PreviousOption => "[ prev",
    }
}

pub const APP_HINTS: &str = "j/k select | tab switch tab | ? help | q quit";

pub const HELP: &str = r#"
Sheet keys (editable sheets only)
  r      roll the item (weapon attack, skill check)
  a / d  accelerate / decelerate a vehicle
  h      roll humanity cost on cyberware
  f      focus the next editable field
  ] / [  step the focused field to the next / previous option
         (right / left arrows work too)

App keys
  j / k  select next / previous item
  tab    switch between description and details
  ctrl-s save now
  ?      toggle this help
  q      quit
"#;
