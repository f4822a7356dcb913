use crate::session::PickerKey;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions on the workspace screen, while the picker is closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Open the file picker
    TogglePicker,
    /// Launch the file shown in the current view again
    OpenCurrent,
    /// Move to next view
    NextView,
    /// Move to previous view
    PreviousView,
    /// No action
    None,
}

/// Actions while the picker popup is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupAction {
    /// Close the picker with the same key that opened it
    Toggle,
    /// Choose the highlighted entry
    Confirm,
    /// Hand the key to the picker session
    Key(PickerKey),
}

/// Key presses only; releases, repeats and non-key events yield `None`
pub fn pressed_key(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// Maps keyboard events on the workspace screen to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Picker: Ctrl+P or /
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => KeyAction::TogglePicker,
        (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::TogglePicker,

        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::OpenCurrent,

        // Navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::NextView,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::PreviousView,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::NextView,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::PreviousView,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events inside the picker popup
pub fn handle_popup_key(key: KeyEvent) -> PopupAction {
    let picker_key = match (key.code, key.modifiers) {
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => return PopupAction::Toggle,
        (KeyCode::Enter, _) => return PopupAction::Confirm,

        (KeyCode::Esc, _) => PickerKey::Escape,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => PickerKey::Escape,

        // Query editing
        (KeyCode::Backspace, _) => PickerKey::Backspace,
        (KeyCode::Char('h'), KeyModifiers::CONTROL) => PickerKey::Backspace,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => PickerKey::ClearLine,

        // List movement
        (KeyCode::Up, _) => PickerKey::ArrowUp,
        (KeyCode::Down, _) => PickerKey::ArrowDown,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => PickerKey::ArrowDown,
        (KeyCode::PageUp, _) => PickerKey::PageUp,
        (KeyCode::PageDown, _) => PickerKey::PageDown,
        (KeyCode::Home, _) => PickerKey::Home,
        (KeyCode::End, _) => PickerKey::End,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => PickerKey::ScrollUp,
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => PickerKey::ScrollDown,

        (KeyCode::Char(' '), _) => PickerKey::Space,
        (KeyCode::Char(c), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
            PickerKey::PrintableChar(c)
        }

        _ => PickerKey::Other,
    };
    PopupAction::Key(picker_key)
}
