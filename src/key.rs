//! Key bindings for card-mode navigation and row toggling.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A single action bound to one or more key codes, with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Key codes that trigger the action.
    pub keys: Vec<KeyCode>,
    /// Short form of the keys for help display (e.g. "↑/k").
    pub help: String,
    /// What the action does (e.g. "previous row").
    pub description: String,
}

impl Binding {
    /// Creates a binding for the given key codes.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the help key text and description (builder pattern).
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Returns true if the key message matches one of this binding's keys.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys.contains(&msg.key)
    }
}

/// Key bindings used by the widget while the card view is active.
#[derive(Debug, Clone)]
pub struct ViewTableKeyMap {
    /// Move the row cursor up.
    pub cursor_up: Binding,
    /// Move the row cursor down.
    pub cursor_down: Binding,
    /// Expand or collapse the focused row's detail section.
    pub toggle_row: Binding,
}

impl Default for ViewTableKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')])
                .with_help("↑/k", "previous row"),
            cursor_down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "next row"),
            toggle_row: Binding::new(vec![KeyCode::Enter, KeyCode::Char(' ')])
                .with_help("enter/space", "expand/collapse"),
        }
    }
}
