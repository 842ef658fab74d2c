//! Reserved menu keys

use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// The two keys the command tree may never bind
///
/// `execute` stops the started modal action, `navigate_up` aborts it or
/// leaves the current branch. Comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedKeys {
    /// Confirms the started modal action
    #[serde(default = "default_execute")]
    pub execute: String,

    /// Aborts the started modal action or goes up one level
    #[serde(default = "default_navigate_up")]
    pub navigate_up: String,
}

fn default_execute() -> String {
    "Enter".to_string()
}

fn default_navigate_up() -> String {
    "Escape".to_string()
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            execute: default_execute(),
            navigate_up: default_navigate_up(),
        }
    }
}

impl ReservedKeys {
    /// Use the given key names
    #[must_use]
    pub fn new(execute: impl Into<String>, navigate_up: impl Into<String>) -> Self {
        Self {
            execute: execute.into(),
            navigate_up: navigate_up.into(),
        }
    }

    /// Whether `key` is the execute key
    #[must_use]
    pub fn is_execute(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.execute)
    }

    /// Whether `key` is the navigate-up key
    #[must_use]
    pub fn is_navigate_up(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.navigate_up)
    }

    /// Whether a tree key would shadow one of the reserved keys
    #[must_use]
    pub fn collides(&self, key: char) -> bool {
        let mut buf = [0; 4];
        let key = key.encode_utf8(&mut buf);
        self.is_execute(key) || self.is_navigate_up(key)
    }

    /// The key name for one of the reserved keys, as typed in autopilot scripts
    #[must_use]
    pub fn reserved_name(&self, token: &str) -> Option<&str> {
        if self.is_execute(token) {
            Some(&self.execute)
        } else if self.is_navigate_up(token) {
            Some(&self.navigate_up)
        } else {
            None
        }
    }
}

/// Name a terminal key the way the menu expects it
///
/// Returns `None` for keys the menu has no use for and for chords with
/// Ctrl or Alt, which belong to the application.
#[must_use]
pub fn key_name(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    let name = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };
    Some(name)
}
