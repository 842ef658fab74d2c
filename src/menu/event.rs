//! Key press events as seen by the menu

/// One key press
///
/// Carries the textual key (`"a"`, `"Enter"`, `"Escape"`, ...) and whether an
/// outer handler should still see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    key: String,
    propagation_stopped: bool,
}

impl KeyPress {
    /// Create a key press for the given key name
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            propagation_stopped: false,
        }
    }

    /// The key as delivered
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key in lower case
    #[must_use]
    pub fn normalized(&self) -> String {
        self.key.to_lowercase()
    }

    /// The key as a single lower-case character, if it is one
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().next(),
            _ => None,
        }
    }

    /// The decimal digit this key represents, if any
    #[must_use]
    pub fn digit(&self) -> Option<u32> {
        self.as_char().and_then(|c| c.to_digit(10))
    }

    /// Keep outer handlers from seeing this event
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether [`Self::stop_propagation`] was called
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl From<char> for KeyPress {
    fn from(c: char) -> Self {
        Self::new(c.to_string())
    }
}

impl From<&str> for KeyPress {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
