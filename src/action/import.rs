//! Switching how dropped and pasted content is read

use super::{ActionError, Describe, OneShot};
use crate::host::{DropMode, Host};

/// Set the drop/paste interpretation to geographic data or style image
#[derive(Debug, Clone, Copy)]
pub struct DropModeAction {
    mode: DropMode,
}

impl DropModeAction {
    /// Switch to `mode`
    #[must_use]
    pub const fn new(mode: DropMode) -> Self {
        Self { mode }
    }
}

impl Describe for DropModeAction {
    fn label(&self) -> String {
        format!("DropMode({})", self.mode)
    }

    fn description(&self) -> &str {
        "Changes the mode on to process drag and dropped files."
    }
}

impl OneShot for DropModeAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.set_drop_mode(self.mode);
        Ok(())
    }
}
