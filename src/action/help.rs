//! Help action

use super::{ActionError, Describe, OneShot};
use crate::host::Host;

/// Show (or hide) the keyboard menu structure
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpAction;

impl Describe for HelpAction {
    fn label(&self) -> String {
        "Help".to_string()
    }

    fn description(&self) -> &str {
        "Show the keyboard-based menu."
    }
}

impl OneShot for HelpAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.toggle_help();
        Ok(())
    }
}
