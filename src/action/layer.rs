//! Layer management actions

use super::{ActionError, Describe, DigitBuffer, Modal, OneShot};
use crate::host::Host;
use crate::menu::KeyPress;
use tracing::info;

/// Add a new empty layer and make it active
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerAddAction;

impl Describe for LayerAddAction {
    fn label(&self) -> String {
        "LayerAdd".to_string()
    }

    fn description(&self) -> &str {
        "Add a new (empty) layer and select it."
    }
}

impl OneShot for LayerAddAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let index = host.layer_add();
        info!(index, "Added layer");
        Ok(())
    }
}

/// Select the active layer by typing its index
///
/// Digits typed while started accumulate; the execute key activates the
/// layer, the navigate-up key discards the digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerSelectAction {
    input: DigitBuffer,
}

impl LayerSelectAction {
    /// Nothing typed yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: DigitBuffer::new(),
        }
    }
}

impl Describe for LayerSelectAction {
    fn label(&self) -> String {
        "LayerSelect".to_string()
    }

    fn description(&self) -> &str {
        "Select the active layer by index. Enter the index number (starting by 1) and press the execute key."
    }
}

impl Modal for LayerSelectAction {
    fn start(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.input.clear();
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyPress, _host: &mut dyn Host) {
        self.input.push(key);
    }

    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let index = self.input.take().ok_or(ActionError::NoIndex)?;
        host.layer_activate(index)?;
        info!(index, "Activated layer");
        Ok(())
    }

    fn abort(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.input.clear();
        Ok(())
    }

    fn pending_input(&self) -> Option<String> {
        self.input.value().map(|value| value.to_string())
    }
}

/// Delete the active layer
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerDeleteAction;

impl Describe for LayerDeleteAction {
    fn label(&self) -> String {
        "LayerDelete".to_string()
    }

    fn description(&self) -> &str {
        "Delete the active layer."
    }
}

impl OneShot for LayerDeleteAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.layer_delete()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::test_support::RecordingHost;
    use crate::host::HostError;

    fn type_keys(action: &mut LayerSelectAction, host: &mut RecordingHost, keys: &str) {
        for c in keys.chars() {
            action.handle_key(&KeyPress::from(c), host);
        }
    }

    #[test]
    fn test_layer_add() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        LayerAddAction.start(&mut host)?;
        assert_eq!(host.layers, 2);
        assert_eq!(host.active, Some(2));
        Ok(())
    }

    #[test]
    fn test_layer_select_stop_activates_typed_index() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(12);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "12");
        assert_eq!(action.pending_input().as_deref(), Some("12"));

        action.stop(&mut host)?;
        assert_eq!(host.calls, vec!["layer_activate(12)".to_string()]);
        assert_eq!(host.active, Some(12));
        Ok(())
    }

    #[test]
    fn test_layer_select_abort_discards_input() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(12);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "12");

        action.abort(&mut host)?;
        assert!(host.calls.is_empty());
        assert_eq!(action.pending_input(), None);
        Ok(())
    }

    #[test]
    fn test_layer_select_ignores_non_digits() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(3);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "a2b");
        assert_eq!(action.pending_input().as_deref(), Some("2"));
        Ok(())
    }

    #[test]
    fn test_layer_select_without_input_fails() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(3);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        assert!(matches!(action.stop(&mut host), Err(ActionError::NoIndex)));
        assert!(host.calls.is_empty());
        Ok(())
    }

    #[test]
    fn test_layer_select_out_of_range() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(2);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "5");
        assert!(matches!(
            action.stop(&mut host),
            Err(ActionError::Host(HostError::NoSuchLayer(5)))
        ));
        Ok(())
    }

    #[test]
    fn test_layer_select_restart_clears_previous_digits() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(9);
        let mut action = LayerSelectAction::default();
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "4");
        action.start(&mut host)?;
        type_keys(&mut action, &mut host, "3");
        action.stop(&mut host)?;
        assert_eq!(host.active, Some(3));
        Ok(())
    }

    #[test]
    fn test_layer_delete_reports_host_failure() {
        let mut host = RecordingHost::with_layers(1);
        host.fail_with = Some(|| HostError::NoSuchLayer(1));
        assert!(LayerDeleteAction.start(&mut host).is_err());
        assert_eq!(host.calls, vec!["layer_delete".to_string()]);
    }
}
