//! Feature editing actions
//!
//! Drawing, modifying and deleting hold a map interaction open while they
//! are started. Filtering reads a layer index like layer selection does.

use super::{ActionError, Describe, DigitBuffer, Modal, release_interaction};
use crate::host::{GeoFormat, GeometryKind, Host, HostError, Interaction, InteractionId};
use crate::menu::KeyPress;
use tracing::info;

/// Draw new features into the active layer
#[derive(Debug, Clone, Copy)]
pub struct FeatureAddAction {
    kind: GeometryKind,
    interaction: Option<InteractionId>,
}

impl FeatureAddAction {
    /// Draw features of the given geometry type
    #[must_use]
    pub const fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            interaction: None,
        }
    }
}

impl Describe for FeatureAddAction {
    fn label(&self) -> String {
        format!("FeatureAdd({})", self.kind)
    }

    fn description(&self) -> &str {
        "Add new features to current active layer."
    }
}

impl Modal for FeatureAddAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        self.interaction = Some(host.begin_interaction(Interaction::Draw(self.kind))?);
        Ok(())
    }

    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        release_interaction(&mut self.interaction, host);
        Ok(())
    }
}

/// Modify existing features of the active layer
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureModifyAction {
    interaction: Option<InteractionId>,
}

impl Describe for FeatureModifyAction {
    fn label(&self) -> String {
        "FeatureModify".to_string()
    }

    fn description(&self) -> &str {
        "Modify existing features (e.g., move)."
    }
}

impl Modal for FeatureModifyAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        self.interaction = Some(host.begin_interaction(Interaction::Modify)?);
        Ok(())
    }

    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        release_interaction(&mut self.interaction, host);
        Ok(())
    }
}

/// Delete features of the active layer
///
/// While started the host holds a delete interaction for pointer
/// selection; typing a feature index and pressing the execute key deletes
/// that feature instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeleteAction {
    interaction: Option<InteractionId>,
    input: DigitBuffer,
}

impl Describe for FeatureDeleteAction {
    fn label(&self) -> String {
        "FeatureDelete".to_string()
    }

    fn description(&self) -> &str {
        "Delete existing features. Select them, or enter the index of one (starting by 1) and press the execute key."
    }
}

impl Modal for FeatureDeleteAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        self.input.clear();
        self.interaction = Some(host.begin_interaction(Interaction::Delete)?);
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyPress, _host: &mut dyn Host) {
        self.input.push(key);
    }

    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        release_interaction(&mut self.interaction, host);
        if let Some(index) = self.input.take() {
            host.feature_delete(index)?;
            info!(index, "Deleted feature");
        }
        Ok(())
    }

    fn abort(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        release_interaction(&mut self.interaction, host);
        self.input.clear();
        Ok(())
    }

    fn pending_input(&self) -> Option<String> {
        self.input.value().map(|value| value.to_string())
    }
}

/// Export the features of the active layer that lie inside (or outside) the
/// features of another layer, chosen by typing its index
#[derive(Debug, Clone, Copy)]
pub struct FeatureFilterAction {
    inside: bool,
    format: GeoFormat,
    input: DigitBuffer,
}

impl FeatureFilterAction {
    /// Filter for features inside (`true`) or outside (`false`), exporting as GeoJSON
    #[must_use]
    pub const fn new(inside: bool) -> Self {
        Self {
            inside,
            format: GeoFormat::GeoJson,
            input: DigitBuffer::new(),
        }
    }

    /// Export the result in another format
    #[must_use]
    pub const fn with_format(mut self, format: GeoFormat) -> Self {
        self.format = format;
        self
    }
}

impl Describe for FeatureFilterAction {
    fn label(&self) -> String {
        format!("FeatureFilter(inside: {})", self.inside)
    }

    fn description(&self) -> &str {
        "Export all features of the active layer that are inside/outside the features (e.g., polygons) of another layer. Enter its index number (starting by 1) and press the execute key."
    }
}

impl Modal for FeatureFilterAction {
    fn start(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.input.clear();
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyPress, _host: &mut dyn Host) {
        self.input.push(key);
    }

    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let filter = self.input.take().ok_or(ActionError::NoIndex)?;
        let target = host.active_layer().ok_or(HostError::NoActiveLayer)?;
        info!(target, filter, inside = self.inside, "Filtering layer");
        let features = host.filter_features(target, filter, self.inside)?;
        host.export_features(self.format, &features)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::test_support::RecordingHost;
    use crate::host::Feature;

    #[test]
    fn test_feature_add_holds_interaction_until_stop() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        let mut action = FeatureAddAction::new(GeometryKind::Polygon);
        assert_eq!(action.label(), "FeatureAdd(Polygon)");

        action.start(&mut host)?;
        assert_eq!(host.interactions.len(), 1);
        action.stop(&mut host)?;
        assert!(host.interactions.is_empty());
        assert_eq!(
            host.calls,
            vec!["begin(draw Polygon)".to_string(), "end(1)".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_feature_modify_abort_releases_interaction() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        let mut action = FeatureModifyAction::default();
        action.start(&mut host)?;
        action.abort(&mut host)?;
        assert!(host.interactions.is_empty());
        Ok(())
    }

    #[test]
    fn test_feature_delete_start_failure_holds_nothing() {
        let mut host = RecordingHost::with_layers(1);
        host.fail_with = Some(|| HostError::NoSuchLayer(1));
        let mut action = FeatureDeleteAction::default();
        assert!(action.start(&mut host).is_err());
        assert!(host.interactions.is_empty());
    }

    #[test]
    fn test_feature_delete_stop_twice_is_harmless() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        let mut action = FeatureDeleteAction::default();
        action.start(&mut host)?;
        action.stop(&mut host)?;
        action.stop(&mut host)?;
        assert_eq!(host.calls.len(), 2);
        Ok(())
    }

    #[test]
    fn test_feature_delete_by_typed_index() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1).with_points(3);
        let mut action = FeatureDeleteAction::default();
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('2'), &mut host);
        assert_eq!(action.pending_input().as_deref(), Some("2"));

        action.stop(&mut host)?;

        assert_eq!(
            host.calls,
            vec![
                "begin(delete)".to_string(),
                "end(1)".to_string(),
                "feature_delete(2)".to_string()
            ]
        );
        let left: Vec<&str> = host.features.iter().map(|f| f.geometry.as_str()).collect();
        assert_eq!(left, vec!["POINT(0 0)", "POINT(2 2)"]);
        Ok(())
    }

    #[test]
    fn test_feature_delete_out_of_range_still_releases() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1).with_points(1);
        let mut action = FeatureDeleteAction::default();
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('5'), &mut host);

        assert!(matches!(
            action.stop(&mut host),
            Err(ActionError::Host(HostError::NoSuchFeature(5)))
        ));
        assert!(host.interactions.is_empty());
        assert_eq!(host.features.len(), 1);
        Ok(())
    }

    #[test]
    fn test_feature_delete_abort_discards_index() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1).with_points(1);
        let mut action = FeatureDeleteAction::default();
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('1'), &mut host);
        action.abort(&mut host)?;
        assert_eq!(host.features.len(), 1);
        assert!(action.pending_input().is_none());
        Ok(())
    }

    #[test]
    fn test_feature_filter_exports_filtered_features() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(3);
        host.active = Some(1);
        host.filtered = vec![Feature::new(GeometryKind::Point, GeoFormat::Wkt, "POINT(0 0)")];
        let mut action = FeatureFilterAction::new(true);
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('2'), &mut host);
        action.stop(&mut host)?;
        assert_eq!(host.exports, vec![(GeoFormat::GeoJson, 1)]);
        Ok(())
    }

    #[test]
    fn test_feature_filter_by_itself_fails() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(2);
        host.active = Some(2);
        let mut action = FeatureFilterAction::new(false).with_format(GeoFormat::Kml);
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('2'), &mut host);
        assert!(matches!(
            action.stop(&mut host),
            Err(ActionError::Host(HostError::SelfFilter(2)))
        ));
        assert!(host.exports.is_empty());
        Ok(())
    }

    #[test]
    fn test_feature_filter_empty_result_fails() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(2);
        host.active = Some(1);
        let mut action = FeatureFilterAction::new(true);
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('2'), &mut host);
        assert!(matches!(
            action.stop(&mut host),
            Err(ActionError::Host(HostError::EmptyExport))
        ));
        Ok(())
    }

    #[test]
    fn test_feature_filter_abort_discards() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(2);
        let mut action = FeatureFilterAction::new(true);
        action.start(&mut host)?;
        action.handle_key(&KeyPress::from('2'), &mut host);
        action.abort(&mut host)?;
        assert_eq!(action.pending_input(), None);
        assert!(host.calls.is_empty());
        Ok(())
    }
}
