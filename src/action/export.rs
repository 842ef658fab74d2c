//! Export actions

use super::{ActionError, Describe, OneShot};
use crate::host::{ExportScope, GeoFormat, Host, HostError};
use tracing::info;

/// Export the active layer's (or all layers') features in one format
#[derive(Debug, Clone, Copy)]
pub struct ExportAction {
    format: GeoFormat,
    scope: ExportScope,
}

impl ExportAction {
    /// Export `scope` as `format`
    #[must_use]
    pub const fn new(format: GeoFormat, scope: ExportScope) -> Self {
        Self { format, scope }
    }
}

impl Describe for ExportAction {
    fn label(&self) -> String {
        let all = matches!(self.scope, ExportScope::AllLayers);
        format!("Export({}, all: {all})", self.format)
    }

    fn description(&self) -> &str {
        match self.scope {
            ExportScope::ActiveLayer => "Download the features of the active layer.",
            ExportScope::AllLayers => "Download the features of all layers.",
        }
    }
}

impl OneShot for ExportAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let features = host.features(self.scope);
        if features.is_empty() {
            return Err(HostError::EmptyExport.into());
        }
        host.export_features(self.format, &features)?;
        info!(format = %self.format, count = features.len(), "Exported features");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::test_support::RecordingHost;
    use rstest::rstest;

    #[rstest]
    #[case(GeoFormat::GeoJson, ExportScope::AllLayers, "Export(GeoJSON, all: true)")]
    #[case(GeoFormat::Kml, ExportScope::ActiveLayer, "Export(KML, all: false)")]
    fn test_export_label(
        #[case] format: GeoFormat,
        #[case] scope: ExportScope,
        #[case] expected: &str,
    ) {
        assert_eq!(ExportAction::new(format, scope).label(), expected);
    }

    #[test]
    fn test_export_sends_features() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1).with_points(3);
        ExportAction::new(GeoFormat::Kml, ExportScope::ActiveLayer).start(&mut host)?;
        assert_eq!(host.exports, vec![(GeoFormat::Kml, 3)]);
        Ok(())
    }

    #[test]
    fn test_export_empty_is_refused_before_host() {
        let mut host = RecordingHost::with_layers(1);
        let result = ExportAction::new(GeoFormat::GeoJson, ExportScope::AllLayers).start(&mut host);
        assert!(matches!(
            result,
            Err(ActionError::Host(HostError::EmptyExport))
        ));
        assert!(host.calls.is_empty());
    }
}
