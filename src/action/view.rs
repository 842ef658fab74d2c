//! View actions: extent, background tiles, render mode, clipping, clustering

use super::{ActionError, Describe, OneShot};
use crate::host::{Host, RenderMode, TileSource};
use tracing::{debug, info};

/// Zoom to show every feature of the active layer
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewExtentAction;

impl Describe for ViewExtentAction {
    fn label(&self) -> String {
        "ViewExtent".to_string()
    }

    fn description(&self) -> &str {
        "Zoom to show all features of the active layer."
    }
}

impl OneShot for ViewExtentAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.zoom_to_active_extent()?;
        Ok(())
    }
}

/// Switch the background tile source
#[derive(Debug, Clone)]
pub struct ViewTileAction {
    source: TileSource,
}

impl ViewTileAction {
    /// Switch to `source`
    #[must_use]
    pub const fn new(source: TileSource) -> Self {
        Self { source }
    }
}

impl Describe for ViewTileAction {
    fn label(&self) -> String {
        format!("ViewTile({})", self.source.name)
    }
}

impl OneShot for ViewTileAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        info!(name = %self.source.name, url = %self.source.url, "Switching tile source");
        host.set_tile_source(&self.source);
        Ok(())
    }
}

/// Switch all vector layers between fast and precise rendering
#[derive(Debug, Clone, Copy)]
pub struct ViewPerformanceAction {
    mode: RenderMode,
}

impl ViewPerformanceAction {
    /// Render with `mode`
    #[must_use]
    pub const fn new(mode: RenderMode) -> Self {
        Self { mode }
    }
}

impl Describe for ViewPerformanceAction {
    fn label(&self) -> String {
        format!("ViewPerformance(fast: {})", self.mode == RenderMode::Fast)
    }

    fn description(&self) -> &str {
        "Switch the renderMode between immediately (slow but accurate) and delayed (fast but inaccurate)."
    }
}

impl OneShot for ViewPerformanceAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.set_render_mode(self.mode);
        Ok(())
    }
}

/// Make the active layer clip the background tiles (or stop doing so)
#[derive(Debug, Clone, Copy)]
pub struct ViewClippingAction {
    clipping: bool,
}

impl ViewClippingAction {
    /// Turn clipping on (`true`) or off
    #[must_use]
    pub const fn new(clipping: bool) -> Self {
        Self { clipping }
    }
}

impl Describe for ViewClippingAction {
    fn label(&self) -> String {
        format!("ViewClipping(clipping: {})", self.clipping)
    }

    fn description(&self) -> &str {
        "Use the active layer as a clipping for the base map (i.e., background tiles)."
    }
}

impl OneShot for ViewClippingAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        host.set_clipping(self.clipping)?;
        Ok(())
    }
}

/// Toggle point clustering of the active layer
#[derive(Debug, Clone, Copy)]
pub struct ViewClusterToggleAction {
    distance: u32,
}

impl ViewClusterToggleAction {
    /// Cluster points closer than `distance` pixels
    #[must_use]
    pub const fn new(distance: u32) -> Self {
        Self { distance }
    }
}

impl Describe for ViewClusterToggleAction {
    fn label(&self) -> String {
        format!("ViewClusterToggle(distance: {})", self.distance)
    }

    fn description(&self) -> &str {
        "Toggle the point clustering of the active layer."
    }
}

impl OneShot for ViewClusterToggleAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let clustered = host.toggle_clustering(self.distance)?;
        debug!(clustered, "Toggled clustering");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::test_support::RecordingHost;
    use crate::host::HostError;

    #[test]
    fn test_view_tile_label_and_effect() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        let mut action = ViewTileAction::new(TileSource::new(
            "OpenStreetMap",
            "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        ));
        assert_eq!(action.label(), "ViewTile(OpenStreetMap)");
        assert_eq!(action.description(), "");
        action.start(&mut host)?;
        assert_eq!(host.calls, vec!["tile(OpenStreetMap)".to_string()]);
        Ok(())
    }

    #[test]
    fn test_view_performance() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        let mut action = ViewPerformanceAction::new(RenderMode::Fast);
        assert_eq!(action.label(), "ViewPerformance(fast: true)");
        action.start(&mut host)?;
        assert_eq!(host.calls, vec!["render(Fast)".to_string()]);
        Ok(())
    }

    #[test]
    fn test_view_clipping() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        ViewClippingAction::new(true).start(&mut host)?;
        assert_eq!(host.calls, vec!["clipping(true)".to_string()]);
        Ok(())
    }

    #[test]
    fn test_view_cluster_toggle_failure_is_reported() {
        let mut host = RecordingHost::with_layers(1);
        host.fail_with = Some(|| HostError::ClusterRequiresPoints);
        let result = ViewClusterToggleAction::new(40).start(&mut host);
        assert!(matches!(
            result,
            Err(ActionError::Host(HostError::ClusterRequiresPoints))
        ));
    }

    #[test]
    fn test_view_extent_on_empty_layer_fails() {
        let mut host = RecordingHost::with_layers(1);
        host.fail_with = Some(|| HostError::EmptyLayer);
        assert!(ViewExtentAction.start(&mut host).is_err());
        assert_eq!(host.calls, vec!["zoom".to_string()]);
    }
}
