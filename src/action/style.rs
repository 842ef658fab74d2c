//! Style actions

use super::{ActionError, Describe, OneShot};
use crate::host::Host;
use tracing::debug;

/// Change the image scale of the active layer's style relatively
///
/// The new scale is `scale * (1 + diff)`.
#[derive(Debug, Clone, Copy)]
pub struct StyleImageScaleAction {
    diff: f64,
}

impl StyleImageScaleAction {
    /// Adjust by `diff` (e.g. `0.1` grows by ten percent)
    #[must_use]
    pub const fn new(diff: f64) -> Self {
        Self { diff }
    }
}

impl Describe for StyleImageScaleAction {
    fn label(&self) -> String {
        format!("StyleImageScale(diff: {})", self.diff)
    }

    fn description(&self) -> &str {
        "Change the size of the images representing features (if loaded)."
    }
}

impl OneShot for StyleImageScaleAction {
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        let current = host.image_scale()?;
        let scale = current * (1.0 + self.diff);
        host.set_image_scale(scale)?;
        debug!(current, scale, "Changed image scale");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::test_support::RecordingHost;

    #[test]
    fn test_scale_grows_and_shrinks() -> Result<(), ActionError> {
        let mut host = RecordingHost::with_layers(1);
        StyleImageScaleAction::new(0.5).start(&mut host)?;
        assert!((host.image_scale - 1.5).abs() < f64::EPSILON);

        StyleImageScaleAction::new(-0.5).start(&mut host)?;
        assert!((host.image_scale - 0.75).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_label_carries_diff() {
        assert_eq!(
            StyleImageScaleAction::new(-0.1).label(),
            "StyleImageScale(diff: -0.1)"
        );
    }
}
