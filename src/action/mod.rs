//! Menu actions: the units of work at the leaves of the command tree.
//!
//! An action is either one-shot (fires once when its key is pressed) or
//! modal (started by its key, fed further keys, then stopped by the execute
//! key or aborted by the navigate-up key). Both share [`Describe`] for help
//! rendering; the [`Action`] sum type tells the dispatcher which lifecycle
//! applies.

mod export;
mod feature;
mod help;
mod import;
mod layer;
mod style;
mod view;

pub use export::ExportAction;
pub use feature::{FeatureAddAction, FeatureDeleteAction, FeatureFilterAction, FeatureModifyAction};
pub use help::HelpAction;
pub use import::DropModeAction;
pub use layer::{LayerAddAction, LayerDeleteAction, LayerSelectAction};
pub use style::StyleImageScaleAction;
pub use view::{
    ViewClippingAction, ViewClusterToggleAction, ViewExtentAction, ViewPerformanceAction,
    ViewTileAction,
};

use crate::host::{Host, HostError, InteractionId};
use crate::menu::KeyPress;
use std::fmt;
use thiserror::Error;

/// Failures an action hook can declare
#[derive(Debug, Error)]
pub enum ActionError {
    /// `start` on a modal action that is already running
    #[error("{0} is already started")]
    AlreadyStarted(String),
    /// `stop`/`abort` on a modal action that is not running
    #[error("{0} is not started")]
    NotStarted(String),
    /// Stopped without typing a layer index
    #[error("no layer index entered")]
    NoIndex,
    /// The host refused the request
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Label and description shown in help
pub trait Describe: fmt::Debug {
    /// One-line label, parameterised where the action is
    fn label(&self) -> String;

    /// Longer description; empty when there is none
    fn description(&self) -> &str {
        ""
    }
}

/// An action that finishes as soon as it is started
pub trait OneShot: Describe {
    /// Perform the action
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the request
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError>;
}

/// An action that stays active until stopped or aborted
pub trait Modal: Describe {
    /// Enter the started state
    ///
    /// # Errors
    ///
    /// Returns an error if the action cannot start
    fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError>;

    /// Consume a key press while started
    fn handle_key(&mut self, _key: &KeyPress, _host: &mut dyn Host) {}

    /// Commit the effect and release resources
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the request
    fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError>;

    /// Cancel; does the same as [`Modal::stop`] unless overridden
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the request
    fn abort(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        self.stop(host)
    }

    /// Input accumulated so far, for display
    fn pending_input(&self) -> Option<String> {
        None
    }
}

/// Lifecycle phase of a modal action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not running
    #[default]
    Idle,
    /// Between `start` and `stop`/`abort`
    Started,
}

/// A modal action together with its lifecycle phase
///
/// Enforces `idle -> started -> idle`; input is only forwarded while started.
#[derive(Debug)]
pub struct ModalAction {
    behavior: Box<dyn Modal>,
    phase: Phase,
}

impl ModalAction {
    /// Wrap a modal behavior, initially idle
    #[must_use]
    pub fn new(behavior: impl Modal + 'static) -> Self {
        Self {
            behavior: Box::new(behavior),
            phase: Phase::Idle,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the action is started
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase == Phase::Started
    }

    /// Start the action
    ///
    /// # Errors
    ///
    /// Returns `AlreadyStarted` when running, or the behavior's own error (the
    /// action then stays idle)
    pub fn start(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        if self.is_started() {
            return Err(ActionError::AlreadyStarted(self.behavior.label()));
        }
        self.behavior.start(host)?;
        self.phase = Phase::Started;
        Ok(())
    }

    /// Forward a key press; ignored unless started
    pub fn handle_key(&mut self, key: &KeyPress, host: &mut dyn Host) {
        if self.is_started() {
            self.behavior.handle_key(key, host);
        }
    }

    /// Stop the action, committing its effect
    ///
    /// The action is idle afterwards even if the effect failed.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when idle, or the behavior's own error
    pub fn stop(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        if !self.is_started() {
            return Err(ActionError::NotStarted(self.behavior.label()));
        }
        self.phase = Phase::Idle;
        self.behavior.stop(host)
    }

    /// Abort the action
    ///
    /// The action is idle afterwards even if the cleanup failed.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` when idle, or the behavior's own error
    pub fn abort(&mut self, host: &mut dyn Host) -> Result<(), ActionError> {
        if !self.is_started() {
            return Err(ActionError::NotStarted(self.behavior.label()));
        }
        self.phase = Phase::Idle;
        self.behavior.abort(host)
    }

    /// Input accumulated by the behavior
    #[must_use]
    pub fn pending_input(&self) -> Option<String> {
        self.behavior.pending_input()
    }

    /// Label of the behavior
    #[must_use]
    pub fn label(&self) -> String {
        self.behavior.label()
    }

    /// Description of the behavior
    #[must_use]
    pub fn description(&self) -> &str {
        self.behavior.description()
    }
}

/// A leaf of the command tree
#[derive(Debug)]
pub enum Action {
    /// Fires once, never enters the navigation stack
    OneShot(Box<dyn OneShot>),
    /// Pushed onto the navigation stack while started
    Modal(ModalAction),
}

impl Action {
    /// Wrap a one-shot action
    #[must_use]
    pub fn one_shot(action: impl OneShot + 'static) -> Self {
        Self::OneShot(Box::new(action))
    }

    /// Wrap a modal action
    #[must_use]
    pub fn modal(action: impl Modal + 'static) -> Self {
        Self::Modal(ModalAction::new(action))
    }

    /// Label for help and logging
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::OneShot(action) => action.label(),
            Self::Modal(action) => action.label(),
        }
    }

    /// Description for help
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::OneShot(action) => action.description(),
            Self::Modal(action) => action.description(),
        }
    }

    /// The modal wrapper, if this is a modal action
    #[must_use]
    pub const fn as_modal(&self) -> Option<&ModalAction> {
        match self {
            Self::Modal(action) => Some(action),
            Self::OneShot(_) => None,
        }
    }

    /// Whether this is a started modal action
    #[must_use]
    pub fn is_started_modal(&self) -> bool {
        self.as_modal().is_some_and(ModalAction::is_started)
    }
}

/// Decimal digits typed while a modal action is started
///
/// Empty until the first digit; non-digit keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitBuffer(Option<usize>);

impl DigitBuffer {
    /// An empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self(None)
    }

    /// Append the key if it is a digit; returns whether it was
    pub fn push(&mut self, key: &KeyPress) -> bool {
        let Some(digit) = key.digit() else {
            return false;
        };
        let current = self.0.unwrap_or(0);
        self.0 = Some(current.saturating_mul(10).saturating_add(digit as usize));
        true
    }

    /// The number typed so far
    #[must_use]
    pub const fn value(&self) -> Option<usize> {
        self.0
    }

    /// Take the number, leaving the buffer empty
    pub const fn take(&mut self) -> Option<usize> {
        self.0.take()
    }

    /// Discard anything typed
    pub const fn clear(&mut self) {
        self.0 = None;
    }
}

/// Release an interaction if one is held
fn release_interaction(interaction: &mut Option<InteractionId>, host: &mut dyn Host) {
    if let Some(id) = interaction.take() {
        host.end_interaction(id);
    }
}
