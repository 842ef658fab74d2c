//! The keyboard menu: walks the command tree one key press at a time

use super::event::KeyPress;
use super::help;
use super::tree::{ActionMap, Node, Resolved, ResolvedMut};
use crate::action::{Action, ModalAction};
use crate::config::ReservedKeys;
use crate::host::Host;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Where the menu stands, for redrawing breadcrumbs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigation {
    /// Keys taken from the root
    pub path: Vec<char>,
    /// Label of the started modal action
    pub modal: Option<String>,
    /// Input the started modal action has collected so far
    pub pending_input: Option<String>,
}

type FeedbackFn = Box<dyn FnMut(bool)>;
type NavigationFn = Box<dyn FnMut(&Navigation)>;

/// Result of dispatching one key, before callbacks run
#[derive(Debug, Clone, Copy)]
struct Outcome {
    success: bool,
    navigated: bool,
}

impl Outcome {
    const fn moved(success: bool) -> Self {
        Self {
            success,
            navigated: true,
        }
    }

    const fn failed() -> Self {
        Self {
            success: false,
            navigated: false,
        }
    }
}

/// Keyboard-driven hierarchical menu
///
/// Keeps the path from the root of an [`ActionMap`] as a stack of keys.
/// Branch keys and started modal actions are pushed; one-shot actions fire
/// without touching the stack. Because there is one stack, at most one modal
/// action is started at a time.
pub struct KeyboardMenu {
    map: ActionMap,
    keys: ReservedKeys,
    stack: Vec<char>,
    help: String,
    feedback: Option<FeedbackFn>,
    navigation_changed: Option<NavigationFn>,
    notify_on_one_shot: bool,
}

impl fmt::Debug for KeyboardMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardMenu")
            .field("map", &self.map)
            .field("keys", &self.keys)
            .field("stack", &self.stack)
            .field("feedback", &self.feedback.is_some())
            .field("navigation_changed", &self.navigation_changed.is_some())
            .field("notify_on_one_shot", &self.notify_on_one_shot)
            .finish_non_exhaustive()
    }
}

impl KeyboardMenu {
    /// Create a menu at the root of `map`
    ///
    /// `keys` should be the same reserved keys the map was validated with.
    #[must_use]
    pub fn new(map: ActionMap, keys: ReservedKeys) -> Self {
        let help = help::render(&map, &keys);
        Self {
            map,
            keys,
            stack: Vec::new(),
            help,
            feedback: None,
            navigation_changed: None,
            notify_on_one_shot: true,
        }
    }

    /// Report the outcome of every key press to `callback`
    #[must_use]
    pub fn with_feedback(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.feedback = Some(Box::new(callback));
        self
    }

    /// Report navigation changes to `callback`
    #[must_use]
    pub fn with_navigation_changed(mut self, callback: impl FnMut(&Navigation) + 'static) -> Self {
        self.navigation_changed = Some(Box::new(callback));
        self
    }

    /// Whether firing a one-shot action counts as a navigation change
    #[must_use]
    pub const fn with_one_shot_notifications(mut self, notify: bool) -> Self {
        self.notify_on_one_shot = notify;
        self
    }

    /// Handle one key press
    ///
    /// Never fails: problems are logged and reported as `false` through
    /// the feedback callback. Returns the same value.
    pub fn handle_keypress(&mut self, event: &mut KeyPress, host: &mut dyn Host) -> bool {
        let outcome = self.dispatch(event, host);
        self.emit_feedback(outcome.success);
        if outcome.navigated {
            self.emit_navigation_changed();
        }
        outcome.success
    }

    fn dispatch(&mut self, event: &mut KeyPress, host: &mut dyn Host) -> Outcome {
        let Some(current) = self.map.resolve_mut(&self.stack) else {
            error!(stack = ?self.stack, "Navigation stack does not resolve; returning to root");
            self.stack.clear();
            return Outcome::failed();
        };

        if self.keys.is_navigate_up(event.key()) {
            let mut success = true;
            if let Some(modal) = started_modal(current) {
                if let Err(err) = modal.abort(host) {
                    warn!(action = %modal.label(), error = %err, "Abort failed");
                    success = false;
                }
            }
            self.stack.pop();
            event.stop_propagation();
            debug!(stack = ?self.stack, "Navigated up");
            return Outcome::moved(success);
        }

        if self.keys.is_execute(event.key()) {
            let Some(modal) = started_modal(current) else {
                warn!("No action selected");
                return Outcome::failed();
            };
            let label = modal.label();
            let result = modal.stop(host);
            self.stack.pop();
            event.stop_propagation();
            return match result {
                Ok(()) => {
                    info!(action = %label, "Stopped");
                    Outcome::moved(true)
                }
                Err(err) => {
                    warn!(action = %label, error = %err, "Stop failed");
                    Outcome::moved(false)
                }
            };
        }

        let branch = match current {
            ResolvedMut::Branch(branch) => branch,
            ResolvedMut::Leaf(Action::Modal(modal)) if modal.is_started() => {
                modal.handle_key(event, host);
                return Outcome::moved(true);
            }
            ResolvedMut::Leaf(_) => {
                debug!(key = event.key(), "Dead end");
                return Outcome::failed();
            }
        };

        let Some(key) = event.as_char() else {
            warn!(key = event.key(), "No action associated with key");
            return Outcome::failed();
        };

        match branch.get_mut(key) {
            None => {
                warn!(%key, "No action associated with key");
                Outcome::failed()
            }
            Some(Node::Branch(_)) => {
                self.stack.push(key);
                debug!(stack = ?self.stack, "Entered branch");
                Outcome::moved(true)
            }
            Some(Node::Leaf(Action::OneShot(action))) => {
                let label = action.label();
                match action.start(host) {
                    Ok(()) => {
                        info!(action = %label, "Executed");
                        Outcome {
                            success: true,
                            navigated: self.notify_on_one_shot,
                        }
                    }
                    Err(err) => {
                        warn!(action = %label, error = %err, "Action failed");
                        Outcome::failed()
                    }
                }
            }
            Some(Node::Leaf(Action::Modal(modal))) => match modal.start(host) {
                Ok(()) => {
                    self.stack.push(key);
                    info!(action = %modal.label(), "Started");
                    Outcome::moved(true)
                }
                Err(err) => {
                    warn!(action = %modal.label(), error = %err, "Start failed");
                    Outcome::failed()
                }
            },
        }
    }

    fn emit_feedback(&mut self, success: bool) {
        match self.feedback.as_mut() {
            Some(callback) => callback(success),
            None => error!("No feedback callback registered"),
        }
    }

    fn emit_navigation_changed(&mut self) {
        let navigation = self.navigation();
        match self.navigation_changed.as_mut() {
            Some(callback) => callback(&navigation),
            None => error!("No navigation-changed callback registered"),
        }
    }

    /// Snapshot of the current position
    #[must_use]
    pub fn navigation(&self) -> Navigation {
        let (modal, pending_input) = self
            .active_modal()
            .map_or((None, None), |modal| (Some(modal.label()), modal.pending_input()));
        Navigation {
            path: self.stack.clone(),
            modal,
            pending_input,
        }
    }

    /// Keys taken from the root
    #[must_use]
    pub fn stack(&self) -> &[char] {
        &self.stack
    }

    /// The started modal action, if the menu is inside one
    #[must_use]
    pub fn active_modal(&self) -> Option<&ModalAction> {
        match self.map.resolve(&self.stack)? {
            Resolved::Leaf(action) => action.as_modal().filter(|modal| modal.is_started()),
            Resolved::Branch(_) => None,
        }
    }

    /// Keys the current branch offers with their labels; empty inside a
    /// modal action
    #[must_use]
    pub fn current_options(&self) -> Vec<(char, String)> {
        match self.map.resolve(&self.stack) {
            Some(Resolved::Branch(branch)) => branch.options(),
            _ => Vec::new(),
        }
    }

    /// Help text for the whole tree
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The command tree
    #[must_use]
    pub const fn map(&self) -> &ActionMap {
        &self.map
    }

    /// The reserved keys
    #[must_use]
    pub const fn keys(&self) -> &ReservedKeys {
        &self.keys
    }
}

fn started_modal(current: ResolvedMut<'_>) -> Option<&mut ModalAction> {
    match current {
        ResolvedMut::Leaf(Action::Modal(modal)) if modal.is_started() => Some(modal),
        _ => None,
    }
}
