//! Application state and logic

mod engine;
mod export;
mod import;
mod style;
mod workspace;

pub use engine::{Extent, GeoEngine, TextEngine};
pub use export::Exporter;
pub use import::{DropOutcome, DropPayload, handle_drop, image_data_url};
pub use style::{BORDER_ALPHA, ColorCreator, ColorRgb, FILL_ALPHA, StyleContainer};
pub use workspace::{Layer, Workspace};

use crate::autopilot::{Autopilot, AutopilotError, Fetch, Report};
use crate::config::Config;
use crate::menu::{KeyPress, KeyboardMenu, Navigation, default_action_map};
use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long the feedback indicator stays lit
pub const FLASH_DURATION: Duration = Duration::from_millis(300);

/// What the menu reports through its callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSignal {
    /// Outcome of one key press
    Feedback(bool),
    /// The menu moved
    NavigationChanged(Navigation),
}

/// Feedback indicator for the most recent key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    /// Whether the key press succeeded
    pub success: bool,
    /// When it happened
    pub at: Instant,
}

impl Flash {
    /// Whether the indicator is still lit at `now`
    #[must_use]
    pub fn is_lit(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.at) < FLASH_DURATION
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Layers and view state
    pub workspace: Workspace,

    /// Last navigation reported by the menu
    pub navigation: Navigation,

    /// Feedback of the last key press
    pub flash: Option<Flash>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    menu: KeyboardMenu,
    signals: Receiver<MenuSignal>,
}

impl App {
    /// Create the application with the default command tree
    ///
    /// # Errors
    ///
    /// Returns an error if the configured keys make the command tree invalid
    pub fn new(config: Config) -> Result<Self> {
        let map = default_action_map(&config).context("Invalid command tree")?;
        let (sender, signals) = mpsc::channel();
        let navigation_sender = sender.clone();
        let menu = KeyboardMenu::new(map, config.keys.clone())
            .with_feedback(move |success| {
                if let Err(e) = sender.send(MenuSignal::Feedback(success)) {
                    debug!(error = %e, "Feedback signal dropped");
                }
            })
            .with_navigation_changed(move |navigation| {
                let signal = MenuSignal::NavigationChanged(navigation.clone());
                if let Err(e) = navigation_sender.send(signal) {
                    debug!(error = %e, "Navigation signal dropped");
                }
            })
            .with_one_shot_notifications(config.notify_on_one_shot);
        let workspace = Workspace::new(&config);

        Ok(Self {
            config,
            workspace,
            navigation: Navigation::default(),
            flash: None,
            status_message: None,
            should_quit: false,
            menu,
            signals,
        })
    }

    /// The keyboard menu
    #[must_use]
    pub const fn menu(&self) -> &KeyboardMenu {
        &self.menu
    }

    /// Feed one key (by name) to the menu
    ///
    /// While the help overlay is shown, any key only closes it.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if self.workspace.help_visible() {
            self.workspace.hide_help();
            return true;
        }
        let exported = self.workspace.last_export().cloned();
        let mut press = KeyPress::new(key);
        let success = self.menu.handle_keypress(&mut press, &mut self.workspace);
        self.drain_signals();
        if let Some(path) = self.workspace.last_export()
            && Some(path) != exported.as_ref()
        {
            self.status_message = Some(format!("Exported to {}", path.display()));
        }
        success
    }

    /// Apply pasted text according to the current drop mode
    pub fn handle_paste(&mut self, text: &str) {
        let payload = DropPayload::from_paste(text);
        self.status_message = Some(match self.workspace.handle_drop(&payload) {
            Ok(DropOutcome::Imported(count)) => format!("Imported {count} feature(s)"),
            Ok(DropOutcome::Partial { imported, reason }) => {
                format!("Imported {imported} feature(s), then stopped: {reason}")
            }
            Ok(DropOutcome::StyleImage) => "Point image replaced".to_string(),
            Err(e) => {
                warn!(error = %e, "Drop failed");
                format!("Drop failed: {e}")
            }
        });
    }

    /// Replay an autopilot command string
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be tokenised
    pub fn run_autopilot(&mut self, script: &str, fetcher: &dyn Fetch) -> Result<Report, AutopilotError> {
        let autopilot = Autopilot::parse(script, &self.config.keys)?;
        let report = autopilot.run(&mut self.menu, &mut self.workspace, fetcher);
        self.drain_signals();
        self.status_message = Some(format!(
            "Autopilot: {} executed, {} skipped",
            report.executed, report.skipped
        ));
        Ok(report)
    }

    /// Whether the feedback indicator is lit, and for which outcome
    #[must_use]
    pub fn flash_at(&self, now: Instant) -> Option<bool> {
        self.flash
            .filter(|flash| flash.is_lit(now))
            .map(|flash| flash.success)
    }

    /// Request exit
    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    fn drain_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                MenuSignal::Feedback(success) => {
                    self.flash = Some(Flash {
                        success,
                        at: Instant::now(),
                    });
                }
                MenuSignal::NavigationChanged(navigation) => self.navigation = navigation,
            }
        }
    }
}
