//! Karte - keyboard-driven geographic annotation
//!
//! Karte drives a map workspace entirely from the keyboard: single keys walk
//! a tree of menus down to actions that add layers, draw features, export
//! data and change the view.

pub mod action;
pub mod app;
pub mod autopilot;
pub mod config;
pub mod host;
pub mod menu;
pub mod paths;

pub use app::{App, Workspace};
pub use config::Config;
pub use host::{Host, HostError};
pub use menu::{ActionMap, KeyPress, KeyboardMenu, Navigation};
