//! Keyboard-driven hierarchical command menu
//!
//! An [`ActionMap`] binds single keys to sub-menus or actions. The
//! [`KeyboardMenu`] walks it one [`KeyPress`] at a time, keeping the path it
//! has taken and running the actions it reaches.

mod defaults;
mod dispatcher;
mod event;
mod help;
mod tree;

pub use defaults::default_action_map;
pub use dispatcher::{KeyboardMenu, Navigation};
pub use event::KeyPress;
pub use help::render as render_help;
pub use tree::{ActionMap, Branch, Node, Resolved, ResolvedMut, TreeError};
