//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout, overlays, and dispatch to widgets
//! - `header` - Query summary and filter box
//! - `subscriptions` - Subscription list widget
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod events;
mod header;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;
mod subscriptions;

pub use events::handle_app_event;
pub use input::handle_input;
pub use loop_runner::{run, Action};
