//! subdeck: a terminal client for browsing and bulk-managing a subscription
//! list served by a backend proxy API.
//!
//! The two controllers in [`controller`] hold all list and selection state
//! and perform no I/O. [`tasks`] runs the HTTP calls they describe through
//! [`api::ApiClient`], and [`ui`] drives everything from a single event loop.

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod keybindings;
pub mod model;
pub mod tasks;
pub mod ui;
pub mod util;
