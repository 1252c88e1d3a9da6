// src/serve/mod.rs

//! Dev server and reload notification.
//!
//! - [`server`] binds a local static file server (axum + `ServeDir`) with
//!   the live-reload layer installed.
//! - [`reload`] wraps the `tower-livereload` reloader as an explicitly
//!   constructed singleton, passed by reference instead of living in
//!   ambient global state.

pub mod reload;
pub mod server;

pub use reload::ReloadNotifier;
pub use server::{start_server, ServerHandle};
