// src/watch/mod.rs

//! File watching and change routing.
//!
//! This module is responsible for:
//! - Compiling the styles/markup glob patterns and the output-directory
//!   prefix into a single classification table (`patterns.rs`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that coalesces
//!   event bursts and forwards routed changes to the runtime (`watcher.rs`).
//! - Content hashing so editor save storms that don't change file bytes
//!   don't trigger recompiles (`hash.rs`).
//!
//! It does **not** know about the pipeline or the task graph; it only turns
//! filesystem changes into runtime events.

pub mod hash;
pub mod patterns;
pub mod watcher;

pub use hash::ContentTracker;
pub use patterns::{compile_glob, normalize_dir, static_prefix, WatchProfiles, WatchRoute};
pub use watcher::{spawn_watcher, WatcherHandle};
