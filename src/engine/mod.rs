// src/engine/mod.rs

//! Dev-session runtime for sasspipe.
//!
//! The runtime is the event loop behind long-running tasks: it consumes
//! routed file-change events from the watcher plus the Ctrl-C shutdown
//! signal, and reacts by recompiling or notifying connected browsers.

pub mod runtime;

pub use runtime::{Runtime, RuntimeEvent};
