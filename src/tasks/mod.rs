// src/tasks/mod.rs

//! Named build tasks and their composition.
//!
//! - [`graph`] holds the explicit task registry: named specs composed via
//!   `Series` / `Parallel`, validated acyclic.
//! - [`runner`] interprets the registry, executing actions and propagating
//!   explicit [`runner::TaskOutcome`] results.

pub mod graph;
pub mod runner;

pub use graph::{ActionKind, TaskGraph, TaskName, TaskSpec};
pub use runner::{TaskContext, TaskOutcome, TaskRunner};
