// src/errors.rs

//! Crate-wide error aliases.
//!
//! Currently a thin wrapper around `anyhow`; the module gives a single place
//! to introduce structured error types if the pipeline ever needs them.

pub use anyhow::{Error, Result};
