// src/config/mod.rs

//! Configuration loading and validation for sasspipe.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate path and glob invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, DiscardComments, MinifySection, OutputSection, PathsSection, ServeSection,
};
pub use validate::validate_config;
