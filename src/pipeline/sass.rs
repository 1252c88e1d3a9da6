// src/pipeline/sass.rs

//! Thin wrapper around the `grass` Sass compiler.
//!
//! Compilation semantics belong entirely to `grass`; this module only fixes
//! the option set (expanded output for readable development CSS, the styles
//! directory on the load path for `@use`/`@import`).

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use grass::OutputStyle;

/// Compile one `.scss` file to expanded CSS.
pub fn compile_file(path: &Path, load_path: &Path) -> Result<String> {
    let options = grass::Options::default()
        .style(OutputStyle::Expanded)
        .load_path(load_path);

    grass::from_path(path, &options)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("compiling {:?}", path))
}

/// Re-emit already-valid CSS in compressed form.
///
/// Plain CSS is valid SCSS, so whitespace normalization is delegated to the
/// compiler instead of hand-rolling a minifier.
pub fn reemit_compressed(css: &str) -> Result<String> {
    let options = grass::Options::default().style(OutputStyle::Compressed);

    grass::from_string(css.to_string(), &options)
        .map_err(|err| anyhow!("{err}"))
        .context("re-emitting compressed CSS")
}
