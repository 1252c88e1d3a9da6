// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use globset::GlobSet;

use crate::config::model::ConfigFile;
use crate::watch::patterns::{compile_glob, normalize_dir};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - the styles glob parses
/// - the markup glob parses
/// - `paths.dest` is non-empty
/// - `paths.dest` is not itself matched by the styles glob (compilation
///   writes there, so a match would retrigger the pipeline from its own
///   output)
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    let styles = validate_styles_glob(cfg)?;
    validate_markup_glob(cfg)?;
    validate_dest(cfg, &styles)?;
    Ok(())
}

fn validate_styles_glob(cfg: &ConfigFile) -> Result<GlobSet> {
    compile_glob(&cfg.paths.styles).context("invalid [paths].styles glob")
}

fn validate_markup_glob(cfg: &ConfigFile) -> Result<GlobSet> {
    compile_glob(&cfg.paths.markup).context("invalid [paths].markup glob")
}

fn validate_dest(cfg: &ConfigFile, styles: &GlobSet) -> Result<()> {
    let dest = normalize_dir(&cfg.paths.dest);
    if dest.is_empty() {
        return Err(anyhow!("[paths].dest must not be empty"));
    }

    // A .scss file placed in dest must never match the styles glob,
    // otherwise each compile would trigger the next one.
    let probe = format!("{dest}/probe.scss");
    if styles.is_match(&probe) {
        return Err(anyhow!(
            "[paths].dest '{}' is matched by the styles glob '{}'; \
             compiled output would retrigger compilation",
            cfg.paths.dest,
            cfg.paths.styles
        ));
    }

    Ok(())
}
