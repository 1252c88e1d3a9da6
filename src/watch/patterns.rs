// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::model::ConfigFile;

/// Which reaction a changed path maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WatchRoute {
    /// Stylesheet source changed: recompile.
    Styles,
    /// Compiled output changed: notify connected browsers.
    Output,
    /// Top-level markup changed: notify connected browsers.
    Markup,
}

/// Compiled classification table for the three watch subscriptions.
///
/// Paths are classified as strings relative to the project root, with
/// forward slashes. The output directory is checked first, since compiled
/// CSS must never be mistaken for a source.
#[derive(Clone)]
pub struct WatchProfiles {
    styles: GlobSet,
    markup: GlobSet,
    dest_prefix: String,
}

impl fmt::Debug for WatchProfiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfiles")
            .field("dest_prefix", &self.dest_prefix)
            .finish_non_exhaustive()
    }
}

impl WatchProfiles {
    /// Build the classification table from a validated config.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let styles = compile_glob(&cfg.paths.styles)
            .with_context(|| format!("building styles globset from '{}'", cfg.paths.styles))?;
        let markup = compile_glob(&cfg.paths.markup)
            .with_context(|| format!("building markup globset from '{}'", cfg.paths.markup))?;

        Ok(Self {
            styles,
            markup,
            dest_prefix: normalize_dir(&cfg.paths.dest),
        })
    }

    /// Classify a root-relative path, e.g. `"src/scss/base.scss"`.
    ///
    /// Returns `None` for paths no subscription cares about.
    pub fn classify(&self, rel_path: &str) -> Option<WatchRoute> {
        if self.is_under_dest(rel_path) {
            return Some(WatchRoute::Output);
        }
        if self.styles.is_match(rel_path) {
            return Some(WatchRoute::Styles);
        }
        if self.markup.is_match(rel_path) {
            return Some(WatchRoute::Markup);
        }
        None
    }

    fn is_under_dest(&self, rel_path: &str) -> bool {
        rel_path
            .strip_prefix(&self.dest_prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Compile a single glob pattern into a `GlobSet`.
///
/// `*` does not cross directory separators, matching the semantics the
/// source patterns were written for (`src/scss/*.scss` stays one level).
pub fn compile_glob(pattern: &str) -> Result<GlobSet> {
    let glob = GlobBuilder::new(pattern.trim_start_matches("./"))
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    Ok(builder.build()?)
}

/// Normalize a configured directory path for prefix comparison:
/// strip any leading `./` and trailing slashes.
pub fn normalize_dir(dir: &str) -> String {
    dir.trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}

/// The literal directory prefix of a glob pattern, i.e. the components
/// before the first one containing a glob metacharacter.
///
/// `src/scss/*.scss` → `src/scss`. Used to keep source enumeration from
/// walking the whole project tree.
pub fn static_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern.trim_start_matches("./")).components() {
        let s = component.as_os_str().to_string_lossy();
        if s.contains(['*', '?', '[', '{']) {
            break;
        }
        prefix.push(component);
    }
    prefix
}
