// src/pipeline/mod.rs

//! The transform pipeline: Sass sources in, CSS (+ source maps) out.
//!
//! - [`sass`] wraps the `grass` compiler (stage 1).
//! - [`media`] consolidates and reorders `@media` blocks (stage 2).
//! - [`minify`] is the production-parity normalization stage (stage 3),
//!   inert in the default development configuration.
//!
//! A [`Pipeline`] is stateless between runs; overlapping invocations are
//! allowed and last-writer-wins on the destination directory.

pub mod media;
pub mod minify;
pub mod sass;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::model::ConfigFile;
use crate::errors::{Error, Result};
use crate::watch::patterns::{compile_glob, normalize_dir, static_prefix};

pub use media::MediaGroupStage;
pub use minify::MinifyStage;

/// One post-compilation transform applied to a whole stylesheet.
///
/// Stage order is semantically significant: media-query grouping must run
/// before minification, which assumes already-sorted rules.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, css: &str) -> Result<String>;
}

/// Result of one pipeline run over all matched sources.
///
/// A per-file failure never aborts the run; the file is recorded here and
/// its previous output (if any) is left untouched.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, Error)>,
}

impl PipelineReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Log one summary line, plus one error line per failed file.
    pub fn log_summary(&self) {
        for (path, err) in &self.failed {
            error!(file = ?path, error = format!("{err:#}"), "stylesheet failed to compile");
        }
        info!(
            compiled = self.succeeded.len(),
            failed = self.failed.len(),
            "pipeline run finished"
        );
    }
}

/// The configured transform pipeline for one project.
pub struct Pipeline {
    root: PathBuf,
    sources: globset::GlobSet,
    /// Literal directory prefix of the styles glob, relative to root.
    source_prefix: PathBuf,
    dest: PathBuf,
    sourcemaps: bool,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Build the pipeline from a validated config.
    ///
    /// Stage order is fixed: compile → group media queries → minify.
    pub fn from_config(cfg: &ConfigFile, root: &Path) -> Result<Self> {
        let sources = compile_glob(&cfg.paths.styles)
            .with_context(|| format!("building source globset from '{}'", cfg.paths.styles))?;

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(MediaGroupStage::new()),
            Box::new(MinifyStage::new(cfg.minify.clone())),
        ];

        Ok(Self {
            root: root.to_path_buf(),
            sources,
            source_prefix: static_prefix(&cfg.paths.styles),
            dest: root.join(normalize_dir(&cfg.paths.dest)),
            sourcemaps: cfg.output.sourcemaps,
            stages,
        })
    }

    /// Enumerate the source files the styles glob currently matches.
    ///
    /// Sass partials (basename starting with `_`) are importable but never
    /// compiled on their own. A missing source directory yields an empty
    /// set rather than an error, matching the non-fatal watch-setup policy.
    pub fn matched_sources(&self) -> Vec<PathBuf> {
        let start = self.root.join(&self.source_prefix);
        if start.is_file() {
            return vec![start];
        }

        let mut found = Vec::new();
        collect_files(&start, &mut found);

        found.retain(|path| {
            let Ok(rel) = path.strip_prefix(&self.root) else {
                return false;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            self.sources.is_match(&rel) && !is_partial(path)
        });

        // Stable order keeps runs deterministic.
        found.sort();
        found
    }

    /// Compile every matched source. Per-file errors are collected, not
    /// propagated, so one broken stylesheet can't take the run down.
    pub fn run_all(&self) -> PipelineReport {
        let files = self.matched_sources();
        if files.is_empty() {
            warn!(root = ?self.root, "styles glob matched no source files");
        }

        let mut report = PipelineReport::default();
        for file in files {
            match self.process_file(&file) {
                Ok(out) => {
                    info!(source = ?file, output = ?out, "compiled stylesheet");
                    report.succeeded.push(file);
                }
                Err(err) => {
                    report.failed.push((file, err));
                }
            }
        }
        report
    }

    /// Run all stages for one source file and write the output artifacts.
    fn process_file(&self, source: &Path) -> Result<PathBuf> {
        let load_path = self.root.join(&self.source_prefix);
        let mut css = sass::compile_file(source, &load_path)?;

        for stage in &self.stages {
            css = stage
                .apply(&css)
                .with_context(|| format!("stage '{}' failed for {:?}", stage.name(), source))?;
        }

        self.write_output(source, css)
    }

    fn write_output(&self, source: &Path, mut css: String) -> Result<PathBuf> {
        fs::create_dir_all(&self.dest)
            .with_context(|| format!("creating output directory {:?}", self.dest))?;

        let stem = source
            .file_stem()
            .ok_or_else(|| anyhow!("source file {:?} has no stem", source))?
            .to_string_lossy();
        let css_name = format!("{stem}.css");
        let out_path = self.dest.join(&css_name);

        if self.sourcemaps {
            let map_name = format!("{css_name}.map");
            let map = SourceMap::new(&css_name, map_source(&self.dest, source, &self.root));
            let map_path = self.dest.join(&map_name);
            fs::write(&map_path, serde_json::to_string(&map)?)
                .with_context(|| format!("writing source map {:?}", map_path))?;

            if !css.ends_with('\n') {
                css.push('\n');
            }
            css.push_str(&format!("/*# sourceMappingURL={map_name} */\n"));
        }

        fs::write(&out_path, css).with_context(|| format!("writing {:?}", out_path))?;
        Ok(out_path)
    }
}

/// Source map v3 sibling artifact.
///
/// `grass` does not emit mappings, so the map carries the source reference
/// only; field order is fixed so output stays byte-stable across runs.
#[derive(Debug, Serialize)]
struct SourceMap {
    version: u32,
    file: String,
    sources: Vec<String>,
    names: Vec<String>,
    mappings: String,
}

impl SourceMap {
    fn new(file: &str, source: String) -> Self {
        Self {
            version: 3,
            file: file.to_string(),
            sources: vec![source],
            names: Vec::new(),
            mappings: String::new(),
        }
    }
}

/// Path of `source` as referenced from the map file in `dest`: one `..`
/// per dest component, then the root-relative source path, e.g.
/// `../../src/scss/base.scss` for `dest = src/css`. Falls back to the
/// lossy absolute path when either side escapes the project root.
fn map_source(dest: &Path, source: &Path, root: &Path) -> String {
    let (Ok(dest_rel), Ok(source_rel)) = (dest.strip_prefix(root), source.strip_prefix(root))
    else {
        return source.to_string_lossy().replace('\\', "/");
    };

    let ups = dest_rel.components().count();
    let mut rel = String::new();
    for _ in 0..ups {
        rel.push_str("../");
    }
    rel.push_str(&source_rel.to_string_lossy().replace('\\', "/"));
    rel
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('_'))
        .unwrap_or(false)
}

/// Recursive file walk, skipping dot-directories. Unreadable directories
/// are skipped rather than failing the run.
fn collect_files(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_files(&path, found);
        } else {
            found.push(path);
        }
    }
}
