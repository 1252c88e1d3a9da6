// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// styles = "src/scss/*.scss"
/// dest = "src/css/"
///
/// [serve]
/// port = 3000
/// ```
///
/// All sections are optional and have defaults matching the canonical
/// project layout (Sass sources under `src/scss/`, CSS under `src/css/`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Source and destination paths from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,

    /// Output artifact options from `[output]`.
    #[serde(default)]
    pub output: OutputSection,

    /// Minification stage options from `[minify]`.
    ///
    /// Every sub-option defaults to `false`, leaving the stage inert for
    /// development builds while keeping the production configuration shape.
    #[serde(default)]
    pub minify: MinifySection,

    /// Dev server and reload options from `[serve]`.
    #[serde(default)]
    pub serve: ServeSection,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Glob over stylesheet sources, relative to the project root.
    #[serde(default = "default_styles")]
    pub styles: String,

    /// Destination directory for compiled CSS (and source maps).
    #[serde(default = "default_dest")]
    pub dest: String,

    /// Glob over markup files whose changes trigger a browser reload
    /// without recompiling.
    #[serde(default = "default_markup")]
    pub markup: String,
}

fn default_styles() -> String {
    "src/scss/*.scss".to_string()
}

fn default_dest() -> String {
    "src/css/".to_string()
}

fn default_markup() -> String {
    "*.html".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            styles: default_styles(),
            dest: default_dest(),
            markup: default_markup(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Emit a sibling `.css.map` next to each compiled file.
    #[serde(default = "default_true")]
    pub sourcemaps: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { sourcemaps: true }
    }
}

/// `[minify]` section.
///
/// Mirrors the option set of a production CSS normalizer. All options
/// default to `false`, so the development pipeline carries the stage but the
/// stage does nothing. See [`MinifySection::is_inert`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MinifySection {
    /// Collapse whitespace and re-emit the sheet in compressed form.
    #[serde(default)]
    pub normalize_whitespace: bool,

    /// Comment handling; only `remove_all` is currently wired.
    #[serde(default)]
    pub discard_comments: DiscardComments,

    /// Accepted for parity with production configs; no pass is wired.
    #[serde(default)]
    pub discard_unused: bool,

    /// Accepted for parity with production configs; no pass is wired.
    #[serde(default)]
    pub minify_font_values: bool,

    /// Accepted for parity with production configs; no pass is wired.
    #[serde(default)]
    pub reduce_idents: bool,

    /// Accepted for parity with production configs; no pass is wired.
    #[serde(default)]
    pub merge_longhand: bool,
}

/// `[minify.discard_comments]` sub-table.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscardComments {
    #[serde(default)]
    pub remove_all: bool,
}

impl MinifySection {
    /// True when every sub-option is disabled and the stage is a verbatim
    /// passthrough.
    pub fn is_inert(&self) -> bool {
        !self.normalize_whitespace
            && !self.discard_comments.remove_all
            && !self.discard_unused
            && !self.minify_font_values
            && !self.reduce_idents
            && !self.merge_longhand
    }
}

/// `[serve]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    /// Port for the local static server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served as the site root, relative to the project root.
    #[serde(default = "default_serve_root")]
    pub root: String,

    /// Open a browser tab once the server is listening.
    #[serde(default = "default_true")]
    pub open_browser: bool,

    /// Prefer injecting changed CSS over a full page reload.
    ///
    /// The current reload transport always performs a full reload; the
    /// option is accepted so configs stay portable.
    #[serde(default = "default_true")]
    pub inject_css: bool,
}

fn default_port() -> u16 {
    3000
}

fn default_serve_root() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            root: default_serve_root(),
            open_browser: default_true(),
            inject_css: default_true(),
        }
    }
}
