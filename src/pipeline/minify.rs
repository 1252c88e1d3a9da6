// src/pipeline/minify.rs

//! Stage 3: production-parity minification.
//!
//! The development configuration keeps this stage in the pipeline with every
//! sub-option disabled, so it passes CSS through verbatim. When options are
//! enabled, whitespace normalization is delegated to the compiler's
//! compressed output mode rather than hand-rolled.

use tracing::warn;

use crate::config::model::MinifySection;
use crate::errors::Result;
use crate::pipeline::{sass, Stage};

pub struct MinifyStage {
    cfg: MinifySection,
}

impl MinifyStage {
    pub fn new(cfg: MinifySection) -> Self {
        if cfg.discard_unused || cfg.minify_font_values || cfg.reduce_idents || cfg.merge_longhand
        {
            warn!(
                "minify options discard_unused / minify_font_values / reduce_idents / \
                 merge_longhand are accepted but have no optimization pass wired"
            );
        }
        Self { cfg }
    }
}

impl Stage for MinifyStage {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn apply(&self, css: &str) -> Result<String> {
        if self.cfg.is_inert() {
            return Ok(css.to_string());
        }

        let mut out = css.to_string();
        if self.cfg.discard_comments.remove_all {
            out = strip_comments(&out);
        }
        if self.cfg.normalize_whitespace {
            out = sass::reemit_compressed(&out)?;
        }
        Ok(out)
    }
}

/// Remove all `/* ... */` comments, including loud (`/*!`) ones, leaving
/// string contents untouched.
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut in_string: Option<char> = None;
    let mut prev = '\0';

    let mut chars = css.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            // An escaped quote (`\"`) does not end the string.
            if c == quote && prev != '\\' {
                in_string = None;
            }
            prev = c;
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut inner = '\0';
                for c2 in chars.by_ref() {
                    if inner == '*' && c2 == '/' {
                        break;
                    }
                    inner = c2;
                }
                prev = '\0';
            }
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
                prev = c;
            }
            _ => {
                out.push(c);
                prev = c;
            }
        }
    }

    out
}
