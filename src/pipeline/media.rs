// src/pipeline/media.rs

//! Media-query consolidation ("mobile-first" ordering).
//!
//! Top-level `@media` blocks with the same condition are merged into one,
//! and the merged groups are appended after all other rules, ordered by
//! ascending breakpoint. Rule bodies are carried verbatim, so applying the
//! stage twice yields the same output.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::Result;
use crate::pipeline::Stage;

/// Stage 2 of the pipeline. Must run before minification, which assumes
/// already-sorted rules.
#[derive(Debug, Default)]
pub struct MediaGroupStage;

impl MediaGroupStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for MediaGroupStage {
    fn name(&self) -> &'static str {
        "group-media-queries"
    }

    fn apply(&self, css: &str) -> Result<String> {
        Ok(group_media_queries(css))
    }
}

/// Merge and reorder top-level `@media` blocks.
///
/// Ordering policy:
/// 1. non-media rules, in source order
/// 2. groups with a `min-width`, ascending ("mobile-first")
/// 3. groups with only a `max-width`, descending
/// 4. remaining groups, in source order
pub fn group_media_queries(css: &str) -> String {
    let items = split_top_level(css);

    let mut others: Vec<String> = Vec::new();
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for item in items {
        match parse_media(&item) {
            Some((cond, body)) => {
                if !groups.contains_key(&cond) {
                    group_order.push(cond.clone());
                }
                groups.entry(cond).or_default().push(body);
            }
            None => others.push(item),
        }
    }

    let mut ordered: Vec<(usize, String)> = group_order.into_iter().enumerate().collect();
    ordered.sort_by_key(|(idx, cond)| breakpoint_rank(cond, *idx));

    let mut out = others;
    for (_, cond) in ordered {
        let bodies = groups.remove(&cond).unwrap_or_default();
        let body = bodies.join("\n");
        out.push(format!("@media {cond} {{\n{body}\n}}"));
    }

    if out.is_empty() {
        return String::new();
    }

    let mut result = out.join("\n\n");
    result.push('\n');
    result
}

static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(min|max)-width\s*:\s*([0-9]*\.?[0-9]+)\s*(px|rem|em)")
        .expect("width pattern compiles")
});

/// Sort key for one media condition.
///
/// `em`/`rem` breakpoints are compared against `px` at the canonical 16px
/// root font size. The original index keeps the sort stable for conditions
/// without a recognizable width.
fn breakpoint_rank(cond: &str, idx: usize) -> (u8, i64, usize) {
    let mut min_px: Option<f64> = None;
    let mut max_px: Option<f64> = None;

    for cap in WIDTH_RE.captures_iter(cond) {
        let value: f64 = match cap[2].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let px = match &cap[3] {
            "em" | "rem" => value * 16.0,
            _ => value,
        };
        match &cap[1] {
            "min" => min_px = Some(min_px.map_or(px, |m: f64| m.min(px))),
            _ => max_px = Some(max_px.map_or(px, |m: f64| m.max(px))),
        }
    }

    match (min_px, max_px) {
        (Some(min), _) => (0, (min * 100.0) as i64, idx),
        (None, Some(max)) => (1, -((max * 100.0) as i64), idx),
        (None, None) => (2, 0, idx),
    }
}

/// Split a stylesheet into top-level statements: brace-balanced blocks and
/// `;`-terminated at-rules. Strings and comments are skipped so braces
/// inside them don't confuse the depth count.
fn split_top_level(css: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut item_start = 0usize;
    let mut in_string: Option<char> = None;
    let mut in_comment = false;
    let mut prev = '\0';

    let mut chars = css.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if in_comment {
            if prev == '*' && c == '/' {
                in_comment = false;
                prev = '\0';
            } else {
                prev = c;
            }
            continue;
        }

        if let Some(quote) = in_string {
            if c == quote && prev != '\\' {
                in_string = None;
            }
            prev = c;
            continue;
        }

        match c {
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                // Consume the opener's `*` so it can't double as the closer
                // (`/*/` must leave the comment open).
                chars.next();
                in_comment = true;
                prev = '\0';
                continue;
            }
            '"' | '\'' => in_string = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    push_item(&mut items, &css[item_start..i + 1]);
                    item_start = i + 1;
                }
            }
            ';' if depth == 0 => {
                push_item(&mut items, &css[item_start..i + 1]);
                item_start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }

    push_item(&mut items, &css[item_start..]);
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let item = raw.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

/// Extract `(normalized condition, body)` from a top-level `@media` block.
fn parse_media(item: &str) -> Option<(String, String)> {
    let rest = item.strip_prefix("@media")?;
    let open = rest.find('{')?;
    let close = rest.rfind('}')?;
    if close <= open {
        return None;
    }

    let cond = normalize_ws(&rest[..open]);
    let body = rest[open + 1..close]
        .trim_matches(['\n', '\r'])
        .trim_end()
        .to_string();
    Some((cond, body))
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
