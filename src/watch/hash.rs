// src/watch/hash.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// In-memory record of the last observed content hash per watched source.
///
/// Editors commonly emit several filesystem events for a single save, and
/// some write the file without changing its bytes (touch, atomic-rename
/// dances). The tracker lets the watcher suppress triggers for events that
/// don't change content.
///
/// State is per-session only; nothing is persisted across runs.
#[derive(Debug, Default)]
pub struct ContentTracker {
    seen: HashMap<PathBuf, blake3::Hash>,
}

impl ContentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current content of `path` and report whether it differs
    /// from the last observation.
    ///
    /// A path that cannot be read (deleted, mid-rename) always counts as
    /// changed; its entry is dropped so a later rewrite is seen as new.
    pub fn update(&mut self, path: &Path) -> bool {
        match fs::read(path) {
            Ok(bytes) => {
                let hash = blake3::hash(&bytes);
                let previous = self.seen.insert(path.to_path_buf(), hash);
                let changed = previous != Some(hash);
                if !changed {
                    debug!(path = ?path, "content unchanged; suppressing trigger");
                }
                changed
            }
            Err(_) => {
                self.seen.remove(path);
                true
            }
        }
    }
}
