// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::watch::hash::ContentTracker;
use crate::watch::patterns::{WatchProfiles, WatchRoute};

/// Quiet window used to coalesce event bursts. An editor save typically
/// produces several events within a few milliseconds; one compile per save
/// is enough. The window restarts on every event, so the final event of a
/// burst is always included in the batch.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(80);

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// One debounced batch of routed changes.
#[derive(Debug, Default)]
struct Batch {
    styles: BTreeSet<PathBuf>,
    output: bool,
    markup: bool,
}

impl Batch {
    fn is_empty(&self) -> bool {
        self.styles.is_empty() && !self.output && !self.markup
    }
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and forwards routed changes to the runtime:
///
/// - stylesheet sources → [`RuntimeEvent::StylesChanged`]
/// - compiled output    → [`RuntimeEvent::OutputChanged`]
/// - markup files       → [`RuntimeEvent::MarkupChanged`]
///
/// Compilation writes into the output directory, so output events must
/// never feed back into compilation; the route split is what prevents the
/// recompile loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profiles: WatchProfiles,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    let profiles = Arc::new(profiles);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fall back to stderr.
                    eprintln!("sasspipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("sasspipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that debounces notify events and forwards routed batches.
    let async_root = root.clone();
    let async_profiles = Arc::clone(&profiles);
    tokio::spawn(async move {
        let mut tracker = ContentTracker::new();

        while let Some(first) = event_rx.recv().await {
            let mut batch = Batch::default();
            collect(&mut batch, &first, &async_root, &async_profiles);

            // Coalesce the burst: keep draining until the stream goes quiet.
            loop {
                tokio::select! {
                    more = event_rx.recv() => match more {
                        Some(event) => collect(&mut batch, &event, &async_root, &async_profiles),
                        None => break,
                    },
                    _ = tokio::time::sleep(DEBOUNCE_WINDOW) => break,
                }
            }

            if batch.is_empty() {
                continue;
            }

            if !emit_batch(batch, &mut tracker, &runtime_tx).await {
                // Runtime channel closed; no point keeping the loop alive.
                return;
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Route every path of one notify event into the current batch.
fn collect(batch: &mut Batch, event: &Event, root: &Path, profiles: &WatchProfiles) {
    // Access notifications and the like carry no content change.
    if !(event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove()) {
        return;
    }

    for path in &event.paths {
        let Some(rel) = relative_str(root, path) else {
            debug!("ignoring path outside project root: {:?}", path);
            continue;
        };

        match profiles.classify(&rel) {
            Some(WatchRoute::Styles) => {
                debug!(path = %rel, "stylesheet change");
                batch.styles.insert(path.clone());
            }
            Some(WatchRoute::Output) => {
                debug!(path = %rel, "output change");
                batch.output = true;
            }
            Some(WatchRoute::Markup) => {
                debug!(path = %rel, "markup change");
                batch.markup = true;
            }
            None => {}
        }
    }
}

/// Send the runtime events for one debounced batch.
///
/// Returns false if the runtime channel is closed.
async fn emit_batch(
    batch: Batch,
    tracker: &mut ContentTracker,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    // Only styles whose bytes actually changed count.
    let changed: Vec<PathBuf> = batch
        .styles
        .into_iter()
        .filter(|p| tracker.update(p))
        .collect();

    if !changed.is_empty() {
        let event = RuntimeEvent::StylesChanged { paths: changed };
        if let Err(err) = runtime_tx.send(event).await {
            warn!("failed to send StylesChanged to runtime: {err}");
            return false;
        }
    }

    if batch.output {
        if let Err(err) = runtime_tx.send(RuntimeEvent::OutputChanged).await {
            warn!("failed to send OutputChanged to runtime: {err}");
            return false;
        }
    }

    if batch.markup {
        if let Err(err) = runtime_tx.send(RuntimeEvent::MarkupChanged).await {
            warn!("failed to send MarkupChanged to runtime: {err}");
            return false;
        }
    }

    true
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
