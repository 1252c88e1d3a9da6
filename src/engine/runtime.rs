// src/engine/runtime.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::pipeline::Pipeline;
use crate::serve::ReloadNotifier;

/// Events sent into the runtime from the watcher or external signals.
///
/// - the watcher sends the three change variants
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Stylesheet sources changed: recompile. Re-serving or re-opening the
    /// browser must never repeat.
    StylesChanged { paths: Vec<PathBuf> },
    /// Compiled output changed (the pipeline just wrote it): reload only.
    OutputChanged,
    /// Top-level markup changed: reload only, no compilation applies.
    MarkupChanged,
    ShutdownRequested,
}

/// The dev-session event loop.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s until shutdown.
/// - Spawn a pipeline run per styles change. Runs are independent and may
///   overlap; the destination directory is last-writer-wins per file.
/// - Forward output/markup changes to the reload notifier.
pub struct Runtime {
    pipeline: Arc<Pipeline>,
    notifier: ReloadNotifier,
    events_rx: mpsc::Receiver<RuntimeEvent>,
}

impl Runtime {
    pub fn new(
        pipeline: Arc<Pipeline>,
        notifier: ReloadNotifier,
        events_rx: mpsc::Receiver<RuntimeEvent>,
    ) -> Self {
        Self {
            pipeline,
            notifier,
            events_rx,
        }
    }

    /// Main event loop. Returns when a shutdown is requested or every
    /// event producer has gone away.
    pub async fn run(mut self) -> Result<()> {
        info!("dev loop started; waiting for file changes");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::StylesChanged { paths } => self.handle_styles_changed(paths),
                RuntimeEvent::OutputChanged => {
                    debug!("compiled output changed");
                    self.notifier.reload();
                }
                RuntimeEvent::MarkupChanged => {
                    debug!("markup changed");
                    self.notifier.reload();
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping dev loop");
                    break;
                }
            }
        }

        info!("dev loop exiting");
        Ok(())
    }

    fn handle_styles_changed(&self, paths: Vec<PathBuf>) {
        info!(changed = paths.len(), "stylesheets changed; recompiling");

        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || pipeline.run_all()).await {
                Ok(report) => report.log_summary(),
                Err(err) => error!(error = %err, "compile task panicked"),
            }
        });
    }
}
