// src/tasks/runner.rs

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, Mutex};
use tower_livereload::LiveReloadLayer;
use tracing::{info, warn};

use crate::config::model::ConfigFile;
use crate::engine::RuntimeEvent;
use crate::pipeline::Pipeline;
use crate::serve::{start_server, ServerHandle};
use crate::tasks::graph::{ActionKind, TaskGraph, TaskName, TaskSpec};
use crate::watch::{spawn_watcher, WatcherHandle, WatchProfiles};

/// Explicit result of one task invocation.
///
/// `Failed` is a soft outcome: a series logs it and keeps going (stylesheet
/// errors must not block iterative development). Hard errors, like the dev
/// server failing to bind, are `Err` and abort the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

/// Shared state the actions operate on.
///
/// The livereload layer is consumed by the first `serve` invocation; the
/// server and watcher handles are parked here so they live for the rest of
/// the process.
pub struct TaskContext {
    cfg: ConfigFile,
    root: PathBuf,
    pipeline: Arc<Pipeline>,
    livereload: Mutex<Option<LiveReloadLayer>>,
    rt_tx: mpsc::Sender<RuntimeEvent>,
    server: Mutex<Option<ServerHandle>>,
    watcher: Mutex<Option<WatcherHandle>>,
}

impl TaskContext {
    pub fn new(
        cfg: ConfigFile,
        root: PathBuf,
        pipeline: Arc<Pipeline>,
        livereload: LiveReloadLayer,
        rt_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            cfg,
            root,
            pipeline,
            livereload: Mutex::new(Some(livereload)),
            rt_tx,
            server: Mutex::new(None),
            watcher: Mutex::new(None),
        }
    }
}

/// Interprets the task graph.
///
/// Cheap to clone; `Parallel` children run on spawned tasks sharing the
/// same inner state.
#[derive(Clone)]
pub struct TaskRunner {
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    graph: TaskGraph,
    ctx: TaskContext,
}

impl TaskRunner {
    pub fn new(graph: TaskGraph, ctx: TaskContext) -> Self {
        Self {
            inner: Arc::new(RunnerInner { graph, ctx }),
        }
    }

    /// Run one named task to completion.
    pub async fn run(&self, task: TaskName) -> Result<TaskOutcome> {
        self.run_boxed(task).await
    }

    // Recursive through Series/Parallel, hence the boxed future.
    fn run_boxed(
        &self,
        task: TaskName,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>> {
        Box::pin(async move {
            let spec = self
                .inner
                .graph
                .spec(task)
                .ok_or_else(|| anyhow!("no spec registered for task '{task}'"))?;

            info!(task = %task, "task starting");

            match spec {
                TaskSpec::Action(kind) => self.run_action(*kind).await,
                TaskSpec::Series(children) => {
                    let mut outcome = TaskOutcome::Success;
                    for child in children {
                        if self.run_boxed(*child).await? == TaskOutcome::Failed {
                            warn!(task = %task, child = %child, "step failed; continuing series");
                            outcome = TaskOutcome::Failed;
                        }
                    }
                    Ok(outcome)
                }
                TaskSpec::Parallel(children) => {
                    let mut handles = Vec::with_capacity(children.len());
                    for child in children {
                        let runner = self.clone();
                        let child = *child;
                        handles.push(tokio::spawn(async move { runner.run(child).await }));
                    }

                    let mut outcome = TaskOutcome::Success;
                    for handle in handles {
                        if handle.await.context("parallel task panicked")??
                            == TaskOutcome::Failed
                        {
                            outcome = TaskOutcome::Failed;
                        }
                    }
                    Ok(outcome)
                }
            }
        })
    }

    async fn run_action(&self, kind: ActionKind) -> Result<TaskOutcome> {
        match kind {
            ActionKind::Compile => self.action_compile().await,
            ActionKind::Serve => self.action_serve().await,
            ActionKind::Watch => self.action_watch().await,
        }
    }

    /// Run the pipeline once. Per-file failures are already reported by the
    /// pipeline; here they only soften the outcome.
    async fn action_compile(&self) -> Result<TaskOutcome> {
        let pipeline = Arc::clone(&self.inner.ctx.pipeline);
        let report = tokio::task::spawn_blocking(move || pipeline.run_all())
            .await
            .context("compile task panicked")?;

        report.log_summary();
        Ok(if report.all_succeeded() {
            TaskOutcome::Success
        } else {
            TaskOutcome::Failed
        })
    }

    /// Start the dev server. A bind failure is a hard error.
    async fn action_serve(&self) -> Result<TaskOutcome> {
        let ctx = &self.inner.ctx;

        let layer = ctx
            .livereload
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow!("dev server can only be started once per process"))?;

        let handle = start_server(&ctx.cfg.serve, &ctx.root, layer).await?;
        *ctx.server.lock().await = Some(handle);

        Ok(TaskOutcome::Success)
    }

    /// Arm the watch subscriptions and return immediately; the watcher runs
    /// in the background for the life of the process.
    async fn action_watch(&self) -> Result<TaskOutcome> {
        let ctx = &self.inner.ctx;

        let profiles = WatchProfiles::from_config(&ctx.cfg)?;
        let handle = spawn_watcher(ctx.root.clone(), profiles, ctx.rt_tx.clone())?;
        *ctx.watcher.lock().await = Some(handle);

        Ok(TaskOutcome::Success)
    }
}
