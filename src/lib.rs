// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod serve;
pub mod tasks;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::mpsc;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::ConfigFile;
use crate::engine::{Runtime, RuntimeEvent};
use crate::pipeline::Pipeline;
use crate::serve::ReloadNotifier;
use crate::tasks::{TaskContext, TaskGraph, TaskName, TaskOutcome, TaskRunner, TaskSpec};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task graph and its runner
/// - the transform pipeline
/// - the reload notifier + dev server layer
/// - (for long-running tasks) the runtime loop and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;

    let graph = TaskGraph::builtin();
    graph.validate()?;

    let task = args
        .task
        .map(|t| t.into_task_name())
        .unwrap_or(TaskName::Dev);

    if args.dry_run {
        print_plan(&graph, &cfg, task);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let pipeline = Arc::new(Pipeline::from_config(&cfg, &root)?);

    // Reload notifier: the layer half is consumed by `serve`, the notifier
    // half fans out to the runtime loop.
    let (livereload, notifier) = ReloadNotifier::init(&cfg.serve);

    // Runtime event channel (watcher + Ctrl-C → runtime loop).
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let ctx = TaskContext::new(cfg, root, Arc::clone(&pipeline), livereload, rt_tx.clone());
    let runner = TaskRunner::new(graph, ctx);

    let outcome = runner.run(task).await?;

    if task.keeps_process_alive() {
        // Ctrl-C → graceful shutdown.
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });

        Runtime::new(pipeline, notifier, rt_rx).run().await?;
    } else if outcome == TaskOutcome::Failed {
        bail!("task '{task}' finished with failures");
    }

    Ok(())
}

/// Figure out the project root all paths are relative to.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: effective paths plus the task plan.
fn print_plan(graph: &TaskGraph, cfg: &ConfigFile, selected: TaskName) {
    println!("sasspipe dry-run");
    println!("  paths.styles = {}", cfg.paths.styles);
    println!("  paths.dest   = {}", cfg.paths.dest);
    println!("  paths.markup = {}", cfg.paths.markup);
    println!("  serve.port   = {}", cfg.serve.port);
    println!(
        "  minify stage = {}",
        if cfg.minify.is_inert() { "inert" } else { "active" }
    );
    println!();

    println!("tasks:");
    for name in TaskName::ALL {
        let marker = if name == selected { "  (selected)" } else { "" };
        match graph.spec(name) {
            Some(TaskSpec::Action(_)) => println!("  - {name}{marker}"),
            Some(TaskSpec::Series(children)) => {
                println!("  - {name}: series {:?}{marker}", child_names(children));
            }
            Some(TaskSpec::Parallel(children)) => {
                println!("  - {name}: parallel {:?}{marker}", child_names(children));
            }
            None => {}
        }
    }
}

fn child_names(children: &[TaskName]) -> Vec<&'static str> {
    children.iter().map(|t| t.as_str()).collect()
}
