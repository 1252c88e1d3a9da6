use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use sasspipe::config::{ConfigFile, ServeSection};
use sasspipe::engine::{Runtime, RuntimeEvent};
use sasspipe::pipeline::Pipeline;
use sasspipe::serve::ReloadNotifier;
use tempfile::TempDir;
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

fn runtime_for(
    dir: &TempDir,
) -> Result<(Runtime, mpsc::Sender<RuntimeEvent>), Box<dyn Error>> {
    let pipeline = Arc::new(Pipeline::from_config(&ConfigFile::default(), dir.path())?);
    let (_layer, notifier) = ReloadNotifier::init(&ServeSection::default());
    let (tx, rx) = mpsc::channel(16);
    Ok((Runtime::new(pipeline, notifier, rx), tx))
}

#[tokio::test]
async fn shutdown_event_ends_the_loop() -> TestResult {
    let dir = TempDir::new()?;
    let (runtime, tx) = runtime_for(&dir)?;

    tx.send(RuntimeEvent::MarkupChanged).await?;
    tx.send(RuntimeEvent::OutputChanged).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    runtime.run().await?;

    Ok(())
}

#[tokio::test]
async fn closed_channel_ends_the_loop() -> TestResult {
    let dir = TempDir::new()?;
    let (runtime, tx) = runtime_for(&dir)?;

    drop(tx);
    runtime.run().await?;

    Ok(())
}

#[tokio::test]
async fn styles_change_triggers_a_recompile() -> TestResult {
    let dir = TempDir::new()?;
    let scss = dir.path().join("src/scss");
    fs::create_dir_all(&scss)?;
    let source = scss.join("base.scss");
    fs::write(&source, ".base { color: red; }\n")?;

    let (runtime, tx) = runtime_for(&dir)?;

    tx.send(RuntimeEvent::StylesChanged {
        paths: vec![source],
    })
    .await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;

    runtime.run().await?;

    // The compile runs on a spawned task; give it a moment to finish.
    let out = dir.path().join("src/css/base.css");
    for _ in 0..50 {
        if out.is_file() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert!(out.is_file(), "recompile should have produced base.css");
    let css = fs::read_to_string(&out)?;
    assert!(css.contains(".base"));

    Ok(())
}
