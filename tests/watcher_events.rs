use std::error::Error;
use std::fs;
use std::time::Duration;

use sasspipe::config::ConfigFile;
use sasspipe::engine::RuntimeEvent;
use sasspipe::watch::{spawn_watcher, WatchProfiles, WatcherHandle};
use tempfile::TempDir;
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

const RECV_DEADLINE: Duration = Duration::from_secs(5);

fn watched_project(
    dir: &TempDir,
) -> Result<(WatcherHandle, mpsc::Receiver<RuntimeEvent>), Box<dyn Error>> {
    let profiles = WatchProfiles::from_config(&ConfigFile::default())?;
    let (tx, rx) = mpsc::channel(16);
    let handle = spawn_watcher(dir.path(), profiles, tx)?;
    Ok((handle, rx))
}

async fn next_event(rx: &mut mpsc::Receiver<RuntimeEvent>) -> Option<RuntimeEvent> {
    tokio::time::timeout(RECV_DEADLINE, rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn a_save_burst_coalesces_and_keeps_the_final_write() -> TestResult {
    let dir = TempDir::new()?;
    let scss = dir.path().join("src/scss");
    fs::create_dir_all(&scss)?;

    let (_handle, mut rx) = watched_project(&dir)?;

    // Give the OS watcher a moment to establish its subscription.
    tokio::time::sleep(Duration::from_millis(300)).await;

    // An editor save storm: several writes in quick succession, ending with
    // a write to a fresh file.
    let base = scss.join("base.scss");
    for i in 0..5 {
        fs::write(&base, format!(".base {{ padding: {i}px; }}\n"))?;
    }
    let last = scss.join("last.scss");
    fs::write(&last, ".last { color: red; }\n")?;

    // The burst may land in one batch or several, but the final write must
    // show up in a StylesChanged event.
    let mut seen_last = false;
    while !seen_last {
        match next_event(&mut rx).await {
            Some(RuntimeEvent::StylesChanged { paths }) => {
                seen_last = paths.iter().any(|p| p.ends_with("last.scss"));
            }
            Some(_) => {}
            None => break,
        }
    }
    assert!(seen_last, "the final write of the burst must be reported");

    Ok(())
}

#[tokio::test]
async fn output_directory_writes_report_a_reload_not_a_recompile() -> TestResult {
    let dir = TempDir::new()?;
    let css_dir = dir.path().join("src/css");
    fs::create_dir_all(&css_dir)?;

    let (_handle, mut rx) = watched_project(&dir)?;

    tokio::time::sleep(Duration::from_millis(300)).await;

    fs::write(css_dir.join("app.css"), ".app{color:red}\n")?;

    loop {
        match next_event(&mut rx).await {
            Some(RuntimeEvent::OutputChanged) => break,
            Some(RuntimeEvent::StylesChanged { paths }) => {
                panic!("output write must not route to compilation: {paths:?}");
            }
            Some(_) => {}
            None => panic!("expected an OutputChanged event"),
        }
    }

    Ok(())
}

#[tokio::test]
async fn markup_writes_report_a_reload() -> TestResult {
    let dir = TempDir::new()?;
    let (_handle, mut rx) = watched_project(&dir)?;

    tokio::time::sleep(Duration::from_millis(300)).await;

    fs::write(dir.path().join("index.html"), "<html></html>\n")?;

    loop {
        match next_event(&mut rx).await {
            Some(RuntimeEvent::MarkupChanged) => break,
            Some(other) => panic!("unexpected event for a markup write: {other:?}"),
            None => panic!("expected a MarkupChanged event"),
        }
    }

    Ok(())
}
