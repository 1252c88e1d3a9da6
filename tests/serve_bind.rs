use std::error::Error;

use sasspipe::config::ServeSection;
use sasspipe::serve::{start_server, ReloadNotifier};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn quiet_cfg(port: u16) -> ServeSection {
    ServeSection {
        port,
        open_browser: false,
        ..ServeSection::default()
    }
}

#[tokio::test]
async fn server_binds_on_a_free_port() -> TestResult {
    let dir = TempDir::new()?;
    let cfg = quiet_cfg(0); // ephemeral port
    let (layer, _notifier) = ReloadNotifier::init(&cfg);

    let _handle = start_server(&cfg, dir.path(), layer).await?;

    Ok(())
}

#[tokio::test]
async fn occupied_port_is_a_hard_error() -> TestResult {
    let dir = TempDir::new()?;

    // Occupy a port first; the dev server must fail to bind it.
    let taken = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    let port = taken.local_addr()?.port();

    let cfg = quiet_cfg(port);
    let (layer, _notifier) = ReloadNotifier::init(&cfg);

    let err = start_server(&cfg, dir.path(), layer)
        .await
        .expect_err("binding an occupied port must fail");
    assert!(err.to_string().contains("binding dev server"));

    Ok(())
}
