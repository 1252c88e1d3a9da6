// src/serve/server.rs

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;
use tracing::{error, info, warn};

use crate::config::model::ServeSection;

/// Handle keeping the dev server task alive for the life of the process.
pub struct ServerHandle {
    _join: JoinHandle<()>,
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle").finish()
    }
}

/// Bind the local static server and start serving in the background.
///
/// A bind failure is returned as an error; per the task contract it is
/// fatal to the `dev` sequence. Everything after a successful bind
/// (including opening the browser) is best-effort.
pub async fn start_server(
    cfg: &ServeSection,
    project_root: &Path,
    livereload: LiveReloadLayer,
) -> Result<ServerHandle> {
    let serve_root = project_root.join(&cfg.root);

    let app = Router::new()
        .fallback_service(ServeDir::new(&serve_root))
        .layer(livereload);

    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding dev server to http://{addr}"))?;

    info!(%addr, root = ?serve_root, "dev server listening");

    let join = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            error!(error = %err, "dev server terminated");
        }
    });

    if cfg.open_browser {
        let url = format!("http://{addr}/");
        if let Err(err) = webbrowser::open(&url) {
            warn!(error = %err, url = %url, "could not open browser");
        }
    }

    Ok(ServerHandle { _join: join })
}
