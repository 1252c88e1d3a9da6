// src/serve/reload.rs

use std::fmt;

use tower_livereload::{LiveReloadLayer, Reloader};
use tracing::debug;

use crate::config::model::ServeSection;

/// Handle for signalling connected browser sessions to refresh.
///
/// Built once at wiring time: the layer half is consumed by the dev server
/// when `serve` runs, the notifier half is cloned into the runtime loop.
/// With no server running, `reload()` is a harmless no-op (there are no
/// connected sessions).
#[derive(Clone)]
pub struct ReloadNotifier {
    reloader: Reloader,
}

impl fmt::Debug for ReloadNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadNotifier").finish()
    }
}

impl ReloadNotifier {
    /// Start the notification channel.
    pub fn init(cfg: &ServeSection) -> (LiveReloadLayer, ReloadNotifier) {
        if cfg.inject_css {
            // The transport reloads the full page; the option is accepted so
            // configs written against injecting transports stay portable.
            debug!("inject_css requested; transport performs full page reloads");
        }

        let layer = LiveReloadLayer::new();
        let reloader = layer.reloader();
        (layer, ReloadNotifier { reloader })
    }

    /// Trigger a refresh in all connected sessions. Fire-and-forget.
    pub fn reload(&self) {
        debug!("signalling connected browser sessions to refresh");
        self.reloader.reload();
    }
}
