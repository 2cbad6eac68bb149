//! User-facing notifications.

use tracing::{error, info, warn};

/// Sink for messages addressed to the user.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that forwards to `tracing`.
///
/// With `quiet` set, informational messages are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    quiet: bool,
}

impl LogNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        if !self.quiet {
            info!("{message}");
        }
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
