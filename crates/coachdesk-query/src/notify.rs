//! User-facing notifications raised by mutations.

use tracing::{info, warn};

/// Sink for mutation outcomes.
///
/// Query failures never reach the notifier; only mutations report here.
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that writes to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "coachdesk::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        warn!(target: "coachdesk::notify", "{}", message);
    }
}
