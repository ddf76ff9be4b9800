//! Boundaries to the outside world: the conversation service, the host's
//! settings store, and on-screen notifications.

use tracing::debug;

use crate::error::Result;

/// The external conversation orchestrator that consumes dialogue text.
///
/// Delivery is fire-and-forget: the core calls this once per payload,
/// logs a failure, and never retries.
pub trait ConversationService {
    /// Deliver one text event.
    ///
    /// # Errors
    /// Returns `RelayError::Delivery` when the service did not accept the text.
    fn send_text(&self, text: &str) -> Result<()>;
}

/// Read-only access to the host's menu-configured settings.
pub trait ConfigService {
    /// Read a named integer setting, or `None` when it is absent.
    fn get_int_setting(&self, name: &str) -> Option<i64>;
}

/// Lightweight in-game notifications. Purely cosmetic.
pub trait Notifier {
    /// Show `message` to the player.
    fn notify(&self, message: &str);
}

/// A notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        debug!(message, "Notification");
    }
}
