//! In-memory stand-ins for the host collaborators.
//!
//! Used by this crate's tests, by the benches, and by host adapters that
//! want to exercise the dispatcher without a running game.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{RelayError, Result};
use crate::service::{ConfigService, ConversationService, Notifier};

/// Records every delivered text. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingService {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingService {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Forget everything delivered so far.
    pub fn reset(&self) {
        self.sent.lock().clear();
    }
}

impl ConversationService for RecordingService {
    fn send_text(&self, text: &str) -> Result<()> {
        self.sent.lock().push(text.to_string());
        Ok(())
    }
}

/// Rejects every delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingService;

impl ConversationService for FailingService {
    fn send_text(&self, _text: &str) -> Result<()> {
        Err(RelayError::Delivery("service unreachable".into()))
    }
}

/// Fixed integer settings.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, i64>,
}

impl StaticSettings {
    /// Create a store with no settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

impl ConfigService for StaticSettings {
    fn get_int_setting(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }
}

/// Records notifications. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    shown: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything shown so far, in order.
    #[must_use]
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.shown.lock().push(message.to_string());
    }
}
