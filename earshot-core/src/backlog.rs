//! Per-character queue of exchanges waiting for delivery.
//!
//! A key present in the backlog always maps to a non-empty list in capture
//! order. Draining removes the whole list at once; there is no partial
//! drain and no re-buffering after a drain.

use std::collections::BTreeMap;

use tracing::{debug, error, info};

use crate::service::ConversationService;
use crate::types::{combined_event_text, CharacterKey, Exchange};

/// Undelivered exchanges keyed by character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backlog {
    entries: BTreeMap<CharacterKey, Vec<Exchange>>,
}

impl Backlog {
    /// Create an empty backlog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `exchange` to the end of `key`'s queue, creating it if absent.
    pub fn append(&mut self, key: CharacterKey, exchange: Exchange) {
        let queue = self.entries.entry(key).or_default();
        queue.push(exchange);
        debug!(key = %key, queued = queue.len(), "Buffered exchange");
    }

    /// Remove and return `key`'s whole queue.
    pub fn take(&mut self, key: CharacterKey) -> Option<Vec<Exchange>> {
        self.entries.remove(&key)
    }

    /// Drain `key`'s queue into one combined payload and deliver it.
    ///
    /// Returns `false` if `key` had nothing buffered. Otherwise the entries
    /// are removed whatever the transport outcome: a failed delivery is
    /// logged and the lines are gone (at-most-once).
    pub fn drain_and_send(&mut self, key: CharacterKey, service: &dyn ConversationService) -> bool {
        let Some(exchanges) = self.take(key) else {
            return false;
        };

        let payload = combined_event_text(&exchanges);
        if let Err(e) = service.send_text(&payload) {
            error!(key = %key, entries = exchanges.len(), error = %e, "Failed to deliver buffered dialogue");
        } else {
            info!(key = %key, entries = exchanges.len(), "Delivered buffered dialogue");
        }
        true
    }

    /// Drop everything (session revert).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Queued exchanges for `key`, if any.
    #[must_use]
    pub fn get(&self, key: CharacterKey) -> Option<&[Exchange]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Whether `key` has anything queued.
    #[must_use]
    pub fn contains(&self, key: CharacterKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of characters with queued exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no character has anything queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total exchanges across all characters.
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Iterate queues in key order.
    pub fn iter(&self) -> impl Iterator<Item = (CharacterKey, &[Exchange])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

impl FromIterator<(CharacterKey, Vec<Exchange>)> for Backlog {
    /// Build a backlog, dropping empty queues.
    fn from_iter<I: IntoIterator<Item = (CharacterKey, Vec<Exchange>)>>(iter: I) -> Self {
        let mut backlog = Self::new();
        for (key, exchanges) in iter {
            if !exchanges.is_empty() {
                backlog.entries.entry(key).or_default().extend(exchanges);
            }
        }
        backlog
    }
}
