//! The capture-and-delivery state machine.
//!
//! The [`Dispatcher`] owns all mutable relay state (backlog, last accepted
//! topic, participant tracking) and is driven by host notifications:
//!
//! | Notification                | Effect                                                    |
//! |-----------------------------|-----------------------------------------------------------|
//! | `on_dialogue_shown`         | filter, then forward / buffer / forward-and-buffer         |
//! | `on_conversation_started`   | rebuild participants from roster, drain each one's backlog |
//! | `on_participant_joined`     | drain the newcomer's backlog                               |
//! | `on_conversation_ended`     | forget tracked participants; backlog untouched             |
//! | `on_participant_left`       | nothing                                                    |
//! | `revert` / `load`           | clear / replace the backlog                                |
//!
//! Routing of an accepted exchange:
//!
//! ```text
//! no conversation running            -> buffer
//! running, speaker is a participant  -> forward
//! running, speaker is not in it      -> forward and buffer
//! ```
//!
//! Overheard lines are both sent and kept, so the speaker gets them again
//! if they later join. Drained lines are never re-buffered, even if the
//! conversation they were drained into ends without being summarised.

use std::collections::BTreeSet;

use tracing::{debug, error, info, trace, warn};

use crate::backlog::Backlog;
use crate::config::{DialogueConfig, EarshotConfig};
use crate::error::Result;
use crate::filter::{DialogueFilter, SuppressReason};
use crate::membership::MembershipOracle;
use crate::record::{self, SaveRecord};
use crate::service::{ConversationService, LogNotifier, Notifier};
use crate::types::{CharacterKey, Exchange};

/// A dialogue line as reported by the host display hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownDialogue {
    /// Responding character, `None` if the host could not resolve one.
    pub character: Option<CharacterKey>,
    /// Display name of the responding character.
    pub character_name: String,
    /// Display name of the player character.
    pub player_name: String,
    /// Topic text the player selected.
    pub topic: String,
    /// Full response text.
    pub response: String,
    /// Say-once flag of the topic, `None` when the metadata is missing.
    pub say_once: Option<bool>,
    /// In-world clock in game hours.
    pub game_time_hours: f32,
}

/// Why an exchange was dropped before filtering or routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The topic text was empty.
    EmptyTopic,
    /// The responding character is on the ignore list.
    IgnoredCharacter,
    /// The responding character could not be resolved.
    MissingCharacter,
}

/// What happened to one `on_dialogue_shown` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Capture is switched off.
    Disabled,
    /// Dropped before filtering or routing.
    Dropped(DropReason),
    /// Rejected by a content filter.
    Suppressed(SuppressReason),
    /// Stored for the speaker's next conversation.
    Buffered,
    /// Sent to the running conversation.
    Forwarded,
    /// Sent to the running conversation and stored for the speaker.
    ForwardedAndBuffered,
}

/// Owns the relay state and reacts to host notifications.
pub struct Dispatcher {
    config: DialogueConfig,
    notifications: bool,
    filter: DialogueFilter,
    oracle: MembershipOracle,
    backlog: Backlog,
    participants: BTreeSet<CharacterKey>,
    service: Box<dyn ConversationService>,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("oracle", &self.oracle)
            .field("backlog_characters", &self.backlog.len())
            .field("participants", &self.participants)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher with an empty backlog.
    #[must_use]
    pub fn new(
        config: &EarshotConfig,
        oracle: MembershipOracle,
        service: impl ConversationService + 'static,
    ) -> Self {
        Self {
            config: config.dialogue.clone(),
            notifications: config.logging.debug_notifications,
            filter: DialogueFilter::new(config.dialogue.clone()),
            oracle,
            backlog: Backlog::new(),
            participants: BTreeSet::new(),
            service: Box::new(service),
            notifier: Box::new(LogNotifier),
        }
    }

    /// Replace the default log-only notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // ------------------------------------------------------------------
    // Capture path
    // ------------------------------------------------------------------

    /// Handle one displayed dialogue line.
    pub fn on_dialogue_shown(&mut self, line: &ShownDialogue) -> DispatchOutcome {
        if !self.config.enable_vanilla_dialogue_tracking {
            return DispatchOutcome::Disabled;
        }

        if line.topic.is_empty() {
            warn!(character = %line.character_name, "Dialogue shown with empty topic text");
            return DispatchOutcome::Dropped(DropReason::EmptyTopic);
        }

        if self.config.is_ignored_name(&line.character_name) {
            debug!(character = %line.character_name, "Ignoring dialogue from excluded character");
            return DispatchOutcome::Dropped(DropReason::IgnoredCharacter);
        }

        if let Some(reason) = self.filter.check(&line.topic, &line.response, line.say_once) {
            debug!(topic = %line.topic, %reason, "Suppressed exchange");
            if reason != SuppressReason::Duplicate {
                self.notify(&format!("Filtered: {reason}"));
            }
            return DispatchOutcome::Suppressed(reason);
        }

        let Some(key) = line.character else {
            error!(topic = %line.topic, "Dialogue speaker is not a character");
            return DispatchOutcome::Dropped(DropReason::MissingCharacter);
        };

        let exchange = Exchange::new(
            line.player_name.as_str(),
            line.topic.as_str(),
            line.character_name.as_str(),
            line.response.as_str(),
            line.game_time_hours,
        );
        let outcome = self.route(key, exchange);

        self.filter.mark_processed(&line.topic);
        outcome
    }

    fn route(&mut self, key: CharacterKey, exchange: Exchange) -> DispatchOutcome {
        if !self.oracle.is_conversation_active() {
            self.backlog.append(key, exchange);
            if self.oracle.has_error() {
                self.notify("Dialogue tracker error, line stored");
            } else {
                self.notify("No conversation, line stored");
            }
            return DispatchOutcome::Buffered;
        }

        self.forward(key, &exchange);
        if self.oracle.is_participant(Some(key)) {
            DispatchOutcome::Forwarded
        } else {
            self.backlog.append(key, exchange);
            DispatchOutcome::ForwardedAndBuffered
        }
    }

    fn forward(&self, key: CharacterKey, exchange: &Exchange) {
        match self.service.send_text(&exchange.event_text()) {
            Ok(()) => debug!(key = %key, "Forwarded exchange"),
            Err(e) => error!(key = %key, error = %e, "Failed to forward exchange"),
        }
    }

    // ------------------------------------------------------------------
    // Conversation lifecycle
    // ------------------------------------------------------------------

    /// A conversation began: rebuild the participant set from the roster
    /// and drain every participant's backlog.
    ///
    /// Returns how many backlogs were drained.
    pub fn on_conversation_started(&mut self) -> usize {
        if self.oracle.has_error() {
            return 0;
        }

        self.participants = self.oracle.participants();
        let mut drained = 0;
        for key in &self.participants {
            if self.backlog.drain_and_send(*key, self.service.as_ref()) {
                drained += 1;
            }
        }

        info!(participants = self.participants.len(), drained, "Conversation started");
        if drained > 0 {
            self.notify("Participants had captured dialogue, sent it to the conversation");
        }
        drained
    }

    /// A character joined the running conversation: drain their backlog.
    ///
    /// Returns whether anything was drained.
    pub fn on_participant_joined(&mut self, key: Option<CharacterKey>) -> bool {
        let Some(key) = key else {
            return false;
        };
        if self.oracle.has_error() {
            return false;
        }

        self.participants.insert(key);
        let drained = self.backlog.drain_and_send(key, self.service.as_ref());
        if drained {
            self.notify("Actor had captured dialogue, sent it to the conversation");
        }
        drained
    }

    /// Several characters joined at once; drained in the given order.
    ///
    /// Returns how many backlogs were drained.
    pub fn on_participants_joined(&mut self, keys: &[CharacterKey]) -> usize {
        keys.iter()
            .filter(|key| self.on_participant_joined(Some(**key)))
            .count()
    }

    /// A character left the conversation. Removal is not tracked.
    pub fn on_participant_left(&mut self, key: Option<CharacterKey>) {
        trace!(key = ?key, "Participant left");
    }

    /// The conversation ended. Only transient tracking is cleared.
    pub fn on_conversation_ended(&mut self) {
        self.participants.clear();
        info!(backlog = self.backlog.len(), "Conversation ended");
    }

    // ------------------------------------------------------------------
    // Save integration
    // ------------------------------------------------------------------

    /// Forget every buffered exchange (the host reverted the session).
    pub fn revert(&mut self) {
        self.backlog.clear();
        info!("Cleared dialogue history");
    }

    /// The `HIST` record to write into the co-save.
    ///
    /// # Errors
    /// Propagates codec failures.
    pub fn save_record(&self) -> Result<SaveRecord> {
        let record = SaveRecord::history(&self.backlog)?;
        info!(
            characters = self.backlog.len(),
            bytes = record.data.len(),
            "Serialized dialogue history"
        );
        Ok(record)
    }

    /// Replace the backlog with the one stored in `records`.
    ///
    /// The backlog is always cleared first. A missing record leaves it
    /// empty; a malformed or unknown-version record is logged and also
    /// leaves it empty.
    pub fn load(&mut self, records: &[SaveRecord]) {
        self.backlog.clear();
        match record::restore_history(records) {
            Ok(Some(backlog)) => {
                self.backlog = backlog;
                info!(characters = self.backlog.len(), "Loaded dialogue history");
                self.notify(&format!("Loaded {} actors with pending lines", self.backlog.len()));
            }
            Ok(None) => {}
            Err(e) => error!(error = %e, "Failed to load dialogue history"),
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// The buffered exchanges.
    #[must_use]
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    /// Participants tracked since the last conversation start.
    #[must_use]
    pub fn participants(&self) -> &BTreeSet<CharacterKey> {
        &self.participants
    }

    /// Whether the roster currently shows a running conversation.
    #[must_use]
    pub fn is_conversation_active(&self) -> bool {
        self.oracle.is_conversation_active()
    }

    /// The membership oracle.
    #[must_use]
    pub fn oracle(&self) -> &MembershipOracle {
        &self.oracle
    }

    /// The content filter and its last accepted topic.
    #[must_use]
    pub fn filter(&self) -> &DialogueFilter {
        &self.filter
    }

    fn notify(&self, message: &str) {
        if self.notifications {
            self.notifier.notify(message);
        }
    }
}
