//! Plugin lifecycle.
//!
//! [`RelayPlugin`] is what the host glue holds on to: built once at startup,
//! fed every [`HostEvent`], and called from the co-save save, load and
//! revert callbacks.

use std::path::Path;

use earshot_core::error::Result;
use earshot_core::record::SaveRecord;
use earshot_core::{
    ConfigService, ConversationService, DispatchOutcome, Dispatcher, EarshotConfig, MembershipOracle,
    Notifier, ParticipantRoster,
};
use earshot_service::HttpConversationService;
use tracing::{error, info, trace, warn};

use crate::bridge;
use crate::events::HostEvent;
use crate::logging;

/// The relay as seen by the host.
#[derive(Debug)]
pub struct RelayPlugin {
    config: EarshotConfig,
    dispatcher: Dispatcher,
}

impl RelayPlugin {
    /// Assemble a plugin around an arbitrary delivery service.
    ///
    /// `roster` is the outcome of locating the host's participant list; an
    /// error puts membership into its permanent error state.
    pub fn new(
        config: EarshotConfig,
        roster: Result<Box<dyn ParticipantRoster>>,
        service: impl ConversationService + 'static,
    ) -> Self {
        let dispatcher = Dispatcher::new(&config, MembershipOracle::setup(roster), service);
        info!(
            tracking = config.dialogue.enable_vanilla_dialogue_tracking,
            ignored_names = config.dialogue.npc_names_to_ignore.len(),
            "Relay plugin ready"
        );
        Self { config, dispatcher }
    }

    /// Production startup: logging, endpoint resolution, HTTP delivery.
    ///
    /// # Errors
    /// Returns `RelayError::Delivery` if the HTTP client cannot be built.
    pub fn startup(
        config: EarshotConfig,
        settings: &dyn ConfigService,
        roster: Result<Box<dyn ParticipantRoster>>,
    ) -> Result<Self> {
        logging::init_logging(&config.logging);
        let service = HttpConversationService::from_config(&config.service, settings)?;
        Ok(Self::new(config, roster, service))
    }

    /// Read the configuration file, falling back to defaults.
    #[must_use]
    pub fn load_config(path: &Path) -> EarshotConfig {
        match EarshotConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Using default configuration");
                EarshotConfig::default()
            }
        }
    }

    /// Route on-screen notifications to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.dispatcher = self.dispatcher.with_notifier(notifier);
        self
    }

    /// Handle one host notification.
    ///
    /// Returns the dispatch decision for dialogue lines, `None` otherwise.
    pub fn handle(&mut self, event: HostEvent) -> Option<DispatchOutcome> {
        trace!(kind = event.kind(), "Host event");
        match event {
            HostEvent::DialogueShown(raw) => {
                Some(self.dispatcher.on_dialogue_shown(&bridge::to_shown_dialogue(&raw)))
            }
            HostEvent::ConversationStarted => {
                self.dispatcher.on_conversation_started();
                None
            }
            HostEvent::ParticipantsAdded(form_ids) => {
                self.dispatcher
                    .on_participants_joined(&bridge::character_keys(&form_ids));
                None
            }
            HostEvent::ParticipantsRemoved(form_ids) => {
                for key in bridge::character_keys(&form_ids) {
                    self.dispatcher.on_participant_left(Some(key));
                }
                None
            }
            HostEvent::ConversationEnded => {
                self.dispatcher.on_conversation_ended();
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Co-save callbacks
    // ------------------------------------------------------------------

    /// Save callback: the framed record stream to write.
    ///
    /// # Errors
    /// Propagates codec and framing failures.
    pub fn save(&self) -> Result<Vec<u8>> {
        let record = self.dispatcher.save_record()?;
        SaveRecord::write_all(&[record])
    }

    /// Load callback: replace the backlog with the one in `stream`.
    ///
    /// A corrupt stream is logged and leaves the backlog empty.
    pub fn load(&mut self, stream: &[u8]) {
        match SaveRecord::read_all(stream) {
            Ok(records) => self.dispatcher.load(&records),
            Err(e) => {
                error!(bytes = stream.len(), error = %e, "Unreadable co-save stream");
                self.dispatcher.load(&[]);
            }
        }
    }

    /// Revert callback: the session is being reset.
    pub fn revert(&mut self) {
        self.dispatcher.revert();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The configuration the plugin was built with.
    #[must_use]
    pub fn config(&self) -> &EarshotConfig {
        &self.config
    }
}
