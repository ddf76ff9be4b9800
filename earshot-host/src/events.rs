//! Host notifications.
//!
//! Everything the host reports arrives as one [`HostEvent`] and is handed to
//! [`RelayPlugin::handle`](crate::plugin::RelayPlugin::handle).

/// A dialogue line exactly as the host's subtitle hook sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDialogue {
    /// Form id of the speaking reference, `None` if it is not an actor.
    pub speaker_form_id: Option<u32>,
    /// Display name of the speaker.
    pub speaker_name: String,
    /// Player display name, `None` if the host could not provide one.
    pub player_name: Option<String>,
    /// Topic text the player selected.
    pub topic_text: String,
    /// Response fragments in display order. Empty ones are skipped.
    pub responses: Vec<String>,
    /// Say-once flag of the topic, `None` if the topic info is missing.
    pub say_once: Option<bool>,
    /// In-world clock in game hours.
    pub game_time_hours: f32,
}

/// A notification from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A dialogue line was displayed.
    DialogueShown(RawDialogue),
    /// A conversation began.
    ConversationStarted,
    /// Characters joined the running conversation (form ids).
    ParticipantsAdded(Vec<u32>),
    /// Characters left the running conversation (form ids).
    ParticipantsRemoved(Vec<u32>),
    /// The conversation ended.
    ConversationEnded,
}

impl HostEvent {
    /// Short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DialogueShown(_) => "dialogue_shown",
            Self::ConversationStarted => "conversation_started",
            Self::ParticipantsAdded(_) => "participants_added",
            Self::ParticipantsRemoved(_) => "participants_removed",
            Self::ConversationEnded => "conversation_ended",
        }
    }
}
