//! Integration hooks for the host's script and subtitle callbacks.
//!
//! The host glue calls these from its native entry points; each returns the
//! [`HostEvent`] to feed into the plugin.

use crate::events::{HostEvent, RawDialogue};

/// Build a dialogue event from the subtitle hook.
#[must_use]
pub fn on_subtitle_shown(
    speaker_form_id: Option<u32>,
    speaker_name: impl Into<String>,
    player_name: Option<String>,
    topic_text: impl Into<String>,
    responses: Vec<String>,
    say_once: Option<bool>,
    game_time_hours: f32,
) -> HostEvent {
    HostEvent::DialogueShown(RawDialogue {
        speaker_form_id,
        speaker_name: speaker_name.into(),
        player_name,
        topic_text: topic_text.into(),
        responses,
        say_once,
        game_time_hours,
    })
}

/// Script call: a conversation started.
#[must_use]
pub fn notify_conversation_start() -> HostEvent {
    HostEvent::ConversationStarted
}

/// Script call: characters were added to the conversation.
#[must_use]
pub fn notify_npc_added(form_ids: Vec<u32>) -> HostEvent {
    HostEvent::ParticipantsAdded(form_ids)
}

/// Script call: characters were removed from the conversation.
#[must_use]
pub fn notify_npc_removed(form_ids: Vec<u32>) -> HostEvent {
    HostEvent::ParticipantsRemoved(form_ids)
}

/// Script call: the conversation ended.
#[must_use]
pub fn notify_conversation_end() -> HostEvent {
    HostEvent::ConversationEnded
}
