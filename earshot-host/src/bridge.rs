//! Bridge module: maps raw host data to `earshot-core` types.
//!
//! The host hands over engine-shaped data (form ids, response fragment
//! lists, possibly-missing names). The core wants a [`ShownDialogue`] with
//! a resolved [`CharacterKey`] and complete strings.

use earshot_core::{CharacterKey, ShownDialogue};

use crate::events::RawDialogue;

/// Name used when the host cannot report the player's display name.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Join response fragments with single spaces, skipping empty ones.
#[must_use]
pub fn join_responses<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut line = String::new();
    for fragment in fragments.iter().map(AsRef::as_ref).filter(|f| !f.is_empty()) {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(fragment);
    }
    line
}

/// The player's display name, or [`DEFAULT_PLAYER_NAME`].
#[must_use]
pub fn player_name(reported: Option<&str>) -> &str {
    match reported {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_PLAYER_NAME,
    }
}

/// Resolve a host form id. Zero is the engine's null form.
#[must_use]
pub fn character_key(form_id: Option<u32>) -> Option<CharacterKey> {
    form_id.and_then(CharacterKey::from_form_id)
}

/// Resolve a batch of form ids, dropping null forms.
#[must_use]
pub fn character_keys(form_ids: &[u32]) -> Vec<CharacterKey> {
    form_ids
        .iter()
        .filter_map(|id| CharacterKey::from_form_id(*id))
        .collect()
}

/// Convert a raw subtitle-hook line into the core's form.
#[must_use]
pub fn to_shown_dialogue(raw: &RawDialogue) -> ShownDialogue {
    ShownDialogue {
        character: character_key(raw.speaker_form_id),
        character_name: raw.speaker_name.clone(),
        player_name: player_name(raw.player_name.as_deref()).to_string(),
        topic: raw.topic_text.clone(),
        response: join_responses(&raw.responses),
        say_once: raw.say_once,
        game_time_hours: raw.game_time_hours,
    }
}
