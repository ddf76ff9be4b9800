//! Core type definitions for captured dialogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable identifier of a non-player character.
///
/// This is the engine-assigned numeric form identity, which survives
/// save/load. It keys the [`Backlog`](crate::Backlog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterKey(pub u32);

impl CharacterKey {
    /// Map a raw host form id to a key. Form id `0` is the engine's null form.
    #[must_use]
    pub fn from_form_id(form_id: u32) -> Option<Self> {
        (form_id != 0).then_some(Self(form_id))
    }
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl FromStr for CharacterKey {
    type Err = RelayError;

    /// Parse the decimal form used as an object key in saved backlogs.
    ///
    /// Only plain digits are accepted, and the null form `0` is refused.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RelayError::Serialization(format!("invalid character key '{s}'")));
        }
        s.parse::<u32>()
            .map_err(|e| RelayError::Serialization(format!("invalid character key '{s}': {e}")))
            .and_then(|id| {
                Self::from_form_id(id)
                    .ok_or_else(|| RelayError::Serialization(format!("null character key '{s}'")))
            })
    }
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// One captured dialogue turn: what the player picked and what the
/// character answered.
///
/// Fields are private; an exchange never changes after capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    speaker_name: String,
    speaker_query: String,
    response_name: String,
    response_text: String,
    timestamp: f32,
}

impl Exchange {
    /// Capture a new exchange.
    ///
    /// `timestamp` is the in-world clock in game hours. A non-finite
    /// reading is stored as `0.0`.
    #[must_use]
    pub fn new(
        speaker_name: impl Into<String>,
        speaker_query: impl Into<String>,
        response_name: impl Into<String>,
        response_text: impl Into<String>,
        timestamp: f32,
    ) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            speaker_query: speaker_query.into(),
            response_name: response_name.into(),
            response_text: response_text.into(),
            timestamp: if timestamp.is_finite() { timestamp } else { 0.0 },
        }
    }

    /// Display name of the player character.
    #[must_use]
    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    /// The topic text the player selected.
    #[must_use]
    pub fn speaker_query(&self) -> &str {
        &self.speaker_query
    }

    /// Display name of the responding character.
    #[must_use]
    pub fn response_name(&self) -> &str {
        &self.response_name
    }

    /// Everything the responding character says for this topic.
    #[must_use]
    pub fn response_text(&self) -> &str {
        &self.response_text
    }

    /// In-world clock reading (game hours) at capture time.
    #[must_use]
    pub fn timestamp(&self) -> f32 {
        self.timestamp
    }

    /// Render this exchange as a conversation-service event line.
    #[must_use]
    pub fn event_text(&self) -> String {
        format!(
            "{}: {}; {}: {}",
            self.speaker_name, self.speaker_query, self.response_name, self.response_text
        )
    }
}

/// Concatenate exchanges into the single payload sent on drain.
///
/// Each exchange renders as `"{speaker}: {query}; {responder}: {response} "`
/// and trailing whitespace is trimmed from the result.
#[must_use]
pub fn combined_event_text(exchanges: &[Exchange]) -> String {
    let mut payload = String::new();
    for exchange in exchanges {
        payload.push_str(&exchange.event_text());
        payload.push(' ');
    }
    payload.truncate(payload.trim_end().len());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(query: &str, response: &str) -> Exchange {
        Exchange::new("Dovahkiin", query, "Lydia", response, 12.5)
    }

    #[test]
    fn event_text_names_both_sides() {
        let e = exchange("Follow me.", "Lead the way.");
        assert_eq!(e.event_text(), "Dovahkiin: Follow me.; Lydia: Lead the way.");
    }

    #[test]
    fn combined_text_is_space_joined_and_trimmed() {
        let lines = vec![exchange("a", "b"), exchange("c", "d")];
        assert_eq!(
            combined_event_text(&lines),
            "Dovahkiin: a; Lydia: b Dovahkiin: c; Lydia: d"
        );
    }

    #[test]
    fn combined_text_of_nothing_is_empty() {
        assert!(combined_event_text(&[]).is_empty());
    }

    #[test]
    fn null_form_id_has_no_key() {
        assert_eq!(CharacterKey::from_form_id(0), None);
        assert_eq!(CharacterKey::from_form_id(0x14), Some(CharacterKey(0x14)));
    }

    #[test]
    fn key_parses_from_decimal() {
        let key: CharacterKey = "935223".parse().expect("parse");
        assert_eq!(key, CharacterKey(935_223));
        assert!("not-a-key".parse::<CharacterKey>().is_err());
        assert_eq!(CharacterKey(0xE4537).to_string(), "000E4537");
    }

    #[test]
    fn key_parsing_rejects_null_form_and_signs() {
        for bad in ["0", "000", "+5", "-5", " 5", ""] {
            assert!(
                matches!(bad.parse::<CharacterKey>(), Err(RelayError::Serialization(_))),
                "accepted {bad:?}"
            );
        }
        assert_eq!("0005".parse::<CharacterKey>().expect("parse"), CharacterKey(5));
    }

    #[test]
    fn non_finite_timestamps_become_zero() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(Exchange::new("P", "q", "N", "r", bad).timestamp(), 0.0);
        }
        assert_eq!(Exchange::new("P", "q", "N", "r", 7.25).timestamp(), 7.25);
    }
}
