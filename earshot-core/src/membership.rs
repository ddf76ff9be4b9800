//! Conversation membership: is a conversation running, and who is in it?
//!
//! The roster itself belongs to the host (a script-maintained list of the
//! characters currently talking). This module only reads snapshots of it.
//! If the roster cannot be located at setup, the oracle enters a permanent
//! error state and answers `false` to every question for the rest of the
//! process.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::error::Result;
use crate::types::CharacterKey;

/// Host-owned list of characters in the current conversation.
pub trait ParticipantRoster {
    /// The characters listed right now.
    fn snapshot(&self) -> BTreeSet<CharacterKey>;
}

/// A roster shared between the host (writer) and the oracle (reader).
///
/// Cloning yields another handle to the same list.
#[derive(Debug, Clone, Default)]
pub struct SharedRoster {
    inner: Arc<RwLock<BTreeSet<CharacterKey>>>,
}

impl SharedRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character. Returns `false` if already listed.
    pub fn add(&self, key: CharacterKey) -> bool {
        self.inner.write().insert(key)
    }

    /// Remove a character. Returns `false` if not listed.
    pub fn remove(&self, key: CharacterKey) -> bool {
        self.inner.write().remove(&key)
    }

    /// Empty the roster.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Number of listed characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether nobody is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl ParticipantRoster for SharedRoster {
    fn snapshot(&self) -> BTreeSet<CharacterKey> {
        self.inner.read().clone()
    }
}

/// Answers membership questions against the host roster.
pub struct MembershipOracle {
    roster: Option<Box<dyn ParticipantRoster>>,
}

impl std::fmt::Debug for MembershipOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipOracle")
            .field("has_error", &self.has_error())
            .finish_non_exhaustive()
    }
}

impl MembershipOracle {
    /// Set up the oracle from the result of locating the host roster.
    ///
    /// A failed lookup is logged once and leaves the oracle permanently
    /// degraded.
    #[must_use]
    pub fn setup(located: Result<Box<dyn ParticipantRoster>>) -> Self {
        match located {
            Ok(roster) => {
                info!("Participant roster located");
                Self {
                    roster: Some(roster),
                }
            }
            Err(e) => {
                error!(error = %e, "Participant roster setup failed, membership disabled");
                Self { roster: None }
            }
        }
    }

    /// Convenience constructor for a roster that is known to exist.
    #[must_use]
    pub fn with_roster(roster: impl ParticipantRoster + 'static) -> Self {
        Self {
            roster: Some(Box::new(roster)),
        }
    }

    /// Whether setup failed.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.roster.is_none()
    }

    /// True iff the roster lists at least one character.
    #[must_use]
    pub fn is_conversation_active(&self) -> bool {
        self.roster
            .as_ref()
            .is_some_and(|r| !r.snapshot().is_empty())
    }

    /// True iff `key` is listed in the roster. `None` is the null character.
    #[must_use]
    pub fn is_participant(&self, key: Option<CharacterKey>) -> bool {
        match (&self.roster, key) {
            (Some(roster), Some(key)) => roster.snapshot().contains(&key),
            _ => false,
        }
    }

    /// Current roster snapshot; empty in the error state.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<CharacterKey> {
        self.roster
            .as_ref()
            .map(|r| r.snapshot())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelayError;

    #[test]
    fn empty_roster_means_no_conversation() {
        let roster = SharedRoster::new();
        let oracle = MembershipOracle::with_roster(roster.clone());
        assert!(!oracle.is_conversation_active());

        roster.add(CharacterKey(7));
        assert!(oracle.is_conversation_active());
        assert!(oracle.is_participant(Some(CharacterKey(7))));
        assert!(!oracle.is_participant(Some(CharacterKey(8))));

        roster.remove(CharacterKey(7));
        assert!(!oracle.is_conversation_active());
    }

    #[test]
    fn null_character_is_never_a_participant() {
        let roster = SharedRoster::new();
        roster.add(CharacterKey(1));
        let oracle = MembershipOracle::with_roster(roster);
        assert!(!oracle.is_participant(None));
    }

    #[test]
    fn failed_setup_degrades_to_false() {
        let oracle = MembershipOracle::setup(Err(RelayError::RosterUnavailable(
            "participants list not found".into(),
        )));
        assert!(oracle.has_error());
        assert!(!oracle.is_conversation_active());
        assert!(!oracle.is_participant(Some(CharacterKey(1))));
        assert!(oracle.participants().is_empty());
    }

    #[test]
    fn shared_roster_handles_see_the_same_list() {
        let a = SharedRoster::new();
        let b = a.clone();
        assert!(a.add(CharacterKey(3)));
        assert!(!b.add(CharacterKey(3)));
        assert_eq!(b.len(), 1);
        b.clear();
        assert!(a.is_empty());
    }
}
