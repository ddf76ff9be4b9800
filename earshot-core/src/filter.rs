//! Content filters deciding whether a captured exchange is worth relaying.
//!
//! Rules run in a fixed order and the first match wins:
//!
//! 1. the topic is the one processed last (the host fires its display hook
//!    several times for a single selection)
//! 2. the topic is on the player-line blacklist
//! 3. the response is on the NPC-line blacklist
//! 4. a generic greeting that the topic does not mark say-once
//! 5. a response shorter than the configured word count

use std::fmt;

use tracing::warn;

use crate::config::DialogueConfig;

/// Topic identifiers the engine uses for generic, repeatable greetings.
pub const GREETING_TOPICS: [&str; 2] = ["Hello", "CYRGenericHello"];

/// Whether `query` is one of the engine's generic greeting topics.
#[must_use]
pub fn is_greeting(query: &str) -> bool {
    GREETING_TOPICS.contains(&query)
}

/// Why an exchange was suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// Same topic as the last accepted exchange.
    Duplicate,
    /// Topic text is blacklisted.
    PlayerLineBlacklisted,
    /// Response text is blacklisted.
    NpcLineBlacklisted,
    /// Generic greeting without the say-once flag.
    NonUniqueGreeting,
    /// Response has too few words.
    ShortReply {
        /// Words in the response.
        words: usize,
        /// Configured minimum.
        min: usize,
    },
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate topic"),
            Self::PlayerLineBlacklisted => write!(f, "player line blacklisted"),
            Self::NpcLineBlacklisted => write!(f, "NPC line blacklisted"),
            Self::NonUniqueGreeting => write!(f, "non-unique greeting"),
            Self::ShortReply { words, min } => write!(f, "short reply ({words} < {min} words)"),
        }
    }
}

/// Stateful filter: the rule set plus the most recently accepted topic.
#[derive(Debug, Clone)]
pub struct DialogueFilter {
    config: DialogueConfig,
    last_query: Option<String>,
}

impl DialogueFilter {
    /// Create a filter over the given options.
    #[must_use]
    pub fn new(config: DialogueConfig) -> Self {
        Self {
            config,
            last_query: None,
        }
    }

    /// Evaluate the rules against a candidate exchange.
    ///
    /// `say_once` is the topic's say-once flag, `None` when the topic
    /// metadata is missing. Missing metadata never suppresses.
    #[must_use]
    pub fn check(&self, query: &str, response: &str, say_once: Option<bool>) -> Option<SuppressReason> {
        if self.last_query.as_deref() == Some(query) {
            return Some(SuppressReason::Duplicate);
        }

        if self.config.player_line_blacklist.iter().any(|l| l == query) {
            return Some(SuppressReason::PlayerLineBlacklisted);
        }

        if self.config.npc_line_blacklist.iter().any(|l| l == response) {
            return Some(SuppressReason::NpcLineBlacklisted);
        }

        if self.config.filter_non_unique_greetings && is_greeting(query) {
            match say_once {
                Some(false) => return Some(SuppressReason::NonUniqueGreeting),
                Some(true) => {}
                None => warn!(
                    topic = query,
                    "Topic info missing, cannot tell whether greeting is say-once"
                ),
            }
        }

        if self.config.filter_short_replies {
            let words = response.split_whitespace().count();
            let min = self.config.min_word_count();
            if words < min {
                return Some(SuppressReason::ShortReply { words, min });
            }
        }

        None
    }

    /// Boolean form of [`check`](Self::check).
    #[must_use]
    pub fn should_suppress(&self, query: &str, response: &str, say_once: Option<bool>) -> bool {
        self.check(query, response, say_once).is_some()
    }

    /// Record `query` as the most recently accepted topic.
    ///
    /// Called once per accepted exchange, after it has been dispatched.
    pub fn mark_processed(&mut self, query: &str) {
        self.last_query = Some(query.to_string());
    }

    /// The most recently accepted topic, if any.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_REPLY: &str = "I used to be an adventurer like you";

    fn filter() -> DialogueFilter {
        DialogueFilter::new(DialogueConfig::default())
    }

    #[test]
    fn accepts_ordinary_exchange() {
        assert_eq!(filter().check("What news?", LONG_REPLY, Some(false)), None);
    }

    #[test]
    fn repeated_topic_is_suppressed_only_after_marking() {
        let mut f = filter();
        assert!(!f.should_suppress("What news?", LONG_REPLY, None));
        f.mark_processed("What news?");
        assert_eq!(
            f.check("What news?", "something entirely different here", None),
            Some(SuppressReason::Duplicate)
        );
        assert!(!f.should_suppress("Anything else?", LONG_REPLY, None));
    }

    #[test]
    fn suppressed_duplicate_keeps_the_original_record() {
        let mut f = filter();
        f.mark_processed("What news?");
        let _ = f.check("What news?", LONG_REPLY, None);
        assert_eq!(f.last_query(), Some("What news?"));
    }

    #[test]
    fn blacklists_are_exact_matches() {
        let f = filter();
        assert_eq!(
            f.check("Stage1Hello", LONG_REPLY, None),
            Some(SuppressReason::PlayerLineBlacklisted)
        );
        assert_eq!(
            f.check("Hi there", "Farewell", None),
            Some(SuppressReason::NpcLineBlacklisted)
        );
        assert!(!f.should_suppress("Hi there", "Farewell, friend, and good luck", None));
    }

    #[test]
    fn greeting_rules_follow_say_once() {
        let f = filter();
        assert_eq!(
            f.check("Hello", LONG_REPLY, Some(false)),
            Some(SuppressReason::NonUniqueGreeting)
        );
        assert_eq!(f.check("Hello", LONG_REPLY, Some(true)), None);
        // Missing metadata is logged, never suppressed.
        assert_eq!(f.check("CYRGenericHello", LONG_REPLY, None), None);
    }

    #[test]
    fn greeting_rule_can_be_disabled() {
        let config = DialogueConfig {
            filter_non_unique_greetings: false,
            ..DialogueConfig::default()
        };
        let f = DialogueFilter::new(config);
        assert_eq!(f.check("Hello", LONG_REPLY, Some(false)), None);
    }

    #[test]
    fn short_reply_threshold_boundary() {
        let f = filter();
        assert_eq!(
            f.check("Q", "one two three", None),
            Some(SuppressReason::ShortReply { words: 3, min: 4 })
        );
        assert_eq!(f.check("Q", "one two three four", None), None);
        assert_eq!(
            f.check("Q", "  one\ttwo \n three  ", None),
            Some(SuppressReason::ShortReply { words: 3, min: 4 })
        );
    }

    #[test]
    fn short_reply_rule_can_be_disabled() {
        let config = DialogueConfig {
            filter_short_replies: false,
            ..DialogueConfig::default()
        };
        assert_eq!(DialogueFilter::new(config).check("Q", "Hm.", None), None);
    }
}
