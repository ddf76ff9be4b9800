//! Configuration for the Earshot dialogue relay.
//!
//! Maps directly to `earshot.toml`. Every field has a default, so an empty
//! file is a valid configuration. The `[dialogue]` keys also accept the
//! option names used by the legacy `MantellaDialogue.ini`.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarshotConfig {
    /// Capture switches and content filters.
    #[serde(default)]
    pub dialogue: DialogueConfig,
    /// Conversation service endpoint.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Log level and on-screen notifications.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EarshotConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RelayError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::RelayError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Capture and filter options. Read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Master switch for the whole capture path.
    #[serde(default = "default_true", alias = "EnableVanillaDialogueTracking")]
    pub enable_vanilla_dialogue_tracking: bool,
    /// Suppress responses with fewer than `filter_short_replies_min_word_count` words.
    #[serde(default = "default_true", alias = "FilterShortReplies")]
    pub filter_short_replies: bool,
    /// Word-count threshold for the short-reply filter.
    #[serde(default = "default_4", alias = "FilterShortRepliesMinWordCount")]
    pub filter_short_replies_min_word_count: u32,
    /// Suppress generic greetings that are not marked say-once.
    #[serde(default = "default_true", alias = "FilterNonUniqueGreetings")]
    pub filter_non_unique_greetings: bool,
    /// Exact response texts to suppress.
    #[serde(default = "default_npc_blacklist", alias = "NPCLineBlacklist")]
    pub npc_line_blacklist: Vec<String>,
    /// Exact player topic texts to suppress.
    #[serde(default = "default_player_blacklist", alias = "PlayerLineBlacklist")]
    pub player_line_blacklist: Vec<String>,
    /// Character display names excluded from capture entirely.
    #[serde(default, alias = "NPCNamesToIgnore")]
    pub npc_names_to_ignore: Vec<String>,
}

impl DialogueConfig {
    /// Effective short-reply threshold; never below one word.
    #[must_use]
    pub fn min_word_count(&self) -> usize {
        self.filter_short_replies_min_word_count.max(1) as usize
    }

    /// Whether lines spoken by `name` are excluded from capture.
    #[must_use]
    pub fn is_ignored_name(&self, name: &str) -> bool {
        self.npc_names_to_ignore.iter().any(|n| n == name)
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            enable_vanilla_dialogue_tracking: true,
            filter_short_replies: true,
            filter_short_replies_min_word_count: 4,
            filter_non_unique_greetings: true,
            npc_line_blacklist: default_npc_blacklist(),
            player_line_blacklist: default_player_blacklist(),
            npc_names_to_ignore: Vec::new(),
        }
    }
}

/// Where the conversation service listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Scheme and host, without port.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Route that accepts text events.
    #[serde(default = "default_route")]
    pub route: String,
    /// Name of the integer setting holding the service port.
    #[serde(default = "default_port_setting")]
    pub port_setting: String,
    /// Port used when the setting cannot be read.
    #[serde(default = "default_port")]
    pub default_port: u16,
    /// Hard timeout for a single delivery in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            route: default_route(),
            port_setting: default_port_setting(),
            default_port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Logging and on-screen notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Show short in-game notifications for backlog hits and filtered lines.
    #[serde(default, alias = "DebugLogVanillaDialogue")]
    pub debug_notifications: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug_notifications: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_4() -> u32 { 4 }
fn default_npc_blacklist() -> Vec<String> {
    ["Can I help you?", "Farewell", "See you later"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_player_blacklist() -> Vec<String> {
    [
        "Stage1Hello",
        "I want you to..",
        "Goodbye. (Remove from Mantella conversation)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_base_url() -> String { "http://localhost".to_string() }
fn default_route() -> String { "add_message".to_string() }
fn default_port_setting() -> String { "HttpPort".to_string() }
fn default_port() -> u16 { 4999 }
fn default_timeout_ms() -> u64 { 3000 }
fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EarshotConfig::from_toml("").expect("parse");
        assert!(config.dialogue.enable_vanilla_dialogue_tracking);
        assert_eq!(config.dialogue.min_word_count(), 4);
        assert_eq!(config.dialogue.npc_line_blacklist.len(), 3);
        assert_eq!(config.service.default_port, 4999);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn legacy_option_names_are_accepted() {
        let config = EarshotConfig::from_toml(
            r#"
            [dialogue]
            FilterShortReplies = false
            FilterShortRepliesMinWordCount = 6
            NPCNamesToIgnore = ["Nazeem"]
            "#,
        )
        .expect("parse");
        assert!(!config.dialogue.filter_short_replies);
        assert_eq!(config.dialogue.min_word_count(), 6);
        assert!(config.dialogue.is_ignored_name("Nazeem"));
        assert!(!config.dialogue.is_ignored_name("Lydia"));
    }

    #[test]
    fn zero_word_threshold_is_raised_to_one() {
        let config = EarshotConfig::from_toml(
            "[dialogue]\nfilter_short_replies_min_word_count = 0\n",
        )
        .expect("parse");
        assert_eq!(config.dialogue.min_word_count(), 1);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EarshotConfig::from_toml("[dialogue\n").expect_err("should fail");
        assert!(matches!(err, crate::RelayError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[service]\ndefault_port = 5100\n[logging]\nlevel = \"debug\"").expect("write");
        let config = EarshotConfig::from_file(file.path()).expect("load");
        assert_eq!(config.service.default_port, 5100);
        assert_eq!(config.logging.level, "debug");
    }
}
