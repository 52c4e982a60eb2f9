//! Global configuration types for Parley.
//!
//! `ParleyConfig` represents the optional `config.toml` in the data
//! directory. Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Text reported as a chat's last message when it has no visible messages.
    #[serde(default = "default_no_messages_placeholder")]
    pub no_messages_placeholder: String,

    /// How many messages a fetch returns when the caller does not say.
    #[serde(default = "default_fetch_count")]
    pub default_fetch_count: usize,
}

fn default_no_messages_placeholder() -> String {
    "no messages".to_string()
}

fn default_fetch_count() -> usize {
    20
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            no_messages_placeholder: default_no_messages_placeholder(),
            default_fetch_count: default_fetch_count(),
        }
    }
}
