//! # Application configuration — `secrets.toml`
//!
//! Defines the TOML file that tunes how secrets are presented. Validation
//! bounds are fixed in `api::validation`.
//!
//! ## Structure
//!
//! ```toml
//! [display]
//! hidden_author = "**hidden**"   # shown to visitors instead of the author name
//!
//! [listing]
//! recent_limit = 5               # size of the "last five" listing
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`SecretsConfig`] | Top-level config. Builder helpers, TOML (de)serialisation and the canonical filename. |
//! | [`DisplayConfig`] | Display section: the masked author placeholder. |
//! | [`ListingConfig`] | Listing section: how many secrets the recent listing returns. |
//!
//! Every section has a `Default`, so a missing or empty file is the default
//! configuration.

use serde::{Deserialize, Serialize};

/// Placeholder rendered instead of an author name for visitors.
pub const HIDDEN_AUTHOR: &str = "**hidden**";

/// Top-level configuration stored in `secrets.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Display configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_hidden_author")]
    pub hidden_author: String,
}

/// Listing configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_hidden_author() -> String {
    HIDDEN_AUTHOR.to_string()
}

fn default_recent_limit() -> usize {
    5
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hidden_author: default_hidden_author(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl SecretsConfig {
    /// Builder method to set the masked author placeholder.
    pub fn with_hidden_author(mut self, placeholder: impl Into<String>) -> Self {
        self.display.hidden_author = placeholder.into();
        self
    }

    /// Builder method to set the recent listing size.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.listing.recent_limit = limit;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "secrets.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
