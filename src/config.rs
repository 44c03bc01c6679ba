//! Bot configuration loaded once at start-up.
//!
//! The configuration is a JSON document. Its path comes from the
//! `CLUBHOUSE_CONFIG` environment variable, or `config.json` in the working
//! directory. After loading it is shared read-only as `Arc<BotConfig>`.

use crate::capability::domain::{ChannelId, GuildId, PanelTarget, RoleId};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CLUBHOUSE_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// The document is not valid configuration JSON.
    #[error("configuration is not valid: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting is out of range.
    #[error("configuration setting '{setting}' is invalid: {reason}")]
    Invalid {
        /// Dotted setting path.
        setting: &'static str,
        /// Why the value was refused.
        reason: &'static str,
    },
}

/// Role identifiers used by capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSettings {
    /// Role granted to verified members.
    pub member: RoleId,
    /// Role allowed to use moderation commands.
    pub moderator: RoleId,
}

/// Channels capabilities post into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Channel greeting new members.
    pub welcome: ChannelId,
    /// Channel receiving support requests and reports.
    pub support: ChannelId,
}

/// Messages the persistent panels live on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Verification panel.
    pub verify: PanelTarget,
    /// Support panel.
    pub support: PanelTarget,
}

/// Background job intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Seconds between roster refreshes.
    pub roster_refresh_secs: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            roster_refresh_secs: 900,
        }
    }
}

/// Interaction response settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Milliseconds the host allows before an interaction must be
    /// acknowledged.
    pub ack_deadline_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            ack_deadline_ms: 3_000,
        }
    }
}

/// Greeting sent when a member joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelcomeSettings {
    /// Template rendered with `member` (mention) and `name` (display name).
    pub template: String,
}

impl Default for WelcomeSettings {
    fn default() -> Self {
        Self {
            template: "Welcome to the server, {{ member }}!".to_owned(),
        }
    }
}

/// Roster cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipSettings {
    /// Seconds a fetched roster stays fresh.
    pub cache_ttl_secs: u64,
}

impl Default for MembershipSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 600,
        }
    }
}

/// Read-only configuration shared by every capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Server the bot serves.
    pub server_id: GuildId,
    /// Seed appended to panel custom identifiers. Defaults to the server id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id_seed: Option<String>,
    /// Role identifiers.
    pub roles: RoleSettings,
    /// Channel identifiers.
    pub channels: ChannelSettings,
    /// Persistent panel locations.
    pub panels: PanelSettings,
    /// Job intervals.
    #[serde(default)]
    pub jobs: JobSettings,
    /// Interaction response settings.
    #[serde(default)]
    pub interaction: InteractionSettings,
    /// Member greeting.
    #[serde(default)]
    pub welcome: WelcomeSettings,
    /// Roster cache.
    #[serde(default)]
    pub membership: MembershipSettings,
}

impl BotConfig {
    /// Parses and checks a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or missing sections
    /// and [`ConfigError::Invalid`] for out-of-range settings.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.check()?;
        Ok(config)
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let document = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        debug!(path = %file.display(), "configuration file read");
        Self::from_json_str(&document)
    }

    /// Loads configuration from the file named by [`CONFIG_PATH_ENV`], or
    /// [`DEFAULT_CONFIG_PATH`].
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::load`].
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::load(config_path_from(std::env::var_os(CONFIG_PATH_ENV)))
    }

    /// Returns the seed used to derive panel custom identifiers.
    #[must_use]
    pub fn custom_id_seed(&self) -> String {
        self.custom_id_seed
            .as_deref()
            .map(str::trim)
            .filter(|seed| !seed.is_empty())
            .map_or_else(|| self.server_id.to_string(), str::to_owned)
    }

    /// Returns the interaction acknowledgement deadline.
    #[must_use]
    pub const fn ack_deadline(&self) -> Duration {
        Duration::from_millis(self.interaction.ack_deadline_ms)
    }

    /// Returns the roster refresh interval.
    #[must_use]
    pub const fn roster_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.jobs.roster_refresh_secs)
    }

    /// Returns how long a fetched roster stays fresh.
    #[must_use]
    pub const fn roster_ttl(&self) -> Duration {
        Duration::from_secs(self.membership.cache_ttl_secs)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.interaction.ack_deadline_ms == 0 {
            return Err(ConfigError::Invalid {
                setting: "interaction.ack_deadline_ms",
                reason: "must be greater than zero",
            });
        }
        if self.jobs.roster_refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                setting: "jobs.roster_refresh_secs",
                reason: "must be greater than zero",
            });
        }
        if self.welcome.template.trim().is_empty() {
            return Err(ConfigError::Invalid {
                setting: "welcome.template",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

fn config_path_from(value: Option<OsString>) -> PathBuf {
    value
        .filter(|path| !path.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}
