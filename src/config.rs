//! Agent configuration
//!
//! Static for the process lifetime: loaded once at boot, validated, then
//! handed out by reference.  Values come either from the build environment
//! (`POWERSWITCH_*` variables baked in with `option_env!`) or from a JSON
//! document for host-side runs and tests.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::power::PressKind;
use crate::error::ConfigError;

/// Discord REST base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Reaction used to acknowledge a received command.
pub const DEFAULT_ACK_EMOJI: &str = "\u{1F440}";

/// Who may issue commands, where, and with which bot credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Discord user id of the only operator allowed to issue commands.
    pub admin_id: String,
    /// Discord channel id that is polled for commands.
    pub channel_id: String,
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub bot_credential: String,
}

impl fmt::Debug for AuthorizationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationContext")
            .field("admin_id", &self.admin_id)
            .field("channel_id", &self.channel_id)
            .field("bot_credential", &"<redacted>")
            .finish()
    }
}

/// WiFi station credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Loop cadences, the restart wait bound, and relay hold times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How often the channel is polled for a new message (milliseconds).
    pub poll_interval_ms: u32,
    /// How often the wall clock is re-synced over SNTP (milliseconds).
    pub clock_sync_interval_ms: u32,
    /// Maximum number of ticks a restart waits for the host to power off.
    pub restart_wait_ticks: u32,
    /// Length of one restart wait tick (milliseconds).
    pub restart_tick_ms: u32,
    /// Relay hold for a normal power-button tap (milliseconds).
    pub momentary_press_ms: u32,
    /// Relay hold for a forced shutdown (milliseconds).
    pub hard_press_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            clock_sync_interval_ms: 86_400_000, // 1 day
            restart_wait_ticks: 30,
            restart_tick_ms: 1_000,
            momentary_press_ms: 1_000,
            hard_press_ms: 5_000,
        }
    }
}

impl TimingConfig {
    /// Relay hold time for a press of the given kind.
    pub fn press_ms(&self, kind: PressKind) -> u32 {
        match kind {
            PressKind::Momentary => self.momentary_press_ms,
            PressKind::Hard => self.hard_press_ms,
        }
    }
}

/// Complete agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub auth: AuthorizationContext,
    pub wifi: WifiCredentials,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Emoji reacted onto every acknowledged command (raw, not URL-encoded).
    #[serde(default = "default_ack_emoji")]
    pub ack_emoji: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_ack_emoji() -> String {
    DEFAULT_ACK_EMOJI.into()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}

impl AgentConfig {
    /// Configuration baked in at build time from `POWERSWITCH_*` variables.
    ///
    /// Unset variables become empty strings; [`validate`](Self::validate)
    /// reports them.
    pub fn from_build_env() -> Self {
        Self {
            auth: AuthorizationContext {
                admin_id: option_env!("POWERSWITCH_ADMIN_ID").unwrap_or_default().into(),
                channel_id: option_env!("POWERSWITCH_CHANNEL_ID").unwrap_or_default().into(),
                bot_credential: option_env!("POWERSWITCH_BOT_TOKEN").unwrap_or_default().into(),
            },
            wifi: WifiCredentials {
                ssid: option_env!("POWERSWITCH_WIFI_SSID").unwrap_or_default().into(),
                password: option_env!("POWERSWITCH_WIFI_PASSWORD").unwrap_or_default().into(),
            },
            timing: TimingConfig::default(),
            ack_emoji: default_ack_emoji(),
            api_base: default_api_base(),
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(doc).map_err(|e| ConfigError::Parse(e.into()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the agent cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_snowflake(&self.auth.admin_id, "admin_id")?;
        validate_snowflake(&self.auth.channel_id, "channel_id")?;
        if self.auth.bot_credential.is_empty() {
            return Err(ConfigError::Missing("bot_credential"));
        }
        if self.wifi.ssid.is_empty() {
            return Err(ConfigError::Missing("wifi.ssid"));
        }
        if self.ack_emoji.is_empty() {
            return Err(ConfigError::Missing("ack_emoji"));
        }

        let t = &self.timing;
        if t.poll_interval_ms == 0 || t.clock_sync_interval_ms == 0 {
            return Err(ConfigError::Invalid("loop intervals must be non-zero"));
        }
        if t.restart_wait_ticks == 0 || t.restart_tick_ms == 0 {
            return Err(ConfigError::Invalid("restart wait must be non-zero"));
        }
        if t.momentary_press_ms == 0 {
            return Err(ConfigError::Invalid("momentary press must be non-zero"));
        }
        if t.hard_press_ms <= t.momentary_press_ms {
            return Err(ConfigError::Invalid(
                "hard press must be longer than momentary press",
            ));
        }
        Ok(())
    }
}

/// Discord ids are decimal snowflakes.
fn validate_snowflake(id: &str, field: &'static str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::Missing(field));
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::Invalid("ids must be decimal snowflakes"));
    }
    Ok(())
}
