use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::entities::recipient::Recipient;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub liveness: LivenessConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

/// Broker endpoint and topic namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    #[serde(default = "default_mqtt_host")]
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

/// Offline detection: staleness threshold and sweep cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessConfig {
    #[serde(default = "default_offline_after")]
    pub offline_after_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

/// Alert suppression window per (device, recipient address).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

/// Database storage path (tilde-expanded at point of use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Telegram bot credentials; the chat channel is disabled when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Twilio WhatsApp credentials; the sms channel is disabled unless all
/// three fields are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub from_number: Option<String>,
}

/// SMTP relay settings; the email channel is disabled when `host` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

// --- Defaults ---

fn default_mqtt_host() -> String {
    "localhost".into()
}

const fn default_mqtt_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "vilert-ingest".into()
}

fn default_namespace() -> String {
    "vilert".into()
}

const fn default_offline_after() -> u64 {
    120
}

const fn default_sweep_interval() -> u64 {
    30
}

const fn default_cooldown() -> u64 {
    120
}

// NOTE: Stored as raw string with tilde — expand with shellexpand at point of use.
fn default_database_path() -> String {
    "~/.local/share/vilert/vilert.db".into()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "alerts@vilert.local".into()
}

// --- Default impls ---

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            client_id: default_client_id(),
            namespace: default_namespace(),
        }
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            offline_after_secs: default_offline_after(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            username: None,
            password: None,
            from_address: default_from_address(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load and validate from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// invalid, or validation rejects the configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Reject configurations that could silently drop alerts.
    ///
    /// # Errors
    ///
    /// Returns an error if any recipient has no populated channel address,
    /// or if a duration field is zero.
    pub fn validate(&self) -> Result<()> {
        for (idx, recipient) in self.recipients.iter().enumerate() {
            if !recipient.has_any_address() {
                bail!(
                    "recipient #{} ('{}') has no phone, email, or chat_id",
                    idx + 1,
                    recipient.name.as_deref().unwrap_or("unnamed")
                );
            }
        }
        if self.liveness.offline_after_secs == 0 {
            bail!("liveness.offline_after_secs must be greater than zero");
        }
        if self.liveness.sweep_interval_secs == 0 {
            bail!("liveness.sweep_interval_secs must be greater than zero");
        }
        Ok(())
    }

    /// True when all three Twilio credentials are present.
    #[must_use]
    pub fn twilio_configured(&self) -> bool {
        self.twilio.account_sid.is_some()
            && self.twilio.auth_token.is_some()
            && self.twilio.from_number.is_some()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("vilert").join("config.toml"))
    }
}
