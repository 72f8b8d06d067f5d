//! Application configuration loaded from an optional config file and
//! environment variables.

use anyhow::{ensure, Context, Result};
use responses_store::{MatchMode, StoreTarget};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Signal configuration
    pub signal: SignalConfig,

    /// Response storage configuration
    pub storage: StorageConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Signal CLI REST API endpoint
    #[serde(default = "default_signal_service")]
    pub service_url: String,

    /// Bot account number
    pub phone_number: String,

    /// Poll interval for messages
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory path for the local store, or a MongoDB connection string
    pub target: SecretString,

    /// MongoDB database name override
    #[serde(default)]
    pub database: Option<String>,
}

impl StorageConfig {
    pub fn store_target(&self) -> StoreTarget {
        StoreTarget::parse(self.target.expose_secret())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Trigger matching mode for every guild
    #[serde(default, deserialize_with = "deserialize_match_mode")]
    pub match_mode: MatchMode,

    /// Numbers allowed to manage responses. Empty means everyone.
    #[serde(default, deserialize_with = "deserialize_admins")]
    pub admins: Vec<String>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            match_mode: MatchMode::default(),
            admins: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_signal_service() -> String {
    "http://signal-api:8080".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(200)
}

fn default_prefix() -> String {
    "!".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn deserialize_match_mode<'de, D>(deserializer: D) -> Result<MatchMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Accepts a list or a comma-separated string.
fn deserialize_admins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Admins {
        List(Vec<String>),
        Csv(String),
    }

    let admins = match Admins::deserialize(deserializer)? {
        Admins::List(list) => list,
        Admins::Csv(csv) => csv.split(',').map(String::from).collect(),
    };

    Ok(admins
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect())
}

impl Config {
    /// Load configuration from `config.{toml,json,yaml}` (optional) and
    /// environment variables such as `STORAGE__TARGET`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_sources(Self::environment())
    }

    fn environment() -> config::Environment {
        // try_parsing(false): numbers like +16504928286 must stay strings.
        config::Environment::default()
            .separator("__")
            .try_parsing(false)
    }

    fn from_sources(environment: config::Environment) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.bot.prefix.trim().is_empty(), "bot.prefix must not be empty");
        ensure!(
            !self.signal.phone_number.trim().is_empty(),
            "signal.phone_number must not be empty"
        );
        ensure!(
            !self.storage.target.expose_secret().trim().is_empty(),
            "storage.target must be a directory path or a MongoDB connection string"
        );
        Ok(())
    }
}
