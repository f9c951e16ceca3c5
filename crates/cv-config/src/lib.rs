//! # cv-config
//!
//! Layered runtime settings: built-in defaults, then an optional
//! `civicvoice.toml` in the working directory, then `CIVICVOICE__*`
//! environment variables (a `.env` file is loaded first if present).
//!
//! Nested keys use `__` in the environment, e.g.
//! `CIVICVOICE__LOG__FILTER=debug` or `CIVICVOICE__STORE__SEED_DEMO_DATA=false`.

use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "CIVICVOICE";
const FILE_NAME: &str = "civicvoice";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub identity: IdentitySettings,
    pub store: StoreSettings,
    pub polls: PollSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentitySettings {
    pub email_domain: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreSettings {
    pub seed_demo_data: bool,
}

/// Bounds on the number of choices a new poll may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollSettings {
    pub min_options: usize,
    pub max_options: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            min_options: 2,
            max_options: 5,
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, `civicvoice.toml`, and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        let builder = Config::builder()
            .add_source(File::with_name(FILE_NAME).required(false))
            .add_source(environment());
        Self::from_builder(builder)
    }

    /// Layers `builder`'s sources over the defaults, then validates.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = with_defaults(builder)?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.email_domain.trim().is_empty() {
            return Err(ConfigError::Invalid("identity.email_domain must not be empty".into()));
        }
        let polls = self.polls;
        if polls.min_options < 2 {
            return Err(ConfigError::Invalid(format!(
                "polls.min_options must be at least 2, got {}",
                polls.min_options
            )));
        }
        if polls.min_options > polls.max_options {
            return Err(ConfigError::Invalid(format!(
                "polls.min_options ({}) exceeds polls.max_options ({})",
                polls.min_options, polls.max_options
            )));
        }
        Ok(())
    }
}

/// `CIVICVOICE__SECTION__KEY` variables, with typed values parsed.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let polls = PollSettings::default();
    builder
        .set_default("log.filter", "info")?
        .set_default("log.json", false)?
        .set_default("identity.email_domain", "example.com")?
        .set_default("store.seed_demo_data", true)?
        .set_default("polls.min_options", polls.min_options as u64)?
        .set_default("polls.max_options", polls.max_options as u64)
}
