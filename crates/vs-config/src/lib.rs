//! # vs-config
//!
//! Layered settings for the Vent Space binary.
//!
//! Precedence, lowest first: built-in defaults, an optional
//! `vent-space.toml` (or the file named by `VENT_CONFIG`), then `VENT__*`
//! environment variables, e.g. `VENT__SERVER__PORT=9000` or
//! `VENT__MODERATION__EXTRA_WORDS=foo,bar`. A `.env` file is loaded first.

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "VENT";
const DEFAULT_FILE: &str = "vent-space";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Only read by the sqlite backend
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationSettings {
    /// Terms blocked in addition to the built-in list
    #[serde(default)]
    pub extra_words: Vec<String>,
    /// Built-in terms to let through
    #[serde(default)]
    pub allowed_words: Vec<String>,
    pub placeholder: char,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub moderation: ModerationSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Loads `.env`, then the layered sources.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let file = std::env::var("VENT_CONFIG").unwrap_or_else(|_| DEFAULT_FILE.to_string());
        Self::from_sources(Some(&file), Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds settings from an optional file and an environment source.
    pub fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("store.backend", "memory")?
            .set_default("store.database_url", "sqlite:vent_space.db")?
            .set_default("moderation.placeholder", "*")?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        let settings: Settings = builder
            .add_source(
                env.prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("moderation.extra_words")
                    .with_list_parse_key("moderation.allowed_words")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.store.backend == StoreBackend::Sqlite && self.store.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.database_url is required for the sqlite backend".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_sources(None, env(&[])).unwrap();
        assert_eq!(settings.bind_addr(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.moderation.placeholder, '*');
        assert!(settings.moderation.extra_words.is_empty());
        assert!(!settings.log.json);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            None,
            env(&[
                ("VENT__SERVER__PORT", "9090"),
                ("VENT__STORE__BACKEND", "sqlite"),
                ("VENT__STORE__DATABASE_URL", "sqlite::memory:"),
                ("VENT__MODERATION__EXTRA_WORDS", "grumble,moan"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.store.backend, StoreBackend::Sqlite);
        assert_eq!(settings.store.database_url, "sqlite::memory:");
        assert_eq!(settings.moderation.extra_words, vec!["grumble", "moan"]);
    }

    #[test]
    fn zero_port_is_rejected() {
        let err = Settings::from_sources(None, env(&[("VENT__SERVER__PORT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_backend_fails_to_load() {
        let err = Settings::from_sources(None, env(&[("VENT__STORE__BACKEND", "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
