//! Configuration management for Auth Service
//!
//! Loading order (later wins):
//! 1. Built-in defaults
//! 2. Configuration file (`config.toml` next to the binary, or `--config`)
//! 3. Environment variables prefixed with `AUTH_` (`AUTH_PORT=50052`)
//!
//! Nested keys use `__`, so `AUTH_USERS__ALICE=wonderland` seeds the user
//! `alice`. Environment keys are lowercased by the loader. Values are kept
//! as strings and only converted when a typed field asks for it, so
//! passwords like `007` survive intact.

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use token_authority::assess_secret;
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 50051;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
pub const ENV_PREFIX: &str = "AUTH";
const DEFAULT_CONFIG_FILE: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// HMAC signing secret shared by every token this instance issues
    pub secret_key: SecretString,
    pub log_level: String,
    pub log_format: LogFormat,
    pub token_ttl_secs: u64,
    pub environment: Environment,
    /// Keep seeded secrets as Argon2 hashes instead of plaintext
    pub password_hashing: bool,
    /// Users registered at startup (username -> password).
    ///
    /// Names from `AUTH_USERS__<NAME>` arrive lowercased; mixed-case
    /// usernames have to come from the config file.
    #[serde(default)]
    pub users: HashMap<String, SecretString>,
}

impl Settings {
    /// Load settings from defaults, the config file and `AUTH_*` variables.
    ///
    /// An explicit `config_path` must exist; the default `config.toml` is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        // Load .env file in development
        dotenvy::dotenv().ok();

        let file = match config_path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Self::from_sources(file, environment_source())
    }

    fn from_sources<S>(file: S, env: config::Environment) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?
            .set_default("token_ttl_secs", DEFAULT_TOKEN_TTL_SECS)?
            .set_default("environment", "development")?
            .set_default("password_hashing", false)?
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Check values the type system cannot.
    ///
    /// A weak signing secret is fatal in production and a warning elsewhere.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("Port must be greater than 0"));
        }

        if self.token_ttl_secs == 0 {
            return Err(anyhow!("Token TTL must be greater than 0"));
        }

        let secret = self.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(anyhow!("secret_key is required"));
        }

        let assessment = assess_secret(secret.as_bytes());
        if assessment.is_weak() {
            if self.environment.is_production() {
                return Err(anyhow!(
                    "secret_key is too weak for production: {} (try `auth-cli generate-secret`)",
                    assessment.reasons()
                ));
            }
            warn!(
                event = "weak_signing_secret",
                environment = ?self.environment,
                reasons = %assessment.reasons(),
                "secret_key is weak; acceptable for development only"
            );
        }

        if self.users.keys().any(|name| name.is_empty()) {
            return Err(anyhow!("Configured usernames must not be empty"));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
