//! Connection configuration
//!
//! Settings are layered: an optional config file, then `OVIRT_*`
//! environment variables, then command-line overrides.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File};
use ovirt_mac_pool::ParsePolicy;
use serde::Deserialize;

use crate::error::ConfigError;

/// Prefix of the environment variables read into the configuration
pub const ENV_PREFIX: &str = "OVIRT";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings as read from file and environment, before validation
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    ca_file: Option<PathBuf>,
    insecure: Option<bool>,
    timeout_secs: Option<u64>,
    mac_parsing: Option<ParsePolicy>,
}

/// Values given on the command line; they win over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ca_file: Option<PathBuf>,
    pub insecure: Option<bool>,
    pub mac_parsing: Option<ParsePolicy>,
}

/// Everything needed to open a session against the engine
#[derive(Clone)]
pub struct ConnectionConfig {
    /// API entry point, e.g. `https://engine.example.com/ovirt-engine/api`
    pub url: String,
    pub username: String,
    pub password: Option<String>,
    /// PEM bundle of the engine CA
    pub ca_file: Option<PathBuf>,
    pub insecure: Option<bool>,
    pub timeout_secs: u64,
    pub mac_parsing: ParsePolicy,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: None,
            ca_file: None,
            insecure: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mac_parsing: ParsePolicy::default(),
        }
    }

    /// Load configuration from `file` (if any), the process environment and
    /// `overrides`
    pub fn load(file: Option<&Path>, overrides: ConnectionOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(file, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    /// Same as [`ConnectionConfig::load`] with an explicit environment source
    pub fn load_with_env(
        file: Option<&Path>,
        env: Environment,
        overrides: ConnectionOverrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            log::debug!("Loading connection settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(env)
            .set_override_option("url", overrides.url)?
            .set_override_option("username", overrides.username)?
            .set_override_option("password", overrides.password)?
            .set_override_option(
                "ca_file",
                overrides
                    .ca_file
                    .map(|path| path.to_string_lossy().into_owned()),
            )?
            .set_override_option("insecure", overrides.insecure)?
            .set_override_option(
                "mac_parsing",
                overrides.mac_parsing.map(|policy| policy.to_string()),
            )?
            .build()?;

        let raw: RawSettings = settings.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let url = raw
            .url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingField("url"))?;
        let username = raw
            .username
            .filter(|username| !username.is_empty())
            .ok_or(ConfigError::MissingField("username"))?;

        Ok(Self {
            url,
            username,
            password: raw.password.filter(|password| !password.is_empty()),
            ca_file: raw.ca_file,
            insecure: raw.insecure,
            timeout_secs: raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            mac_parsing: raw.mac_parsing.unwrap_or_default(),
        })
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    /// Certificate checks are skipped unless a CA file is configured or
    /// `insecure` is set explicitly
    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or(self.ca_file.is_none())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("ca_file", &self.ca_file)
            .field("insecure", &self.insecure)
            .field("timeout_secs", &self.timeout_secs)
            .field("mac_parsing", &self.mac_parsing)
            .finish()
    }
}
