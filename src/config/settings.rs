// src/config/settings.rs

use crate::config::SettingsValidator;
use crate::error::Result;
use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Process-wide settings, read once at startup.
///
/// Sources are layered: built-in defaults, then environment variables
/// (`CONFIG_FILE_PATH`, `ADMIN_USER`, ...), then command-line overrides.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Location of the groups document. Required.
    #[serde(default)]
    pub config_file_path: Option<PathBuf>,
    #[serde(default)]
    pub admin_user: Option<String>,
    /// PHC-format Argon2 hash of the administrator password.
    #[serde(default)]
    pub admin_password_hash: Option<SecretString>,
    /// Secret the session cookie is signed with.
    #[serde(default)]
    pub session_secret: Option<SecretString>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file_path: None,
            admin_user: None,
            admin_password_hash: None,
            session_secret: None,
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            session_ttl_secs: default_session_ttl(),
            secure_cookies: false,
        }
    }
}

/// Values given on the command line; they win over the environment.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub config_file_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_session_ttl() -> u64 {
    3600
}

fn path_value(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.display().to_string())
}

impl Settings {
    /// Loads and validates settings from the environment and the given overrides.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self> {
        let raw = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .set_override_option("config_file_path", path_value(overrides.config_file_path.as_ref()))?
            .set_override_option("host", overrides.host.clone())?
            .set_override_option("port", overrides.port.map(i64::from))?
            .set_override_option("public_dir", path_value(overrides.public_dir.as_ref()))?
            .build()?;

        let settings: Settings = raw.try_deserialize()?;
        SettingsValidator::validate(&settings)?;

        info!(
            settings.config_file = ?settings.config_file_path,
            settings.host = %settings.host,
            settings.port = settings.port,
            settings.public_dir = %settings.public_dir.display(),
            settings.session_ttl_secs = settings.session_ttl_secs,
            "Settings loaded"
        );
        debug!(secure_cookies = settings.secure_cookies, "Cookie policy");
        Ok(settings)
    }

    /// The groups document path. Only valid after validation.
    pub fn groups_path(&self) -> PathBuf {
        self.config_file_path.clone().unwrap_or_default()
    }
}
