// src/config/validation.rs

use crate::config::Settings;
use crate::error::{AppError, Result};
use tracing::{debug, warn};

pub struct SettingsValidator;

impl SettingsValidator {
    /// Rejects settings the process cannot start with and warns about the
    /// ones it can start with but will not be usable.
    pub fn validate(settings: &Settings) -> Result<()> {
        debug!("Starting settings validation");

        match &settings.config_file_path {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => {
                return Err(AppError::Configuration(
                    "CONFIG_FILE_PATH is not set; point it at the groups JSON file".to_string(),
                ))
            }
        }

        if settings.session_ttl_secs == 0 {
            return Err(AppError::Configuration(
                "SESSION_TTL_SECS must be greater than 0".to_string(),
            ));
        }

        if settings.admin_user.as_deref().map_or(true, str::is_empty) {
            warn!("ADMIN_USER is not set; every login attempt will be rejected");
        }
        if settings.admin_password_hash.is_none() {
            warn!("ADMIN_PASSWORD_HASH is not set; every login attempt will be rejected");
        }
        if settings.session_secret.is_none() {
            warn!("SESSION_SECRET is not set; using a random per-process signing key");
        }
        if !settings.secure_cookies {
            debug!("Session cookie is not marked Secure; terminate TLS in front of this service in production");
        }

        debug!("Settings validation completed successfully");
        Ok(())
    }
}
