// src/state.rs

use crate::auth::CredentialStore;
use crate::config::Settings;
use crate::error::Result;
use crate::groups::{GroupRepository, JsonFileRepository};
use crate::session::{InMemorySessionStore, SessionStore};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::Key;
use tracing::{info, warn};

/// How the session cookie is issued.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age: Duration,
}

/// Shared application state, built once at startup and handed to every handler.
pub struct AppState {
    pub credentials: CredentialStore,
    pub sessions: Arc<dyn SessionStore>,
    pub repository: Arc<dyn GroupRepository>,
    pub cookie_key: Key,
    pub cookie_policy: CookiePolicy,
    pub public_dir: PathBuf,
}

/// Derives the 64-byte cookie key from an arbitrary-length secret.
pub fn derive_cookie_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

impl AppState {
    /// Builds the state from validated settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        info!("Creating shared AppState");

        let credentials = CredentialStore::new(
            settings.admin_user.clone(),
            settings
                .admin_password_hash
                .as_ref()
                .map(|h| SecretString::new(h.expose_secret().clone())),
        );
        if !credentials.is_configured() {
            warn!("Administrator credentials are incomplete; logins will fail");
        }

        let cookie_key = match &settings.session_secret {
            Some(secret) if !secret.expose_secret().is_empty() => derive_cookie_key(secret),
            _ => Key::generate(),
        };

        let ttl = Duration::from_secs(settings.session_ttl_secs);
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(ttl));
        let repository: Arc<dyn GroupRepository> =
            Arc::new(JsonFileRepository::new(settings.groups_path()));

        Ok(Self {
            credentials,
            sessions,
            repository,
            cookie_key,
            cookie_policy: CookiePolicy {
                secure: settings.secure_cookies,
                max_age: ttl,
            },
            public_dir: settings.public_dir.clone(),
        })
    }
}
