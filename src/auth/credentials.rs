// src/auth/credentials.rs

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

/// Constant-time string comparison to prevent timing attacks
fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }
    result == 0
}

/// The single administrator account.
pub struct CredentialStore {
    username: Option<String>,
    password_hash: Option<SecretString>,
}

impl CredentialStore {
    pub fn new(username: Option<String>, password_hash: Option<SecretString>) -> Self {
        Self {
            username: username.filter(|u| !u.is_empty()),
            password_hash: password_hash.filter(|h| !h.expose_secret().is_empty()),
        }
    }

    /// Whether both halves of the account are configured.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password_hash.is_some()
    }

    /// Checks a username/password pair.
    ///
    /// Returns `false` when either configured value is missing or the stored
    /// hash cannot be parsed. The password is verified even when the username
    /// is wrong so both failures take the same path.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        let (Some(expected_user), Some(hash)) = (&self.username, &self.password_hash) else {
            warn!("Login rejected: administrator credentials are not configured");
            return false;
        };

        let parsed = match PasswordHash::new(hash.expose_secret()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Login rejected: stored password hash is malformed");
                return false;
            }
        };

        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        let user_ok = secure_compare(username, expected_user);

        debug!(user_ok, password_ok, "Credential check finished");
        user_ok && password_ok
    }
}
