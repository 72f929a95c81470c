// src/session/traits.rs

use crate::error::Result;
use crate::session::{Session, SessionUser};
use async_trait::async_trait;

/// Storage for login sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a new session for `user` and returns it, id included.
    async fn create(&self, user: SessionUser) -> Result<Session>;

    /// Resolves a session id. Unknown and expired ids both yield `None`.
    async fn get(&self, id: &str) -> Result<Option<SessionUser>>;

    /// Ends a session. Destroying an unknown id is not an error.
    async fn destroy(&self, id: &str) -> Result<()>;

    /// Number of sessions currently held, expired ones included until evicted.
    async fn len(&self) -> Result<usize>;
}
