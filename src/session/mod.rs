// src/session/mod.rs

pub mod memory;
pub mod model;
pub mod traits;

pub use memory::InMemorySessionStore;
pub use model::{Session, SessionUser};
pub use traits::SessionStore;
