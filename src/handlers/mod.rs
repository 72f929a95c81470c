// src/handlers/mod.rs

pub mod auth;
pub mod data;
pub mod pages;

pub use auth::{login, logout, LoginPayload, LoginRequest};
pub use data::{get_data, save_data};
pub use pages::serve_index;

use serde::{Deserialize, Serialize};

/// Body of every successful JSON response that carries no data.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
