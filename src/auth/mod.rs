// src/auth/mod.rs

pub mod credentials;

pub use credentials::CredentialStore;
