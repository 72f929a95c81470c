// src/config/mod.rs

pub mod settings;
pub mod validation;

pub use settings::{Settings, SettingsOverrides};
pub use validation::SettingsValidator;
