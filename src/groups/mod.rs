// src/groups/mod.rs

pub mod model;
pub mod repository;

pub use model::{Group, GroupsDocument};
pub use repository::{GroupRepository, JsonFileRepository};
