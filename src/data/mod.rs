//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations (settings cache, dispatch history)
//! - Domain models shared across the engine

mod database;
mod models;

pub use database::{
    Database, SETTING_DEVICE_TYPES, SETTING_GROUPS, SETTING_TEMPLATES,
};
pub use models::*;
