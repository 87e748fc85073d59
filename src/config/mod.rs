// src/config/mod.rs

//! Project configuration (`gowatch.json`).

pub mod loader;
pub mod model;

pub use loader::{load, CONFIG_FILE};
pub use model::{Settings, WatchFiles, WatchProcess};
