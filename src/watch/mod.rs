// src/watch/mod.rs

//! Filesystem change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) over the
//!   pre-resolved watch-path set.
//! - Filtering raw events by tracked file extension.
//! - Suppressing duplicate notifications for unmodified files.
//! - Debouncing bursts of events into a single rebuild trigger.
//!
//! It does **not** know about builds or processes; it only turns filesystem
//! noise into trigger invocations.

pub mod debounce;
pub mod dedup;
pub mod watcher;

use std::path::PathBuf;
use std::time::SystemTime;

pub use debounce::{BuildTrigger, Debouncer, DEBOUNCE_WINDOW};
pub use dedup::ModTimeFilter;
pub use watcher::{spawn_change_detector, DetectorHandle};

/// A filtered filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    /// Modification time at detection; `None` when the file was unreadable.
    pub mtime: Option<SystemTime>,
}

/// Directories and extensions the change detector observes.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub paths: Vec<PathBuf>,
    pub extensions: Vec<String>,
}
