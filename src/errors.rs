// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GowatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dependency resolution failed: {0}")]
    DependencyResolve(String),

    #[error("Dependency install failed: {0}")]
    DependencyInstall(String),

    #[error("Compiler exited with status {0}")]
    Compile(i32),

    #[error("No process is running")]
    ProcessNotRunning,

    #[error("Process already stopped")]
    ProcessAlreadyStopped,

    #[error("Failed to set up file watcher: {0}")]
    WatcherSetup(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GowatchError>;
