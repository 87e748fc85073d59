// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod project;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::engine::Engine;
use crate::project::Project;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading (`gowatch.json`, defaults when absent)
/// - project discovery (watch paths, output path, GOPATH)
/// - the supervision engine (watch → debounce → rebuild → restart)
///
/// and blocks until the supervision session ends.
pub async fn run(args: CliArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let name = match args.appname {
        Some(name) => name,
        None => default_app_name(&root),
    };
    info!(app = %name, "using application name");

    let settings = config::load(&root);
    let project = Arc::new(Project::discover(&name, root, &settings)?);

    let engine = Engine::start(project, settings.watch_process.restart_on_exit).await?;
    engine.wait().await;
    info!("supervision session ended");
    Ok(())
}

/// The current directory's base name, when no app name was given.
fn default_app_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}
