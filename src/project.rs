// src/project.rs

//! The supervised project: name, source root, watch-path set, output
//! executable, run arguments, environment overlay. Immutable after
//! construction.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::errors::{GowatchError, Result};

/// Extensions tracked by default, before configured extras.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".go", ".tpl"];

#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    root: PathBuf,
    watch_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    output: PathBuf,
    run_args: Vec<String>,
    env_overlay: Vec<(String, String)>,
}

impl Project {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        root: PathBuf,
        watch_paths: Vec<PathBuf>,
        extensions: Vec<String>,
        output: PathBuf,
        run_args: Vec<String>,
        env_overlay: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            root,
            watch_paths,
            extensions,
            output,
            run_args,
            env_overlay,
        }
    }

    /// Resolve a project from its source root and settings.
    ///
    /// Scans the root once for the watch-path set (every directory holding
    /// at least one tracked-extension file, skipping hidden directories and
    /// directories named with a `docs` suffix), appends configured extra
    /// folders, and picks the output path. Fails when the watch-path set
    /// comes up empty or no Go module search path resolves.
    pub fn discover(name: &str, root: PathBuf, settings: &Settings) -> Result<Self> {
        let search_paths = module_search_paths(std::env::var("GOPATH").ok().as_deref());
        if search_paths.is_empty() {
            return Err(GowatchError::Config(
                "GOPATH is not set or empty".to_string(),
            ));
        }

        let mut extensions: Vec<String> =
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        extensions.extend(settings.watch_files.extensions.iter().cloned());

        let mut watch_paths = scan_watch_paths(&root, &extensions)?;
        for folder in &settings.watch_files.folders {
            let path = root.join(folder);
            if !watch_paths.contains(&path) {
                watch_paths.push(path);
            }
        }
        if watch_paths.is_empty() {
            return Err(GowatchError::Config(format!(
                "no watchable source directories under {}",
                root.display()
            )));
        }
        debug!(count = watch_paths.len(), "resolved watch paths");

        let output = match &settings.output {
            Some(output) => PathBuf::from(output),
            None => PathBuf::from(format!("{name}{}", std::env::consts::EXE_SUFFIX)),
        };

        Ok(Self {
            name: name.to_string(),
            root,
            watch_paths,
            extensions,
            output,
            run_args: settings.cmd_args.clone(),
            env_overlay: settings
                .envs
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn watch_paths(&self) -> &[PathBuf] {
        &self.watch_paths
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Output path as configured, possibly relative to the root.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Absolute path used to launch the built executable.
    pub fn executable_path(&self) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            self.root.join(&self.output)
        }
    }

    pub fn run_args(&self) -> &[String] {
        &self.run_args
    }

    pub fn env_overlay(&self) -> &[(String, String)] {
        &self.env_overlay
    }
}

/// Every directory under `root` containing at least one tracked-extension
/// file, children before parents. Hidden directories and directories whose
/// name ends in `docs` are skipped entirely.
pub fn scan_watch_paths(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    scan_dir(root, extensions, &mut paths)?;
    Ok(paths)
}

fn scan_dir(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> Result<()> {
    let mut tracked_here = false;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = entry.path();
        if path.is_dir() {
            if name.starts_with('.') || name.ends_with("docs") {
                continue;
            }
            scan_dir(&path, extensions, out)?;
        } else if !tracked_here && extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            tracked_here = true;
        }
    }
    if tracked_here {
        out.push(dir.to_path_buf());
    }
    Ok(())
}

/// Split the `GOPATH` value into its per-platform components.
fn module_search_paths(gopath: Option<&str>) -> Vec<PathBuf> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    gopath
        .unwrap_or_default()
        .split(separator)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}
