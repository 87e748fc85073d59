#![allow(dead_code)]

use std::path::PathBuf;

use gowatch::project::{Project, DEFAULT_EXTENSIONS};

/// Builder for `Project` to simplify test setup.
///
/// Defaults are geared toward supervisor tests: the "executable" is a plain
/// absolute path (e.g. `/bin/sh`) so no build step is needed.
pub struct ProjectBuilder {
    name: String,
    root: PathBuf,
    watch_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    output: PathBuf,
    run_args: Vec<String>,
    env_overlay: Vec<(String, String)>,
}

impl ProjectBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: "app".to_string(),
            watch_paths: vec![root.clone()],
            root,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from("app"),
            run_args: Vec::new(),
            env_overlay: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn watch_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch_paths.push(path.into());
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.extensions.push(ext.to_string());
        self
    }

    pub fn run_arg(mut self, arg: &str) -> Self {
        self.run_args.push(arg.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env_overlay.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Project {
        Project::new(
            self.name,
            self.root,
            self.watch_paths,
            self.extensions,
            self.output,
            self.run_args,
            self.env_overlay,
        )
    }
}
