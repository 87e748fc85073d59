// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Settings parsed from the optional `gowatch.json` project file.
///
/// Every field has a defined default, so an absent or partial file is fine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Extra arguments passed to the application on every run.
    pub cmd_args: Vec<String>,
    /// Environment overlay applied on top of the host environment.
    pub envs: BTreeMap<String, String>,
    /// Explicit output path for the built executable.
    pub output: Option<String>,
    pub watch_process: WatchProcess,
    pub watch_files: WatchFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchProcess {
    /// Restart the application when it exits with a non-zero status.
    pub restart_on_exit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchFiles {
    /// Additional file extensions to watch besides the defaults.
    pub extensions: Vec<String>,
    /// Additional folders to watch besides the discovered source dirs.
    pub folders: Vec<String>,
}
