// src/config/loader.rs

use std::path::Path;

use tracing::{info, warn};

use crate::config::model::Settings;

/// Name of the project configuration file, looked up in the source root.
pub const CONFIG_FILE: &str = "gowatch.json";

/// Load settings from `<root>/gowatch.json`.
///
/// A missing file is normal and yields the defaults; a malformed file is
/// reported but does not abort startup.
pub fn load(root: &Path) -> Settings {
    let path = root.join(CONFIG_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => {
            info!("no {CONFIG_FILE} file; using default settings");
            return Settings::default();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "failed to parse {CONFIG_FILE}; using default settings");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load(dir.path()), Settings::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").expect("write");
        assert_eq!(load(dir.path()), Settings::default());
    }

    #[test]
    fn parses_full_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "cmdArgs": ["-port", "8080"],
                "envs": {"APP_ENV": "dev"},
                "output": "bin/server",
                "watchProcess": {"restartOnExit": true},
                "watchFiles": {"extensions": [".html"], "folders": ["static"]}
            }"#,
        )
        .expect("write");

        let settings = load(dir.path());
        assert_eq!(settings.cmd_args, vec!["-port", "8080"]);
        assert_eq!(settings.envs.get("APP_ENV").map(String::as_str), Some("dev"));
        assert_eq!(settings.output.as_deref(), Some("bin/server"));
        assert!(settings.watch_process.restart_on_exit);
        assert_eq!(settings.watch_files.extensions, vec![".html"]);
        assert_eq!(settings.watch_files.folders, vec!["static"]);
    }
}
