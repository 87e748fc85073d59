// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::errors::Result;
use crate::watch::WatchConfig;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops change detection.
pub struct DetectorHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for DetectorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorHandle").finish()
    }
}

/// Register every directory of the watch-path set with the OS notification
/// facility and forward tracked-extension paths into `out_tx`.
///
/// The watch-path set is already fully expanded, so registration is
/// non-recursive. Failure to create the watcher or to register any directory
/// is fatal; transient notification-layer errors are logged and watching
/// continues.
pub fn spawn_change_detector(
    config: &WatchConfig,
    out_tx: mpsc::UnboundedSender<PathBuf>,
) -> Result<DetectorHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    for path in &config.paths {
        trace!(path = %path.display(), "watching directory");
        watcher.watch(path, RecursiveMode::NonRecursive)?;
    }
    info!(count = config.paths.len(), "watching directories");

    let extensions = config.extensions.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            for path in event.paths {
                if is_tmp_file(&path) {
                    trace!(path = %path.display(), "skipping editor temp file");
                    continue;
                }
                if !matches_extension(&path, &extensions) {
                    trace!(path = %path.display(), "skipping event, no tracked extension");
                    continue;
                }
                if out_tx.send(path).is_err() {
                    // Consumer gone; nothing left to notify.
                    return;
                }
            }
        }
        debug!("change detector loop finished");
    });

    Ok(DetectorHandle { _inner: watcher })
}

/// Case-sensitive suffix match against the tracked extensions.
fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.to_str() else {
        return false;
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Some editors (notably Sublime Text) write `.tmp` files next to the real
/// one on every save.
fn is_tmp_file(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".tmp")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extension_match_is_case_sensitive_suffix() {
        let extensions = exts(&[".go", ".tpl"]);
        assert!(matches_extension(Path::new("/p/main.go"), &extensions));
        assert!(matches_extension(Path::new("/p/view.tpl"), &extensions));
        assert!(!matches_extension(Path::new("/p/MAIN.GO"), &extensions));
        assert!(!matches_extension(Path::new("/p/notes.txt"), &extensions));
    }

    #[test]
    fn tmp_files_are_detected_case_insensitively() {
        assert!(is_tmp_file(Path::new("/p/main.go.TMP")));
        assert!(is_tmp_file(Path::new("/p/main.go.tmp")));
        assert!(!is_tmp_file(Path::new("/p/main.go")));
    }
}
