// src/watch/dedup.rs

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::trace;

use crate::watch::ChangeEvent;

/// Suppresses repeated notifications for files that have not actually been
/// modified since the last event for the same path.
///
/// Editors commonly fire several notifications per save, and a file can be
/// momentarily unreadable mid-write; comparing the stat'ed mtime against the
/// last recorded value for that exact path filters those storms. A path
/// never seen before compares against an empty record, so the first event
/// for an unreadable file is suppressed too.
///
/// Owned by the single event-consumer task; needs no lock under that
/// constraint.
#[derive(Debug, Default)]
pub struct ModTimeFilter {
    seen: HashMap<PathBuf, Option<SystemTime>>,
}

impl ModTimeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward the event unless the path's modification time is unchanged
    /// from the last recorded value.
    pub fn filter(&mut self, path: PathBuf) -> Option<ChangeEvent> {
        let mtime = fs::metadata(&path).and_then(|meta| meta.modified()).ok();
        let previous = self.seen.get(&path).copied().unwrap_or(None);
        if previous == mtime {
            trace!(path = %path.display(), "suppressing event, mtime unchanged");
            return None;
        }
        self.seen.insert(path.clone(), mtime);
        Some(ChangeEvent { path, mtime })
    }
}
