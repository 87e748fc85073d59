// src/engine/mod.rs

//! Session orchestration.
//!
//! Wires the change pipeline (detector → dedup → debounce) into the rebuild
//! action (stop → build → run), starts the exit-watch loop alongside, and
//! exposes the session signal the caller blocks on.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::build::{BuildOutcome, Builder};
use crate::errors::{GowatchError, Result};
use crate::exec::{SessionSignal, Supervisor};
use crate::project::Project;
use crate::watch::{
    self, BuildTrigger, Debouncer, DetectorHandle, ModTimeFilter, WatchConfig,
};

/// A running supervision session.
///
/// Owns the detector handle (dropping it stops change notification) and the
/// supervisor, so the child can be stopped once the session ends.
pub struct Engine {
    session: SessionSignal,
    supervisor: Arc<Supervisor>,
    _detector: DetectorHandle,
}

impl Engine {
    /// Build and run the application once, then start watching.
    ///
    /// Only initialization-time failures (watcher setup, first spawn of a
    /// successfully built executable) are returned; a failing initial build
    /// leaves the session alive waiting for the next change.
    pub async fn start(project: Arc<Project>, restart_on_exit: bool) -> Result<Self> {
        let session = SessionSignal::new();
        let supervisor = Arc::new(Supervisor::new(
            Arc::clone(&project),
            restart_on_exit,
            session.clone(),
        ));
        let builder = Arc::new(Builder::new(Arc::clone(&project)));

        match builder.build().await {
            Ok(_) => supervisor.run().await?,
            Err(
                err @ (GowatchError::DependencyResolve(_)
                | GowatchError::DependencyInstall(_)
                | GowatchError::Compile(_)),
            ) => {
                error!(error = %err, "initial build failed; waiting for changes");
            }
            Err(err) => return Err(err),
        }

        // Exit-watch loop runs for the whole session.
        tokio::spawn(Arc::clone(&supervisor).watch_exits());

        // Change pipeline: detector -> dedup -> debounce -> rebuild.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let detector = watch::spawn_change_detector(
            &WatchConfig {
                paths: project.watch_paths().to_vec(),
                extensions: project.extensions().to_vec(),
            },
            event_tx,
        )?;

        let rebuild = Arc::new(Rebuild {
            supervisor: Arc::clone(&supervisor),
            builder,
        });
        let debouncer = Debouncer::new(rebuild, session.clone());
        {
            let session = session.clone();
            tokio::spawn(async move {
                // The dedup table is touched only by this task; no lock.
                let mut dedup = ModTimeFilter::new();
                loop {
                    tokio::select! {
                        _ = session.wait() => break,
                        path = event_rx.recv() => match path {
                            Some(path) => {
                                if let Some(event) = dedup.filter(path) {
                                    debouncer.observe(event);
                                }
                            }
                            None => break,
                        }
                    }
                }
                debug!("event consumer finished");
            });
        }

        // Ctrl-C ends the session.
        {
            let session = session.clone();
            tokio::spawn(async move {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                    return;
                }
                info!("interrupt received; ending session");
                session.cancel();
            });
        }

        Ok(Self {
            session,
            supervisor,
            _detector: detector,
        })
    }

    pub fn session(&self) -> &SessionSignal {
        &self.session
    }

    /// Block until the session ends, then stop the child best-effort.
    pub async fn wait(&self) {
        self.session.wait().await;
        if let Err(err) = self.supervisor.stop().await {
            debug!(error = %err, "no process to stop at session end");
        }
    }
}

/// The debounced rebuild action: stop the old process, run the build
/// sequence, start the new executable.
struct Rebuild {
    supervisor: Arc<Supervisor>,
    builder: Arc<Builder>,
}

impl BuildTrigger for Rebuild {
    fn rebuild(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            match self.supervisor.stop().await {
                Ok(()) => {}
                Err(GowatchError::ProcessNotRunning | GowatchError::ProcessAlreadyStopped) => {
                    debug!("no running process to stop before rebuild");
                }
                Err(err) => return Err(err),
            }

            match self.builder.build().await {
                Ok(BuildOutcome::Completed) => {}
                Ok(BuildOutcome::Skipped) => return Ok(()),
                // Build-cycle errors are recovered here: log them and wait
                // for the next change.
                Err(
                    err @ (GowatchError::DependencyResolve(_)
                    | GowatchError::DependencyInstall(_)
                    | GowatchError::Compile(_)),
                ) => {
                    error!(error = %err, "build cycle aborted");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }

            self.supervisor.run().await
        })
    }
}
