// src/exec/supervisor.rs

//! Child process lifecycle: run, stop, and the exit-watch loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::{GowatchError, Result};
use crate::exec::session::SessionSignal;
use crate::project::Project;

/// How often the exit-watch loop polls the current handle.
pub const EXIT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle of the supervised process within one run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Running,
    /// Stopped on request (rebuild path or shutdown).
    Stopped,
    /// Exited on its own with the given status code.
    Exited(i32),
}

/// Mutable handle state. Every access happens under the supervisor's lock,
/// shared by `run`, `stop`, and the exit-watch loop; the lock is never held
/// across an await on the child itself.
#[derive(Debug)]
struct HandleState {
    child: Option<Child>,
    status: RunStatus,
    /// Set by `stop` so the exit-watch loop can tell an intentional stop
    /// from a crash and skip restart-policy evaluation.
    stop_requested: bool,
}

/// What the exit-watch loop decided about one poll, computed under the lock
/// and acted on after it is released.
enum ExitAction {
    Idle,
    Restart(i32),
    Terminate(i32),
}

/// Owns the one live process of a supervision session.
pub struct Supervisor {
    project: Arc<Project>,
    restart_on_exit: bool,
    poll_interval: Duration,
    session: SessionSignal,
    state: Mutex<HandleState>,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("restart_on_exit", &self.restart_on_exit)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(project: Arc<Project>, restart_on_exit: bool, session: SessionSignal) -> Self {
        Self::with_poll_interval(project, restart_on_exit, session, EXIT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        project: Arc<Project>,
        restart_on_exit: bool,
        session: SessionSignal,
        poll_interval: Duration,
    ) -> Self {
        Self {
            project,
            restart_on_exit,
            poll_interval,
            session,
            state: Mutex::new(HandleState {
                child: None,
                status: RunStatus::NotStarted,
                stop_requested: false,
            }),
        }
    }

    pub async fn status(&self) -> RunStatus {
        self.state.lock().await.status
    }

    /// Launch the built executable and return without waiting for it.
    ///
    /// The child inherits the console and the full host environment plus the
    /// configured overlay. Any prior handle was fully stopped before this
    /// point; replacing it yields a fresh handle with no stale status.
    pub async fn run(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        let executable = self.project.executable_path();
        let mut cmd = Command::new(&executable);
        cmd.args(self.project.run_args())
            .envs(
                self.project
                    .env_overlay()
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
            .current_dir(self.project.root())
            .kill_on_drop(true);

        let child = cmd.spawn()?;
        info!(
            pid = child.id(),
            executable = %executable.display(),
            "application started"
        );

        state.child = Some(child);
        state.status = RunStatus::Running;
        state.stop_requested = false;
        Ok(())
    }

    /// Send the termination signal to the running process.
    ///
    /// Distinct errors for the two non-running cases: `ProcessNotRunning`
    /// when nothing was ever started this cycle, `ProcessAlreadyStopped`
    /// when the process has already exited or been stopped. The signal is
    /// sent at most once per cycle.
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.status {
            RunStatus::NotStarted => Err(GowatchError::ProcessNotRunning),
            RunStatus::Stopped | RunStatus::Exited(_) => Err(GowatchError::ProcessAlreadyStopped),
            RunStatus::Running => {
                let child = state
                    .child
                    .as_mut()
                    .ok_or(GowatchError::ProcessNotRunning)?;
                if let Some(status) = child.try_wait()? {
                    // Exited on its own between the last poll and this stop.
                    let code = status.code().unwrap_or(-1);
                    state.child = None;
                    state.status = RunStatus::Exited(code);
                    return Err(GowatchError::ProcessAlreadyStopped);
                }
                child.start_kill()?;
                state.stop_requested = true;
                state.status = RunStatus::Stopped;
                info!("application stopped");
                Ok(())
            }
        }
    }

    /// Poll the current handle until the session ends, restarting or
    /// terminating the session based on exit status and policy.
    ///
    /// A successful exit, or a non-zero exit with restart-on-exit enabled,
    /// triggers a fresh run. A non-zero exit with the policy disabled closes
    /// the session signal and ends the loop. An operator-initiated stop is
    /// consumed without restart-policy evaluation: the rebuild path owns
    /// that restart.
    pub async fn watch_exits(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = self.session.wait() => {
                    debug!("session cancelled; exit watch stopping");
                    return;
                }
                _ = ticker.tick() => {}
            }

            match self.poll_once().await {
                ExitAction::Idle => {}
                ExitAction::Restart(code) => {
                    info!(code, "application exited; restarting");
                    if let Err(err) = self.run().await {
                        error!(error = %err, "failed to restart application; ending session");
                        self.session.cancel();
                        return;
                    }
                }
                ExitAction::Terminate(code) => {
                    error!(code, "application exited abnormally; ending session");
                    self.session.cancel();
                    return;
                }
            }
        }
    }

    /// One poll step. Classifies an observed exit under the lock but
    /// performs no restart itself, so the lock is released first.
    async fn poll_once(&self) -> ExitAction {
        let mut state = self.state.lock().await;
        let Some(child) = state.child.as_mut() else {
            return ExitAction::Idle;
        };
        match child.try_wait() {
            Ok(None) => ExitAction::Idle,
            Ok(Some(status)) => {
                let code = status.code().unwrap_or(-1);
                state.child = None;
                if state.stop_requested {
                    state.stop_requested = false;
                    debug!(code, "requested stop observed");
                    ExitAction::Idle
                } else {
                    state.status = RunStatus::Exited(code);
                    if status.success() || self.restart_on_exit {
                        ExitAction::Restart(code)
                    } else {
                        ExitAction::Terminate(code)
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to poll application status");
                ExitAction::Idle
            }
        }
    }
}
