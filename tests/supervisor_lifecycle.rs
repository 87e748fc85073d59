// tests/supervisor_lifecycle.rs

//! Process supervisor behaviour against real `/bin/sh` children.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use gowatch::errors::GowatchError;
use gowatch::exec::{RunStatus, SessionSignal, Supervisor};
use gowatch_test_utils::{builders::ProjectBuilder, init_tracing, with_timeout};

const POLL: Duration = Duration::from_millis(50);

/// A supervisor whose "application" is `sh -c <script>`.
fn shell_supervisor(
    root: &std::path::Path,
    script: &str,
    restart_on_exit: bool,
    session: SessionSignal,
) -> Arc<Supervisor> {
    let project = Arc::new(
        ProjectBuilder::new(root)
            .output("/bin/sh")
            .run_arg("-c")
            .run_arg(script)
            .build(),
    );
    Arc::new(Supervisor::with_poll_interval(
        project,
        restart_on_exit,
        session,
        POLL,
    ))
}

#[tokio::test]
async fn stop_without_run_is_not_running() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), "sleep 30", false, session);

    assert!(matches!(
        supervisor.stop().await,
        Err(GowatchError::ProcessNotRunning)
    ));
    assert_eq!(supervisor.status().await, RunStatus::NotStarted);
}

#[tokio::test]
async fn second_stop_is_already_stopped() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), "sleep 30", false, session);

    supervisor.run().await.expect("run");
    assert_eq!(supervisor.status().await, RunStatus::Running);

    supervisor.stop().await.expect("first stop");
    assert_eq!(supervisor.status().await, RunStatus::Stopped);

    assert!(matches!(
        supervisor.stop().await,
        Err(GowatchError::ProcessAlreadyStopped)
    ));
}

#[tokio::test]
async fn run_after_stop_yields_fresh_handle() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), "sleep 30", false, session);

    supervisor.run().await.expect("run");
    supervisor.stop().await.expect("stop");
    assert_eq!(supervisor.status().await, RunStatus::Stopped);

    supervisor.run().await.expect("second run");
    assert_eq!(supervisor.status().await, RunStatus::Running);

    // And the fresh handle is stoppable again.
    supervisor.stop().await.expect("stop fresh handle");
}

/// An operator-initiated stop must not be treated as a crash: the exit-watch
/// loop observes the kill but neither restarts nor ends the session.
#[tokio::test]
async fn intentional_stop_is_not_a_crash() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), "sleep 30", false, session.clone());

    supervisor.run().await.expect("run");
    tokio::spawn(Arc::clone(&supervisor).watch_exits());

    supervisor.stop().await.expect("stop");
    tokio::time::sleep(POLL * 6).await;

    assert!(!session.is_cancelled());
    assert_eq!(supervisor.status().await, RunStatus::Stopped);
}

/// Restart policy disabled: a non-zero exit ends the session, with no
/// restart.
#[tokio::test]
async fn nonzero_exit_without_policy_ends_session() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), "exit 3", false, session.clone());

    supervisor.run().await.expect("run");
    let watcher = tokio::spawn(Arc::clone(&supervisor).watch_exits());

    with_timeout(session.wait()).await;
    assert_eq!(supervisor.status().await, RunStatus::Exited(3));

    // The loop terminated along with the session.
    with_timeout(watcher).await.expect("watch task");
}

/// Restart policy enabled: the first crash triggers a restart and the poller
/// keeps the session alive. The script crashes once, then sleeps.
#[tokio::test]
async fn nonzero_exit_with_policy_restarts() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("restarted");
    let script = format!(
        "if [ -e {marker} ]; then sleep 30; else touch {marker}; exit 3; fi",
        marker = marker.display()
    );
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), &script, true, session.clone());

    supervisor.run().await.expect("run");
    tokio::spawn(Arc::clone(&supervisor).watch_exits());

    with_timeout(async {
        while !marker.exists() || supervisor.status().await != RunStatus::Running {
            tokio::time::sleep(POLL).await;
        }
    })
    .await;

    // One restart happened and the session survived the crash.
    tokio::time::sleep(POLL * 6).await;
    assert!(!session.is_cancelled());
    assert_eq!(supervisor.status().await, RunStatus::Running);

    supervisor.stop().await.expect("cleanup stop");
    session.cancel();
}

/// A clean exit triggers a fresh run regardless of the restart policy.
#[tokio::test]
async fn clean_exit_triggers_rerun() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("reran");
    let script = format!(
        "if [ -e {marker} ]; then sleep 30; else touch {marker}; exit 0; fi",
        marker = marker.display()
    );
    let session = SessionSignal::new();
    let supervisor = shell_supervisor(dir.path(), &script, false, session.clone());

    supervisor.run().await.expect("run");
    tokio::spawn(Arc::clone(&supervisor).watch_exits());

    with_timeout(async {
        while !marker.exists() || supervisor.status().await != RunStatus::Running {
            tokio::time::sleep(POLL).await;
        }
    })
    .await;

    assert!(!session.is_cancelled());
    supervisor.stop().await.expect("cleanup stop");
    session.cancel();
}
