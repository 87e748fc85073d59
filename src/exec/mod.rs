// src/exec/mod.rs

//! Process supervision.
//!
//! - [`session`] holds the session-ending cancellation token.
//! - [`supervisor`] owns the child process: start, stop, and the polling
//!   exit-watch loop that drives crash-restart decisions.

pub mod session;
pub mod supervisor;

pub use session::SessionSignal;
pub use supervisor::{RunStatus, Supervisor, EXIT_POLL_INTERVAL};
