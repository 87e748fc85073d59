// src/build/mod.rs

//! The serialized build sequence: dependency install + compile.
//!
//! - [`gate`] holds the build gate that keeps concurrent triggers down to
//!   one in-flight build per cycle.
//! - [`deps`] wraps the external dependency resolver (`go list` / `go get`).
//! - [`compile`] wraps the compiler invocation.

pub mod compile;
pub mod deps;
pub mod gate;

pub use deps::INSTALL_BATCH_SIZE;
pub use gate::{BuildGate, GateState};

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::project::Project;

/// Whether a requested build actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Completed,
    /// Dropped because another build was already in flight this cycle.
    Skipped,
}

/// Serialized front door to the build sequence.
pub struct Builder {
    project: Arc<Project>,
    gate: BuildGate,
}

impl Builder {
    pub fn new(project: Arc<Project>) -> Self {
        Self {
            project,
            gate: BuildGate::new(),
        }
    }

    /// Run one build cycle: resolve dependencies, install them in batches,
    /// compile. Concurrent requests collapse to at most one build per cycle.
    ///
    /// Resolution failure aborts the cycle before any install is attempted.
    pub async fn build(&self) -> Result<BuildOutcome> {
        if !self.gate.try_begin() {
            debug!("build already in flight; dropping trigger");
            return Ok(BuildOutcome::Skipped);
        }
        let result = self.build_inner().await;
        self.gate.finish(result.is_ok());
        result.map(|_| BuildOutcome::Completed)
    }

    async fn build_inner(&self) -> Result<()> {
        let deps = deps::resolve(self.project.root()).await?;
        deps::install(&deps).await?;
        compile::compile(self.project.root(), self.project.output()).await
    }
}
