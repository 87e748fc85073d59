// src/build/deps.rs

//! Dependency resolution and installation via the Go toolchain.

use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{GowatchError, Result};

/// `go get` command lines are capped at this many packages per invocation.
pub const INSTALL_BATCH_SIZE: usize = 20;

/// Ask `go list` for the transitive dependencies of the package tree rooted
/// at `path`.
pub async fn resolve(path: &Path) -> Result<Vec<String>> {
    let pattern = format!("{}/...", path.display());
    debug!(pattern = %pattern, "resolving dependencies");

    let output = Command::new("go")
        .args(["list", "-f", "{{.Deps}}", &pattern])
        .env("GOGC", "off")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|err| GowatchError::DependencyResolve(err.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() || stdout.trim().is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GowatchError::DependencyResolve(format!(
            "go list gave no dependency listing: {}",
            stderr.trim()
        )));
    }
    Ok(parse_go_list(&stdout))
}

/// Parse `go list -f {{.Deps}}` output: one bracketed, space-separated
/// package list per queried package. Duplicates across lists are dropped,
/// first occurrence wins.
pub fn parse_go_list(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deps = Vec::new();
    for line in output.lines() {
        let line = line.trim().trim_start_matches('[').trim_end_matches(']');
        for dep in line.split_whitespace() {
            if seen.insert(dep.to_string()) {
                deps.push(dep.to_string());
            }
        }
    }
    deps
}

/// Install the resolved set with `go get`, at most [`INSTALL_BATCH_SIZE`]
/// packages per invocation to bound the command line.
pub async fn install(deps: &[String]) -> Result<()> {
    if deps.is_empty() {
        return Ok(());
    }
    info!(count = deps.len(), "checking dependencies");
    for batch in deps.chunks(INSTALL_BATCH_SIZE) {
        debug!(?batch, "installing dependency batch");
        let status = Command::new("go")
            .arg("get")
            .args(batch)
            .env("GOGC", "off")
            .status()
            .await
            .map_err(|err| GowatchError::DependencyInstall(err.to_string()))?;
        if !status.success() {
            return Err(GowatchError::DependencyInstall(format!(
                "go get exited with status {}",
                status.code().unwrap_or(-1)
            )));
        }
    }
    info!("dependency check complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_bracketed_list() {
        let deps = parse_go_list("[fmt net/http github.com/lib/pq]\n");
        assert_eq!(deps, vec!["fmt", "net/http", "github.com/lib/pq"]);
    }

    #[test]
    fn merges_multiple_package_lists_and_deduplicates() {
        let deps = parse_go_list("[fmt net/http]\n[fmt errors net/http os]\n");
        assert_eq!(deps, vec!["fmt", "net/http", "errors", "os"]);
    }

    #[test]
    fn empty_listing_yields_no_deps() {
        assert!(parse_go_list("[]\n").is_empty());
        assert!(parse_go_list("").is_empty());
    }
}
