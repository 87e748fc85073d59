// src/build/compile.rs

use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::errors::{GowatchError, Result};

/// Run `go build -o <output>` in the project root with the fast-build
/// environment variant (`GOGC=off`), streaming compiler output to the
/// controlling terminal.
///
/// A non-zero exit is a [`GowatchError::Compile`] even though the compiler
/// process itself launched fine.
pub async fn compile(root: &Path, output: &Path) -> Result<()> {
    info!(output = %output.display(), "building");
    let status = Command::new("go")
        .arg("build")
        .arg("-o")
        .arg(output)
        .current_dir(root)
        .env("GOGC", "off")
        .status()
        .await?;
    if !status.success() {
        return Err(GowatchError::Compile(status.code().unwrap_or(-1)));
    }
    Ok(())
}
