//! Resolving and running installed binaries.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::install::bin_dir;
use crate::platform::{Host, resolve_binary};
use crate::runtime::Runtime;

/// Exit code reported when the child was terminated by a signal.
const SIGNALLED_EXIT_CODE: i32 = 1;

/// Absolute path of the installed binary `name` under the package root.
pub fn locate<R: Runtime>(runtime: &R, root: &Path, name: &str) -> Result<PathBuf> {
    let host = Host::detect(runtime)?;
    resolve_binary(runtime, &host, &bin_dir(root), name)
}

/// Runs the installed binary `name` with `args`, inheriting stdio, and
/// returns its exit code.
#[tracing::instrument(skip(runtime, root))]
pub async fn run<R: Runtime>(runtime: &R, root: &Path, name: &str, args: &[String]) -> Result<i32> {
    let path = locate(runtime, root, name)?;
    debug!("Launching {:?} with {:?}", path, args);

    let status = Command::new(&path)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to launch {}", path.display()))?;

    let code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);
    debug!("{} exited with {}", name, code);
    Ok(code)
}
