//! Extracts one version's section from a changelog.
//!
//! Sections start with a level-2 heading that names the version, either
//! alone (`## 1.2.0`) or followed by more text (`## 1.2.0 - 2024-01-01`).

use anyhow::Result;
use std::path::Path;

use crate::error::InstallerError;
use crate::runtime::Runtime;

pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

const HEADING: &str = "## ";

fn is_heading_for(line: &str, version: &str) -> bool {
    let heading = format!("{}{}", HEADING, version);
    line.trim() == heading || line.contains(&format!("{} ", heading))
}

/// Returns the body of the section for `version` (a leading `v` is ignored),
/// trimmed and terminated by a single newline.
pub fn extract_section(changelog: &str, version: &str) -> Result<String> {
    let version = version.strip_prefix('v').unwrap_or(version);

    let mut found = false;
    let mut body: Vec<&str> = Vec::new();
    for line in changelog.lines() {
        if line.starts_with(HEADING) {
            if found {
                break;
            }
            found = is_heading_for(line, version);
            continue;
        }
        if found {
            body.push(line);
        }
    }

    if !found {
        return Err(InstallerError::VersionNotFound(version.to_string()).into());
    }

    Ok(format!("{}\n", body.join("\n").trim()))
}

/// Reads the changelog through the runtime and extracts `version`.
#[tracing::instrument(skip(runtime))]
pub fn release_notes<R: Runtime>(runtime: &R, changelog: &Path, version: &str) -> Result<String> {
    let content = runtime.read_to_string(changelog)?;
    extract_section(&content, version)
}
