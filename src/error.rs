//! Failure kinds surfaced by the installer, resolver and release-notes tool.
//!
//! Everything is carried through `anyhow::Result`; these variants exist so
//! callers and tests can tell the kinds apart with `downcast_ref`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),

    #[error("download failed ({status}): {url}")]
    DownloadFailed { status: u16, url: String },

    #[error("too many redirects (more than {max}): {url}")]
    TooManyRedirects { url: String, max: usize },

    #[error("no release asset could be downloaded for {name}")]
    AssetNotFound {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("binary not found ({platform}/{arch}); re-run the installer")]
    MissingBinary { platform: String, arch: String },

    #[error("version {0} not found in CHANGELOG.md")]
    VersionNotFound(String),
}
