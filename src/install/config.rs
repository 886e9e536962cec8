use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::platform::Host;
use crate::runtime::Runtime;

/// Binaries shipped with every release, installed in this order.
pub const BINARIES: &[&str] = &["mcp", "skill"];

pub const DEFAULT_RELEASE_REPO: &str = "wangxu-dev/mcp-skill-cli";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com";

pub const SKIP_DOWNLOAD_ENV: &str = "MCP_SKIP_DOWNLOAD";
pub const RELEASE_REPO_ENV: &str = "MCP_SKILL_RELEASE_REPO";

/// Release version the binaries are fetched for.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the installer needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallConfig {
    /// `owner/name` of the repository publishing the release assets.
    pub repo: String,
    pub version: String,
    /// Scheme and host the release download path is appended to.
    pub download_url: String,
    pub host: Host,
    pub bin_dir: PathBuf,
    pub binaries: Vec<String>,
    pub skip_download: bool,
}

impl InstallConfig {
    /// Reads the environment and detects the host.
    /// Fails on an unsupported platform or architecture.
    pub fn from_env<R: Runtime>(
        runtime: &R,
        root: &Path,
        download_url: Option<String>,
    ) -> Result<Self> {
        let host = Host::detect(runtime)?;

        let repo = runtime
            .env_var(RELEASE_REPO_ENV)
            .ok()
            .filter(|repo| !repo.is_empty())
            .unwrap_or_else(|| DEFAULT_RELEASE_REPO.to_string());

        let skip_download = runtime
            .env_var(SKIP_DOWNLOAD_ENV)
            .map(|value| value == "1")
            .unwrap_or(false);

        let config = Self {
            repo,
            version: VERSION.to_string(),
            download_url: download_url.unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string()),
            host,
            bin_dir: bin_dir(root),
            binaries: BINARIES.iter().map(|name| name.to_string()).collect(),
            skip_download,
        };
        debug!("Install configuration: {:?}", config);
        Ok(config)
    }

    /// `<name>_<version>_<platform>_<arch>`
    pub fn asset_base(&self, name: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            name, self.version, self.host.platform, self.host.arch
        )
    }

    /// Asset names to try, in order. Windows releases have been published
    /// both as `.exe` and `.exe.exe`, so both are tried there.
    pub fn asset_candidates(&self, name: &str) -> Vec<String> {
        let base = self.asset_base(name);
        if self.host.is_windows() {
            vec![format!("{}.exe", base), format!("{}.exe.exe", base)]
        } else {
            vec![base]
        }
    }

    pub fn asset_url(&self, asset: &str) -> String {
        format!(
            "{}/{}/releases/download/v{}/{}",
            self.download_url.trim_end_matches('/'),
            self.repo,
            self.version,
            asset
        )
    }

    /// Final path of an installed binary.
    pub fn destination(&self, name: &str) -> PathBuf {
        self.host.binary_path(&self.bin_dir, name)
    }
}

/// Directory holding the downloaded binaries, relative to the package root.
pub fn bin_dir(root: &Path) -> PathBuf {
    root.join("bin").join("native")
}

/// Package root: an explicit override, or the parent of the directory that
/// holds the running executable (`<root>/bin/mcp-skill`).
pub fn package_root<R: Runtime>(runtime: &R, root: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = root {
        return Ok(root);
    }
    let exe = runtime.current_exe()?;
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(exe_dir.parent().unwrap_or(exe_dir).to_path_buf())
}
