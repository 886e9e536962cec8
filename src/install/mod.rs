use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::{download::download_file, error::InstallerError, http::HttpClient, runtime::Runtime};

pub mod config;

pub use config::{InstallConfig, SKIP_DOWNLOAD_ENV, bin_dir, package_root};

/// Mode applied to downloaded binaries on non-Windows hosts.
const EXECUTABLE_MODE: u32 = 0o755;

/// Installs every binary missing from the package's binary directory.
#[tracing::instrument(skip(runtime, root, download_url))]
pub async fn install<R: Runtime>(
    runtime: R,
    root: Option<PathBuf>,
    download_url: Option<String>,
) -> Result<()> {
    let root = package_root(&runtime, root)?;
    let config = InstallConfig::from_env(&runtime, &root, download_url)?;
    let installer = Installer::new(runtime, HttpClient::build()?);
    installer.install(&config).await
}

pub struct Installer<R: Runtime> {
    pub runtime: R,
    pub http_client: HttpClient,
}

impl<R: Runtime> Installer<R> {
    pub fn new(runtime: R, http_client: HttpClient) -> Self {
        Self {
            runtime,
            http_client,
        }
    }

    /// Downloads each configured binary in turn. Binaries already on disk are
    /// left alone; the first failure aborts the remaining ones.
    #[tracing::instrument(skip(self, config))]
    pub async fn install(&self, config: &InstallConfig) -> Result<()> {
        if config.skip_download {
            info!("{} is set, skipping download", SKIP_DOWNLOAD_ENV);
            return Ok(());
        }

        self.runtime
            .create_dir_all(&config.bin_dir)
            .with_context(|| format!("Failed to create binary directory {:?}", config.bin_dir))?;

        for name in &config.binaries {
            let dest = config.destination(name);
            if self.runtime.exists(&dest) {
                info!("{:?} already exists, skipping download of {}", dest, name);
                continue;
            }

            println!(
                "  installing {} {} ({})",
                name, config.version, config.host
            );
            self.acquire(config, name, &dest).await?;

            if !config.host.is_windows() {
                self.runtime
                    .set_permissions(&dest, EXECUTABLE_MODE)
                    .with_context(|| format!("Failed to mark {:?} executable", dest))?;
            }
            println!("   installed {} {}", name, dest.display());
        }

        Ok(())
    }

    /// Tries each asset name for `name` until one downloads.
    #[tracing::instrument(skip(self, config, dest))]
    async fn acquire(&self, config: &InstallConfig, name: &str, dest: &Path) -> Result<()> {
        let mut last_error = None;

        for asset in config.asset_candidates(name) {
            let url = config.asset_url(&asset);
            match download_file(&self.runtime, &url, dest, &self.http_client).await {
                Ok(()) => {
                    debug!("Installed {} from {}", name, asset);
                    return Ok(());
                }
                Err(e) => {
                    debug!("Download of {} failed: {}", asset, e);
                    last_error = Some(e);
                }
            }
        }

        let source =
            last_error.unwrap_or_else(|| anyhow::anyhow!("no release asset candidates for {}", name));
        Err(InstallerError::AssetNotFound {
            name: name.to_string(),
            source: source.into(),
        }
        .into())
    }
}
