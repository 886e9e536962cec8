use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;

/// Downloads a file from a URL straight to its final destination.
///
/// The destination is created executable only after the server answered with
/// a 2xx. If streaming fails afterwards the partial file is removed so it is
/// not mistaken for a finished install.
#[tracing::instrument(skip(runtime, dest, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<()> {
    info!("Downloading file from {}...", url);

    let mut created = false;
    let result = http_client
        .download_file(url, || {
            created = true;
            runtime
                .create_executable_file(dest)
                .with_context(|| format!("Failed to create file at {:?}", dest))
        })
        .await;

    match result {
        Ok(bytes) => {
            debug!("Wrote {} bytes to {:?}", bytes, dest);
            info!("Download complete.");
            Ok(())
        }
        Err(e) => {
            if created {
                debug!("Download failed, removing partial file {:?}", dest);
                if let Err(remove_err) = runtime.remove_file(dest) {
                    warn!("Failed to remove partial file {:?}: {}", dest, remove_err);
                }
            }
            Err(e)
        }
    }
}
