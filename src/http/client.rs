//! HTTP client that follows redirects itself, with a hop limit.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Response, Url, redirect};
use std::io::Write;

use super::redirect::{MAX_REDIRECTS, ResponseAction, classify_response, resolve_location};
use crate::error::InstallerError;

/// User agent sent with every request.
pub const USER_AGENT: &str = "mcp-skill-cli";

/// HTTP client used for release asset downloads.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    /// The client should have automatic redirects disabled; see [`HttpClient::build`].
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the default client: fixed user agent, no automatic redirects.
    pub fn build() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` into the writer produced by `create_writer`.
    ///
    /// The writer is only created once a 2xx response has arrived, so a failed
    /// request never touches the destination. Returns the number of bytes written.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let mut response = self.get_following_redirects(url).await?;
        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }

    /// Issues a GET and follows up to [`MAX_REDIRECTS`] redirects.
    /// Returns the first 2xx response.
    async fn get_following_redirects(&self, url: &str) -> Result<Response> {
        let mut current = Url::parse(url).with_context(|| format!("Invalid download URL: {}", url))?;

        for hop in 0..=MAX_REDIRECTS {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .with_context(|| format!("Failed to send request to {}", current))?;

            match classify_response(&response) {
                ResponseAction::Accept => return Ok(response),
                ResponseAction::Follow(location) => {
                    if hop == MAX_REDIRECTS {
                        break;
                    }
                    let next = resolve_location(&current, &location)?;
                    debug!(
                        "{} redirected ({}) to {}",
                        current,
                        response.status().as_u16(),
                        next
                    );
                    current = next;
                }
                ResponseAction::Reject(status) => {
                    return Err(InstallerError::DownloadFailed {
                        status: status.as_u16(),
                        url: current.to_string(),
                    }
                    .into());
                }
            }
        }

        Err(InstallerError::TooManyRedirects {
            url: url.to_string(),
            max: MAX_REDIRECTS,
        }
        .into())
    }
}
