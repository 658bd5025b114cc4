// src/package/fetch.rs
// =============================================================================
// This module downloads README files and assets over HTTP.
//
// Strategy:
// - One reqwest Client per run, reused for every request (connection pooling)
// - Requests are awaited one at a time by the caller, never in parallel
// - Any non-2xx status is treated as a failure, with the status in the message
//
// The `Fetcher` trait sits between the packager and the network, so tests can
// swap in an in-memory fetcher instead of talking to GitHub.
//
// Rust concepts:
// - Traits with async methods: the packager is generic over Fetcher
// - Builder pattern: Client::builder() configures TLS and timeouts
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;

/// Something that can GET a URL.
// The packager is generic over this (never `dyn`), so plain async fns are fine.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetches a URL and returns the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetches a URL and returns the raw body bytes.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Settings for the HTTP client used by this tool only.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Skip TLS certificate verification (scoped to our Client, not global)
    pub insecure: bool,
    /// Per-request timeout; None means wait forever
    pub timeout: Option<Duration>,
}

/// The production Fetcher, backed by reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Creates an HTTP fetcher
    //
    // Returns an error if the TLS backend can't be initialized
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .danger_accept_invalid_certs(options.insecure)
            .redirect(reqwest::redirect::Policy::limited(5)); // GitHub "raw" URLs redirect

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { client: builder.build()? })
    }

    // Sends a GET and fails on anything but 2xx
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            ));
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let content = self.get(url).await?.text().await?;
        Ok(content)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
