//! HTTP transport boundary.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use crate::error::{TransportError, redact_url};

/// Performs one GET and returns the raw body.
///
/// Uses `trait_variant::make` to generate a `Send`-bound async trait, so tests
/// can substitute canned responses. Implement `Transport`; `LocalTransport`
/// comes with it.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Fetches `url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] for any status other than 200 and
    /// [`TransportError::Network`] when the request or body read fails.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct HttpTransport {
    /// HTTP client (gzip enabled).
    http_client: Client,
}

impl HttpTransport {
    /// Creates a transport sending `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` cannot be built.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http_client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let send_result = self.http_client.get(url.clone()).send().await;
        let response = send_result.map_err(|source| TransportError::Network {
            url: redact_url(url),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(
                code = status.as_u16(),
                headers = ?response.headers(),
                "Unexpected status received from Cinemate"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: redact_url(url),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Network {
                url: redact_url(url),
                source,
            })?;
        Ok(body.to_vec())
    }
}
