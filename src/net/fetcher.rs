// SPDX-License-Identifier: MPL-2.0

//! Single-round-trip HTTP fetcher with per-call response capture.
//!
//! Every call owns its own capture buffers, so concurrent fetches are safe
//! and nothing leaks between invocations.

use crate::config;
use crate::error::ClientError;
use crate::feed::Credentials;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Captured outcome of one network round trip. Produced once per call and
/// owned by the caller; the fetcher keeps no state about it.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub body: Vec<u8>,
    /// `Content-Type` value with any `;`-delimited parameters stripped.
    pub content_type: Option<String>,
    pub status: u16,
}

impl FetchResult {
    /// True when the response carried no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// HTTP client wrapper. One reqwest client, shared connection pool,
/// redirects followed.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(config::USER_AGENT)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    /// Issue a GET, optionally with basic authentication.
    pub async fn get(
        &self,
        url: &str,
        auth: Option<&Credentials>,
    ) -> Result<FetchResult, ClientError> {
        self.perform(self.client.get(url), auth, url).await
    }

    /// Issue a POST with an empty request body, optionally with basic
    /// authentication. Outgoing data rides in the query string.
    pub async fn post(
        &self,
        url: &str,
        auth: Option<&Credentials>,
    ) -> Result<FetchResult, ClientError> {
        self.perform(self.client.post(url).body(""), auth, url).await
    }

    async fn perform(
        &self,
        request: reqwest::RequestBuilder,
        auth: Option<&Credentials>,
        url: &str,
    ) -> Result<FetchResult, ClientError> {
        let request = match auth {
            Some(creds) => request.basic_auth(&creds.identifier, Some(&creds.secret)),
            None => request,
        };

        let mut response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(strip_parameters);

        // Accumulate the body chunk by chunk into this call's own buffer;
        // the server controls the chunk sizes.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
        {
            body.extend_from_slice(&chunk);
        }

        debug!(url, status, bytes = body.len(), "fetch complete");

        Ok(FetchResult {
            body,
            content_type,
            status,
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the media type only: everything up to the first `;`, trimmed.
fn strip_parameters(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
