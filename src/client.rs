// SPDX-License-Identifier: MPL-2.0

//! The fetch-and-annotate pipeline.
//!
//! A refresh is one GET of the friends timeline: fetch, defensively
//! parse, resolve each author's avatar once, and annotate every body into
//! spans. A post is one authenticated POST of percent-encoded status
//! text. Either way the caller gets data it owns outright.

use crate::avatar::{self, Avatar, AvatarCache};
use crate::config;
use crate::error::{ClientError, MSG_UNKNOWN_RESPONSE};
use crate::feed::{parse_timeline, Credentials, StatusRecord};
use crate::net::Fetcher;
use crate::text::{annotate, decode_entities, encode_for_url, Span};
use tracing::{debug, info};

/// Everything the presentation layer needs for one rendered status.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub status: StatusRecord,
    pub avatar: Option<Avatar>,
    pub spans: Vec<Span>,
}

/// Outcome of a post request. Blank text is a local no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Posted,
    SkippedEmpty,
}

/// Client for one service instance. Holds no session state beyond the
/// HTTP connection pool; credentials are passed per operation.
pub struct RoostClient {
    fetcher: Fetcher,
    service_url: String,
}

impl RoostClient {
    pub fn new() -> Self {
        Self::with_service(config::DEFAULT_SERVICE)
    }

    pub fn with_service(service_url: &str) -> Self {
        Self {
            fetcher: Fetcher::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Fetch and annotate the friends timeline.
    ///
    /// Entries come back in document order, each with the author's avatar
    /// (resolved at most once per author for this refresh) and the body
    /// split into spans.
    pub async fn fetch_timeline(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<TimelineEntry>, ClientError> {
        let url = format!("{}{}", self.service_url, config::TIMELINE_PATH);
        info!(%url, "refreshing timeline");

        let response = self.fetcher.get(&url, Some(credentials)).await?;
        let records = parse_timeline(&response)?;

        // The cache lives exactly as long as this refresh.
        let mut avatars = AvatarCache::new();
        let mut entries = Vec::with_capacity(records.len());
        for status in records {
            let avatar = avatars
                .lookup_or_resolve(&status.author_id, || {
                    let fetcher = &self.fetcher;
                    let reference = status.avatar_url.clone();
                    let description = status.description.clone();
                    async move {
                        avatar::resolve(fetcher, reference.as_deref()?, description).await
                    }
                })
                .await;

            let spans = annotate(status.body(), &self.service_url);
            entries.push(TimelineEntry {
                status,
                avatar,
                spans,
            });
        }

        debug!(entries = entries.len(), "timeline ready");
        Ok(entries)
    }

    /// Post a new status. Success is HTTP 200; any other status surfaces
    /// the entity-decoded response body as the error message.
    pub async fn post_status(
        &self,
        credentials: &Credentials,
        text: &str,
    ) -> Result<PostOutcome, ClientError> {
        if text.trim().is_empty() {
            debug!("skipping post of blank status");
            return Ok(PostOutcome::SkippedEmpty);
        }

        let url = format!(
            "{}{}?status={}",
            self.service_url,
            config::UPDATE_PATH,
            encode_for_url(text)
        );
        info!("posting status");

        let response = self.fetcher.post(&url, Some(credentials)).await?;
        if response.status == 200 {
            return Ok(PostOutcome::Posted);
        }

        if response.is_empty() {
            Err(ClientError::Server(MSG_UNKNOWN_RESPONSE.to_string()))
        } else {
            let body = String::from_utf8_lossy(&response.body);
            Err(ClientError::Server(decode_entities(&body)))
        }
    }
}

impl Default for RoostClient {
    fn default() -> Self {
        Self::new()
    }
}
