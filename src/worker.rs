// SPDX-License-Identifier: MPL-2.0

//! Single-slot coordination for timeline operations.
//!
//! The presentation layer dispatches refresh and post operations here and
//! awaits their completion; the slot mutex guarantees that at most one
//! operation runs at a time per worker. There is no cancellation — a
//! dispatched operation runs to completion or failure.

use crate::client::{PostOutcome, RoostClient, TimelineEntry};
use crate::error::ClientError;
use crate::feed::Credentials;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// What a post dispatch produced. A successful post is immediately
/// followed by a refresh, run as a second sequential operation, and the
/// new timeline rides back with the result.
#[derive(Debug)]
pub enum PostResult {
    Posted { timeline: Vec<TimelineEntry> },
    SkippedEmpty,
}

/// Serializes pipeline operations for one window.
pub struct Worker {
    client: Arc<RoostClient>,
    slot: Mutex<()>,
}

impl Worker {
    pub fn new(client: Arc<RoostClient>) -> Self {
        Self {
            client,
            slot: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &RoostClient {
        &self.client
    }

    /// Run one timeline refresh.
    pub async fn refresh(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<TimelineEntry>, ClientError> {
        let _slot = self.slot.lock().await;
        self.client.fetch_timeline(credentials).await
    }

    /// Post a status, then refresh on success.
    ///
    /// The refresh is a separate operation: the slot is released between
    /// the two, exactly as if the user had pressed refresh right after a
    /// successful post.
    pub async fn post(
        &self,
        credentials: &Credentials,
        text: &str,
    ) -> Result<PostResult, ClientError> {
        let outcome = {
            let _slot = self.slot.lock().await;
            self.client.post_status(credentials, text).await?
        };

        match outcome {
            PostOutcome::SkippedEmpty => {
                debug!("post skipped, nothing to refresh");
                Ok(PostResult::SkippedEmpty)
            }
            PostOutcome::Posted => {
                let timeline = self.refresh(credentials).await?;
                Ok(PostResult::Posted { timeline })
            }
        }
    }
}
