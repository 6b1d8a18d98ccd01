// SPDX-License-Identifier: MPL-2.0

//! Client core for legacy XML microblogging services.
//!
//! The pipeline: fetch the friends timeline over basic-auth HTTP, parse
//! the `<statuses>` document defensively, resolve each author's avatar
//! once per refresh, and split every status body into typed spans ready
//! for rich rendering. Posting percent-encodes the text and reports
//! success or the server's own error message. Presentation is someone
//! else's job; this crate only hands over data.

pub mod avatar;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod net;
pub mod runtime;
pub mod text;
pub mod worker;

pub use client::{PostOutcome, RoostClient, TimelineEntry};
pub use error::ClientError;
pub use feed::{Credentials, StatusRecord};
pub use text::Span;
pub use worker::{PostResult, Worker};
