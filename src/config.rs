// SPDX-License-Identifier: MPL-2.0

#![allow(dead_code)]

pub const APP_NAME: &str = "roost";
pub const USER_AGENT: &str = "roost/0.1.0";

/// Base URL of the service. Mention profile links are built against the
/// same base, so pointing a client at another service moves both the API
/// endpoints and the @mention targets.
pub const DEFAULT_SERVICE: &str = "http://twitter.com";

/// Friends timeline feed, relative to the service base.
pub const TIMELINE_PATH: &str = "/statuses/friends_timeline.xml";

/// Status update endpoint, relative to the service base.
pub const UPDATE_PATH: &str = "/statuses/update.xml";

/// Timestamp format of the service's `created_at` field.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
