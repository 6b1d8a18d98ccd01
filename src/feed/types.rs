// SPDX-License-Identifier: MPL-2.0

use serde::Serialize;

/// Basic-auth credentials, held in memory for the process lifetime and
/// supplied by the login surface.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

/// One parsed timeline entry, in document order as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub author_id: String,
    pub author_name: String,
    pub author_handle: String,
    pub avatar_url: Option<String>,
    /// Entity-decoded body. `None` when the feed entry carried no `text`
    /// element at all, as opposed to an explicitly empty one.
    pub text: Option<String>,
    pub created_at: String,
    pub description: Option<String>,
}

impl StatusRecord {
    /// The body to render; an absent element renders as empty.
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}
