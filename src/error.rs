// SPDX-License-Identifier: MPL-2.0

use thiserror::Error;

/// Message shown when the server returned no bytes at all.
pub const MSG_NO_RESPONSE: &str = "no server response";

/// Message shown when the response could not be interpreted.
pub const MSG_UNKNOWN_RESPONSE: &str = "unknown server response";

/// Pipeline errors, each carrying the single user-facing message that the
/// presentation layer surfaces in a dialog. Display prints the message
/// alone so callers can hand it over verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Connection-level failure: DNS, connect, TLS, timeout, or an empty
    /// response where one was required.
    #[error("{0}")]
    Transport(String),

    /// The server answered, but with a non-200 status or a non-XML payload.
    /// The message is the entity-decoded response body when one exists.
    #[error("{0}")]
    Server(String),

    /// The response claimed success but did not parse as the expected
    /// timeline document.
    #[error("{0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// The user-facing message, without any taxonomy prefix.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Transport(m)
            | ClientError::Server(m)
            | ClientError::MalformedResponse(m) => m,
        }
    }
}
