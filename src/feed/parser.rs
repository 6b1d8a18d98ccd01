// SPDX-License-Identifier: MPL-2.0

//! Defensive parsing of the `<statuses>` timeline document.
//!
//! The server is not trusted: the status code, content type, document
//! shape, and every field are validated, and any failure collapses into a
//! single user-facing message rather than a panic.

use crate::error::{ClientError, MSG_NO_RESPONSE, MSG_UNKNOWN_RESPONSE};
use crate::feed::StatusRecord;
use crate::net::FetchResult;
use crate::text::decode_entities;
use roxmltree::{Document, Node};
use tracing::debug;

/// Content types accepted for a timeline document.
fn is_xml_content_type(content_type: &str) -> bool {
    matches!(content_type, "application/xml" | "text/xml")
}

/// Parse a timeline response into status records, in document order.
///
/// Failure policy, checked in order:
/// 1. no bytes received at all;
/// 2. non-200 status or a non-XML content type — the body is an error
///    payload, surfaced entity-decoded;
/// 3. the bytes do not parse as XML — the raw body is surfaced;
/// 4. the document is not `<statuses>` with at least one `<status>` child.
pub fn parse_timeline(response: &FetchResult) -> Result<Vec<StatusRecord>, ClientError> {
    if response.is_empty() {
        return Err(ClientError::Transport(MSG_NO_RESPONSE.to_string()));
    }

    let wrong_type = response
        .content_type
        .as_deref()
        .is_some_and(|ct| !is_xml_content_type(ct));
    if response.status != 200 || wrong_type {
        let body = String::from_utf8_lossy(&response.body);
        return Err(ClientError::Server(decode_entities(&body)));
    }

    let text = match std::str::from_utf8(&response.body) {
        Ok(text) => text,
        Err(_) => return Err(malformed_from_body(&response.body)),
    };
    let doc = match Document::parse(text) {
        Ok(doc) => doc,
        Err(_) => return Err(malformed_from_body(&response.body)),
    };

    let root = doc.root_element();
    if root.tag_name().name() != "statuses" {
        return Err(ClientError::MalformedResponse(
            MSG_UNKNOWN_RESPONSE.to_string(),
        ));
    }

    let records: Vec<StatusRecord> = root
        .children()
        .filter(|node| node.is_element() && node.has_tag_name("status"))
        .map(parse_status)
        .collect();

    if records.is_empty() {
        return Err(ClientError::MalformedResponse(
            MSG_UNKNOWN_RESPONSE.to_string(),
        ));
    }

    debug!(count = records.len(), "parsed timeline");
    Ok(records)
}

/// Surface an unparseable body as-is, or the fallback when it is blank.
fn malformed_from_body(body: &[u8]) -> ClientError {
    if body.is_empty() {
        ClientError::MalformedResponse(MSG_UNKNOWN_RESPONSE.to_string())
    } else {
        ClientError::MalformedResponse(String::from_utf8_lossy(body).into_owned())
    }
}

/// Extract one status entry. Fields are located by child-element name,
/// order-independent, first match wins; anything missing means absent.
fn parse_status(status: Node) -> StatusRecord {
    let created_at = child_text(status, "created_at").unwrap_or_default();

    // Present-but-empty stays Some(""), absent stays None.
    let text = first_child_element(status, "text")
        .map(|node| decode_entities(node.text().unwrap_or_default()));

    let (author_id, author_name, author_handle, avatar_url, description) =
        match first_child_element(status, "user") {
            Some(user) => (
                child_text(user, "id").unwrap_or_default(),
                child_text(user, "name").unwrap_or_default(),
                child_text(user, "screen_name").unwrap_or_default(),
                child_text(user, "profile_image_url"),
                child_text(user, "description"),
            ),
            None => (
                String::new(),
                String::new(),
                String::new(),
                None,
                None,
            ),
        };

    StatusRecord {
        author_id,
        author_name,
        author_handle,
        avatar_url,
        text,
        created_at,
        description,
    }
}

fn first_child_element<'a, 'd>(node: Node<'a, 'd>, name: &str) -> Option<Node<'a, 'd>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

fn child_text(node: Node, name: &str) -> Option<String> {
    first_child_element(node, name).map(|child| child.text().unwrap_or_default().to_string())
}
