// SPDX-License-Identifier: MPL-2.0

//! Rich text span detection for status bodies.
//!
//! Splits decoded status text into a lossless sequence of typed spans:
//! plain text, autolinked URLs, and @mentions resolved to profile URLs.
//! Concatenating the display text of the spans always reproduces the
//! input exactly.

use serde::Serialize;

/// A typed, contiguous slice of status text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Span {
    Text { text: String },
    /// An autolinked URL; the display text and the target are the same.
    Link { text: String, url: String },
    /// An @mention. `text` keeps the marker as it appeared; `url` points
    /// at the author's profile on the service.
    Mention { text: String, url: String },
}

impl Span {
    /// The text this span contributes to the rendered body.
    pub fn display_text(&self) -> &str {
        match self {
            Span::Text { text } | Span::Link { text, .. } | Span::Mention { text, .. } => text,
        }
    }
}

/// URL schemes that start a link span.
const SCHEMES: [&[u8]; 2] = [b"http://", b"ftp://"];

/// Full-width commercial at (U+FF20), accepted as a mention marker
/// alongside plain `@`. Common in statuses typed with CJK input methods.
const FULLWIDTH_AT: &[u8] = "\u{ff20}".as_bytes();

/// Characters that may continue a URL once a scheme matched. `!` is
/// deliberately excluded so sentence punctuation ends the link.
fn is_url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b';' | b'/'
                | b'?'
                | b':'
                | b'@'
                | b'&'
                | b'='
                | b'+'
                | b'$'
                | b','
                | b'-'
                | b'_'
                | b'.'
                | b'~'
                | b'*'
                | b'\''
                | b'('
                | b')'
                | b'%'
        )
}

/// Characters that may continue a handle after the mention marker.
fn is_handle_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan decoded status text left to right and split it into spans.
///
/// Mention profile links are built as `<service_url>/<handle>`. The scan
/// never backtracks: once a trigger matches it consumes at least the
/// marker, even when no handle or URL characters follow.
pub fn annotate(text: &str, service_url: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut run_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(scheme) = SCHEMES.iter().copied().find(|s| bytes[i..].starts_with(s)) {
            flush_run(&mut spans, text, run_start, i);

            let mut end = i + scheme.len();
            while end < bytes.len() && is_url_byte(bytes[end]) {
                end += 1;
            }
            let link = &text[i..end];
            spans.push(Span::Link {
                text: link.to_string(),
                url: link.to_string(),
            });
            i = end;
            run_start = i;
        } else if bytes[i] == b'@' || bytes[i..].starts_with(FULLWIDTH_AT) {
            flush_run(&mut spans, text, run_start, i);

            let marker_len = if bytes[i] == b'@' { 1 } else { FULLWIDTH_AT.len() };
            let mut end = i + marker_len;
            while end < bytes.len() && is_handle_byte(bytes[end]) {
                end += 1;
            }
            let handle = &text[i + marker_len..end];
            spans.push(Span::Mention {
                text: text[i..end].to_string(),
                url: format!("{service_url}/{handle}"),
            });
            i = end;
            run_start = i;
        } else {
            // Trigger bytes are ASCII or a UTF-8 lead byte, so stepping one
            // byte at a time never matches inside a multi-byte character.
            i += 1;
        }
    }
    flush_run(&mut spans, text, run_start, i);

    spans
}

fn flush_run(spans: &mut Vec<Span>, text: &str, start: usize, end: usize) {
    if start != end {
        spans.push(Span::Text {
            text: text[start..end].to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = "http://twitter.com";

    fn annotated(text: &str) -> Vec<Span> {
        annotate(text, SERVICE)
    }

    fn rejoin(spans: &[Span]) -> String {
        spans.iter().map(Span::display_text).collect()
    }

    #[test]
    fn test_plain_text_single_span() {
        let spans = annotated("just words, nothing else");
        assert_eq!(
            spans,
            vec![Span::Text {
                text: "just words, nothing else".to_string()
            }]
        );
    }

    #[test]
    fn test_mixed_body() {
        let spans = annotated("hello @bob check http://example.com/x!");
        assert_eq!(
            spans,
            vec![
                Span::Text {
                    text: "hello ".to_string()
                },
                Span::Mention {
                    text: "@bob".to_string(),
                    url: "http://twitter.com/bob".to_string()
                },
                Span::Text {
                    text: " check ".to_string()
                },
                Span::Link {
                    text: "http://example.com/x".to_string(),
                    url: "http://example.com/x".to_string()
                },
                Span::Text {
                    text: "!".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_link_display_equals_target() {
        let spans = annotated("see ftp://files.example.org/pub");
        match &spans[1] {
            Span::Link { text, url } => assert_eq!(text, url),
            other => panic!("expected Link, got {other:?}"),
        }
    }

    #[test]
    fn test_fullwidth_mention_marker() {
        let text = "\u{ff20}alice hi";
        let spans = annotated(text);
        assert_eq!(
            spans[0],
            Span::Mention {
                text: "\u{ff20}alice".to_string(),
                url: "http://twitter.com/alice".to_string()
            }
        );
        assert_eq!(rejoin(&spans), text);
    }

    #[test]
    fn test_bare_marker_consumes_itself() {
        // A lone @ still becomes a mention span so the scan cannot stall.
        let spans = annotated("mail me @ home");
        assert_eq!(
            spans,
            vec![
                Span::Text {
                    text: "mail me ".to_string()
                },
                Span::Mention {
                    text: "@".to_string(),
                    url: "http://twitter.com/".to_string()
                },
                Span::Text {
                    text: " home".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_mention_at_start_and_end() {
        let spans = annotated("@first and @last");
        assert_eq!(spans.len(), 3);
        assert!(matches!(&spans[0], Span::Mention { text, .. } if text == "@first"));
        assert!(matches!(&spans[2], Span::Mention { text, .. } if text == "@last"));
    }

    #[test]
    fn test_url_at_end_of_input() {
        let spans = annotated("go http://example.com");
        assert_eq!(spans.len(), 2);
        assert!(matches!(&spans[1], Span::Link { url, .. } if url == "http://example.com"));
    }

    #[test]
    fn test_https_is_not_a_trigger() {
        // The legacy service only autolinks http:// and ftp://.
        let spans = annotated("https://example.com");
        assert_eq!(
            spans,
            vec![Span::Text {
                text: "https://example.com".to_string()
            }]
        );
    }

    #[test]
    fn test_lossless_rejoin() {
        let bodies = [
            "hello @bob check http://example.com/x!",
            "\u{ff20}alice says hi to @bob_99",
            "no triggers at all",
            "emoji \u{1f600} then @x",
            "@",
            "http://",
            "trailing text after http://a.b/c ",
        ];
        for body in bodies {
            assert_eq!(rejoin(&annotated(body)), body, "lossless split of {body:?}");
        }
    }

    #[test]
    fn test_service_base_flows_into_mentions() {
        let spans = annotate("@bob", "http://identi.ca");
        assert!(matches!(&spans[0], Span::Mention { url, .. } if url == "http://identi.ca/bob"));
    }
}
