// SPDX-License-Identifier: MPL-2.0

//! Wire-compatible text encoding for the legacy service.
//!
//! The service escapes a small fixed set of character entities in status
//! bodies and expects outgoing status text percent-encoded far more
//! aggressively than a standard URL encoder would. Both transforms are
//! reproduced exactly; generic HTML or URL libraries do not match them.

/// The five entity sequences the service emits. None is a prefix of
/// another, so first match is the only match.
const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&nbsp;", ' '),
    ("&quot;", '"'),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

/// Replace the known entity sequences in a single left-to-right pass.
/// Matching is case-sensitive; an `&` that starts no known sequence is
/// copied verbatim. Output length never exceeds input length.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, replacement)) => {
                out.push(*replacement);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Percent-encode status text for the update endpoint.
///
/// Every byte becomes `%xx` (lowercase hex) except the space character,
/// which becomes `+`. The reference server expects this maximal encoding,
/// including bytes like `/` and `:` that a minimal encoder would pass
/// through.
pub fn encode_for_url(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        if byte == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_entities() {
        assert_eq!(
            decode_entities("a&amp;b&nbsp;c&quot;d&lt;e&gt;f"),
            "a&b c\"d<e>f"
        );
    }

    #[test]
    fn test_decode_unknown_entity_copied_verbatim() {
        assert_eq!(decode_entities("fish &chips; &copy;"), "fish &chips; &copy;");
    }

    #[test]
    fn test_decode_bare_trailing_ampersand() {
        assert_eq!(decode_entities("a&"), "a&");
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        assert_eq!(decode_entities("&AMP;&Lt;"), "&AMP;&Lt;");
    }

    #[test]
    fn test_decode_idempotent_without_entities() {
        let inputs = ["", "plain text", "50% + 50%", "ünïcödé @handle"];
        for s in inputs {
            assert_eq!(decode_entities(s), s);
            assert_eq!(decode_entities(&decode_entities(s)), decode_entities(s));
        }
    }

    #[test]
    fn test_decode_never_grows() {
        let inputs = ["&amp;&amp;", "&lt;html&gt;", "nothing here", "&&&"];
        for s in inputs {
            assert!(decode_entities(s).len() <= s.len());
        }
    }

    #[test]
    fn test_encode_space_becomes_plus() {
        assert_eq!(encode_for_url("a b"), "%61+%62");
    }

    #[test]
    fn test_encode_is_maximal() {
        // Even URL-safe characters are escaped.
        assert_eq!(encode_for_url("/:"), "%2f%3a");
    }

    #[test]
    fn test_encode_multibyte_utf8() {
        assert_eq!(encode_for_url("é"), "%c3%a9");
    }

    #[test]
    fn test_encode_output_alphabet() {
        let encoded = encode_for_url("Hello, world! 100% of /paths?q=1");
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c) || c == '%' || c == '+'));
    }
}
