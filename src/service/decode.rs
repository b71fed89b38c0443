// SPDX-License-Identifier: MPL-2.0
//! Decoding of raw model completions into caption lists.
//!
//! Completions are asked to be a JSON array of strings but are not trusted to
//! be one. Decoding tries, in order:
//!
//! 1. The whole text as a JSON array of strings (non-empty)
//! 2. Every non-empty `"..."` substring, first [`CAPTION_COUNT`] kept
//! 3. A single [`FALLBACK_CAPTION`]

use crate::config::{CAPTION_COUNT, FALLBACK_CAPTION};

/// Which decoding step produced the captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTier {
    Strict,
    QuotedScan,
    Fallback,
}

/// Captions recovered from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub captions: Vec<String>,
    pub tier: DecodeTier,
}

/// Decodes a completion. Never fails and never returns an empty list.
#[must_use]
pub fn decode_captions(text: &str) -> Decoded {
    if let Ok(captions) = serde_json::from_str::<Vec<String>>(text) {
        if !captions.is_empty() {
            return Decoded {
                captions,
                tier: DecodeTier::Strict,
            };
        }
    }

    let quoted = quoted_substrings(text, CAPTION_COUNT);
    if !quoted.is_empty() {
        log::warn!(
            "Completion is not a JSON string array; recovered {} quoted captions",
            quoted.len()
        );
        return Decoded {
            captions: quoted,
            tier: DecodeTier::QuotedScan,
        };
    }

    log::warn!("Completion has no recoverable captions; using fallback");
    Decoded {
        captions: vec![FALLBACK_CAPTION.to_string()],
        tier: DecodeTier::Fallback,
    }
}

/// Collects up to `limit` non-empty runs enclosed in double quotes, scanning
/// left to right without overlap.
///
/// An empty pair `""` does not match; its closing quote may open the next run.
fn quoted_substrings(text: &str, limit: usize) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;

    while found.len() < limit {
        let Some(open) = rest.find('"') else { break };
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('"') else { break };

        if close == 0 {
            rest = after_open;
            continue;
        }

        found.push(after_open[..close].to_string());
        rest = &after_open[close + 1..];
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_array_is_used_as_is() {
        let decoded = decode_captions(r#"["A","B","C","D","E"]"#);
        assert_eq!(decoded.tier, DecodeTier::Strict);
        assert_eq!(decoded.captions, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn strict_array_keeps_escaped_quotes() {
        let decoded = decode_captions(r#"  ["He said \"no\"", "B"]  "#);
        assert_eq!(decoded.tier, DecodeTier::Strict);
        assert_eq!(decoded.captions[0], r#"He said "no""#);
    }

    #[test]
    fn prose_wrapped_list_is_recovered_by_scan() {
        let decoded = decode_captions(r#"Here: "A", "B", "C", "D", "E", "F""#);
        assert_eq!(decoded.tier, DecodeTier::QuotedScan);
        assert_eq!(decoded.captions, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn array_of_non_strings_falls_through() {
        let decoded = decode_captions(r#"[1, "two", 3]"#);
        assert_eq!(decoded.tier, DecodeTier::QuotedScan);
        assert_eq!(decoded.captions, vec!["two"]);
    }

    #[test]
    fn text_without_quotes_yields_fallback() {
        let decoded = decode_captions("I cannot caption this image.");
        assert_eq!(decoded.tier, DecodeTier::Fallback);
        assert_eq!(
            decoded.captions,
            vec!["Could not generate captions. Please try again."]
        );
    }

    #[test]
    fn empty_array_yields_fallback() {
        let decoded = decode_captions("[]");
        assert_eq!(decoded.tier, DecodeTier::Fallback);
        assert_eq!(decoded.captions.len(), 1);
    }

    #[test]
    fn empty_quotes_are_skipped() {
        assert_eq!(quoted_substrings(r#""" "x""#, 5), vec![" "]);
        assert_eq!(quoted_substrings(r#""""abc""#, 5), vec!["abc"]);
    }

    #[test]
    fn unterminated_quote_is_ignored() {
        assert_eq!(quoted_substrings(r#""A" and "B"#, 5), vec!["A"]);
    }

    #[test]
    fn scan_stops_at_limit() {
        assert_eq!(quoted_substrings(r#""a""b""c""#, 2), vec!["a", "b"]);
    }
}
