// SPDX-License-Identifier: MPL-2.0
//! `data:` URL encoding for images sent to the caption service.
//!
//! Format: `data:<media type>;base64,<payload>`.

use crate::config::DEFAULT_IMAGE_MEDIA_TYPE;
use base64::{engine::general_purpose, Engine as _};

const IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// Encodes image bytes as a `data:` URL.
#[must_use]
pub fn encode(media_type: &str, bytes: &[u8]) -> String {
    let payload = general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type}{BASE64_MARKER}{payload}")
}

/// Media type and base64 payload of an image `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlParts<'a> {
    pub media_type: String,
    pub payload: &'a str,
}

/// Splits an image `data:` URL into media type and payload.
///
/// Only `data:image/<word>;base64,` is recognised as a prefix, where `<word>`
/// is one or more ASCII letters, digits or underscores. Anything else keeps the
/// whole input as payload and reports [`DEFAULT_IMAGE_MEDIA_TYPE`].
#[must_use]
pub fn split(url: &str) -> DataUrlParts<'_> {
    match split_prefix(url) {
        Some((subtype, payload)) => DataUrlParts {
            media_type: format!("image/{subtype}"),
            payload,
        },
        None => DataUrlParts {
            media_type: DEFAULT_IMAGE_MEDIA_TYPE.to_string(),
            payload: url,
        },
    }
}

fn split_prefix(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix(IMAGE_PREFIX)?;
    let word_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if word_len == 0 {
        return None;
    }
    let (subtype, rest) = rest.split_at(word_len);
    let payload = rest.strip_prefix(BASE64_MARKER)?;
    Some((subtype, payload))
}
