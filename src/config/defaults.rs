// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Upload**: Accepted media types and size ceiling
//! - **Crop**: Initial selection coverage and the free-form preset
//! - **Captions**: Caption count, fallback sentinel and generation settings
//! - **Server/Client**: Endpoint addresses and request timing

// ==========================================================================
// Upload Defaults
// ==========================================================================

/// Media types accepted by the upload surface.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Maximum accepted file size in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

// ==========================================================================
// Crop Defaults
// ==========================================================================

/// Share of the largest fitting rectangle covered by a preset selection (%).
pub const CROP_COVERAGE_PERCENT: f32 = 90.0;

/// Origin of the free-form selection on both axes (%).
pub const FREE_CROP_ORIGIN_PERCENT: f32 = 5.0;

/// Extent of the free-form selection on both axes (%).
pub const FREE_CROP_EXTENT_PERCENT: f32 = 90.0;

/// Smallest selection edge produced by interactive dragging (%).
pub const MIN_CROP_EXTENT_PERCENT: f32 = 1.0;

/// Handle hit radius for interactive dragging (%).
pub const CROP_HANDLE_RADIUS_PERCENT: f32 = 3.0;

// ==========================================================================
// Caption Defaults
// ==========================================================================

/// Number of captions requested from the generator.
pub const CAPTION_COUNT: usize = 5;

/// Caption returned when nothing could be recovered from a completion.
pub const FALLBACK_CAPTION: &str = "Could not generate captions. Please try again.";

/// Media type assumed when a data URL prefix can not be parsed.
pub const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Default generation backend base URL.
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Completion budget for one generation request.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Environment variable holding the generation API key.
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

// ==========================================================================
// Server / Client Defaults
// ==========================================================================

/// Default listen address of the caption endpoint.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default route of the caption endpoint.
pub const DEFAULT_CAPTION_ROUTE: &str = "/api/captions";

/// Default endpoint used by the caption client.
pub const DEFAULT_CAPTION_ENDPOINT: &str = "http://127.0.0.1:3000/api/captions";

/// Room for the JSON envelope, the tone and the data URL prefix (bytes).
pub const REQUEST_BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Largest request body the caption endpoint buffers: a base64 encoded
/// upload at the size ceiling plus the envelope.
pub const MAX_REQUEST_BODY_BYTES: usize =
    (MAX_UPLOAD_BYTES as usize).div_ceil(3) * 4 + REQUEST_BODY_OVERHEAD_BYTES;

/// Default client-side timeout for one generation request (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Delay before a pending request is reported as slow (seconds).
pub const DEFAULT_SLOW_NOTICE_SECS: u64 = 10;

/// Minimum client timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum client timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MAX_UPLOAD_BYTES > 0);
    assert!(MAX_REQUEST_BODY_BYTES > (MAX_UPLOAD_BYTES as usize) / 3 * 4 + 4);

    assert!(CROP_COVERAGE_PERCENT > 0.0);
    assert!(CROP_COVERAGE_PERCENT <= 100.0);
    assert!(FREE_CROP_ORIGIN_PERCENT + FREE_CROP_EXTENT_PERCENT <= 100.0);
    assert!(MIN_CROP_EXTENT_PERCENT > 0.0);

    assert!(CAPTION_COUNT > 0);
    assert!(DEFAULT_MAX_TOKENS > 0);

    assert!(MIN_REQUEST_TIMEOUT_SECS > 0);
    assert!(MAX_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS <= MAX_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_SLOW_NOTICE_SECS < DEFAULT_REQUEST_TIMEOUT_SECS);
};
