//! Placeholder responses used whenever image generation degrades.

use crate::models::ImageResponse;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PLACEHOLDER_BASE_URL: &str = "https://placehold.co/800x500";

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Why the handler served a placeholder instead of generated pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// No provider API key configured.
    ConfigurationMissing,
    /// Provider answered without any usable image entries.
    UpstreamEmptyResult,
    /// Provider call, decode or file write failed.
    UpstreamFailure,
}

impl Fallback {
    pub fn note(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "fallback - no API key",
            Self::UpstreamEmptyResult => "fallback - no images returned",
            Self::UpstreamFailure => "fallback due to upstream error (check backend logs)",
        }
    }

    pub fn response(self, prompt: &str) -> ImageResponse {
        ImageResponse {
            image_url: placeholder_url(prompt),
            note: Some(self.note().to_string()),
        }
    }
}

pub fn placeholder_url(prompt: &str) -> String {
    format!(
        "{}?text={}",
        PLACEHOLDER_BASE_URL,
        utf8_percent_encode(prompt, URI_COMPONENT)
    )
}
