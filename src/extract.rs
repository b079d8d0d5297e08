//! Response-shape tolerance for image provider payloads.
//!
//! Different SDK versions and the raw REST API place the same data under
//! different keys. Each lookup is an ordered list of JSON pointers; the first
//! pointer that resolves to a usable value wins.

use serde_json::Value;

/// Locations of the generated-images list, highest priority first.
pub const GENERATED_IMAGES_POINTERS: &[&str] = &[
    "/generatedImages",
    "/generated_images",
    "/generated",
    "/predictions",
];

/// Locations of base64 image bytes inside one generated entry.
pub const IMAGE_BYTES_POINTERS: &[&str] = &[
    "/image/imageBytes",
    "/image/b64_json",
    "/b64_json",
    "/base64",
    "/bytesBase64Encoded",
];

/// Returns the first array found at one of the list pointers.
///
/// A present but empty array still wins over lower-priority keys; callers
/// treat it as "no images returned".
pub fn generated_images(response: &Value) -> Option<&[Value]> {
    GENERATED_IMAGES_POINTERS
        .iter()
        .filter_map(|pointer| response.pointer(pointer))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
}

/// Returns the first non-empty base64 string stored in `entry`.
pub fn image_bytes(entry: &Value) -> Option<&str> {
    IMAGE_BYTES_POINTERS
        .iter()
        .filter_map(|pointer| entry.pointer(pointer))
        .filter_map(Value::as_str)
        .find(|b64| !b64.is_empty())
}
