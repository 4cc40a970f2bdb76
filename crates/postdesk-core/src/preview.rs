//! Data-URL encoding for image previews.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode bytes as a `data:` URL.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mut url = String::from("data:");

    url.push_str(mime_type);
    url.push_str(";base64,");
    url.push_str(&STANDARD.encode(bytes));

    url
}
