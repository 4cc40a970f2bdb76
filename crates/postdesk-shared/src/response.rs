//! Plain message responses used by the posts API for updates and errors.

use serde::{Deserialize, Serialize};

/// `{ "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extract the message from an error body, falling back to the raw text.
    pub fn from_error_body(body: &str) -> String {
        match serde_json::from_str::<MessageResponse>(body) {
            Ok(response) => response.message,
            Err(_) if body.trim().is_empty() => "no response body".to_string(),
            Err(_) => body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            MessageResponse::from_error_body(r#"{"message":"Post not found!"}"#),
            "Post not found!"
        );
        assert_eq!(MessageResponse::from_error_body("Bad Gateway"), "Bad Gateway");
        assert_eq!(MessageResponse::from_error_body(""), "no response body");
    }
}
