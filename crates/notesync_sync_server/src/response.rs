//! Transport-neutral responses.

use crate::error::ServerError;
use notesync_sync_protocol::{encode, ErrorBody};
use serde::Serialize;

/// A status code and JSON body, ready for any HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The content type of every body.
    pub const CONTENT_TYPE: &'static str = "application/json";

    /// Builds a 200 response from a message.
    pub fn ok<T: Serialize>(message: &T) -> Self {
        match encode(message) {
            Ok(body) => Self { status: 200, body },
            Err(err) => {
                tracing::error!(error = %err, "Failed to encode response");
                Self::error(&ServerError::Protocol(err))
            }
        }
    }

    /// Builds an error response carrying `{"error", "kind"}`.
    pub fn error(err: &ServerError) -> Self {
        let body = ErrorBody::new(err.kind().as_str(), err.to_string());
        Self {
            status: err.status_code(),
            body: encode(&body).unwrap_or_default(),
        }
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text.
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_shape() {
        let response = HttpResponse::error(&ServerError::WorkspaceNotFound(5));
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["error"], "workspace 5 not found");
    }

    #[test]
    fn ok_response() {
        let response = HttpResponse::ok(&ErrorBody::new("k", "e"));
        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert!(response.body_str().contains("\"kind\":\"k\""));
    }
}
