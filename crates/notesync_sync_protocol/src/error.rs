//! Error types for the sync protocol.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The body was not valid JSON for the expected message.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body was empty.
    #[error("empty request body")]
    EmptyBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(ProtocolError::EmptyBody.to_string(), "empty request body");
        let err: ProtocolError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("malformed message"));
    }
}
