//! Framing failures.
//!
//! A recoverable error means the bad frame was consumed and the channel is
//! still usable; adapters answer it with a parse error and keep reading.

use mcpgate_core::error::McpError;
use thiserror::Error;

/// Failure reading or writing a frame.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The byte stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound value could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The peer went away mid-frame.
    #[error("Connection closed")]
    ConnectionClosed,

    /// A frame exceeded the configured limit.
    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge {
        /// Bytes seen.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// A frame was not valid text.
    #[error("Invalid message: {message}")]
    InvalidMessage {
        /// What was wrong.
        message: String,
    },
}

impl TransportError {
    /// Shorthand for [`TransportError::InvalidMessage`].
    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    /// Whether the offending frame was consumed and the stream can keep going.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MessageTooLarge { .. } | Self::InvalidMessage { .. } | Self::Json(_)
        )
    }
}

impl From<TransportError> for McpError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Json(e) => Self::parse_with_source("Invalid JSON", e),
            e @ (TransportError::MessageTooLarge { .. } | TransportError::InvalidMessage { .. }) => {
                Self::parse(e.to_string())
            }
            other => Self::internal_with_source("Transport failure", other),
        }
    }
}
