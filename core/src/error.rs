//! Error types for the short link client.
//!
//! # Design
//! `RestError` is decided where the request is executed, not inferred later:
//! either the server answered with a non-2xx status, or the request went out
//! and nothing came back, or the request could never be issued. Everything a
//! caller can observe about a failed call fits exactly one of those shapes.

use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestError {
    /// The server answered with a non-success status.
    #[error("server rejected request with status {status}")]
    ServerRejection {
        status: u16,
        data: serde_json::Value,
    },

    /// The request was issued but no response arrived.
    #[error("no response: {reason}")]
    NoResponse { reason: String },

    /// The request was never issued (bad base URI, unbuildable request).
    #[error("{message}")]
    RequestConstruction { message: String },
}

impl RestError {
    pub fn rejection(status: u16, data: serde_json::Value) -> Self {
        RestError::ServerRejection { status, data }
    }

    pub fn no_response(reason: impl Into<String>) -> Self {
        RestError::NoResponse {
            reason: reason.into(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        RestError::RequestConstruction {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::ServerRejection { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A successful response whose body did not match the expected schema.
#[derive(Debug, Error)]
#[error("could not decode response body: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Errors from either issuing a call or decoding its result.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Rest(#[from] RestError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown deployment {0:?}, expected \"production\" or \"development\"")]
    UnknownDeployment(String),
    #[error("SLMS_TOKEN must be set to log in")]
    MissingToken,
    #[error("{var} is not a valid origin: {source}")]
    InvalidOrigin {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// The platform refused the copy command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not copy shortlink to clipboard.")]
pub struct ClipboardError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_error_message_is_fixed() {
        assert_eq!(ClipboardError.to_string(), "Could not copy shortlink to clipboard.");
    }

    #[test]
    fn status_only_for_rejections() {
        assert_eq!(RestError::rejection(401, serde_json::Value::Null).status(), Some(401));
        assert_eq!(RestError::no_response("reset").status(), None);
        assert_eq!(RestError::construction("bad url").status(), None);
    }
}
