//! Error types for the HTTP boundary

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the remote collaborators
///
/// Exactly three failure kinds cross this boundary: the transport failed
/// before any response arrived, the server answered with a non-success
/// status, or the body could not be decoded. Nothing here retries.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request failed before a response was received
    #[error("request failed without a response: {message}")]
    Network {
        /// Transport error message
        message: String,
    },

    /// Server answered with a non-success status
    #[error("server returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body could not be decoded
    #[error("failed to decode response body: {message}")]
    Decode {
        /// Decode error message
        message: String,
    },
}

impl ClientError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify a transport-level error from the HTTP stack
    ///
    /// Body-decoding failures reported by the stack count as [`Self::Decode`];
    /// everything else that produced no usable response is [`Self::Network`].
    #[must_use]
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_decode() || err.is_body() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::classify(&err)
    }
}

// Conversion into the core error type
impl From<ClientError> for backoffice_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network { message } => Self::Network { message },
            ClientError::Http { status, body } => Self::Http { status, body },
            ClientError::Decode { message } => Self::Decode { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_creation() {
        let err = ClientError::network("connection refused");
        assert!(matches!(err, ClientError::Network { .. }));

        let err = ClientError::http(404, "{\"error\":\"missing\"}");
        assert!(matches!(err, ClientError::Http { status: 404, .. }));

        let err = ClientError::decode("expected an array");
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::http(500, "boom");
        assert_eq!(err.to_string(), "server returned HTTP 500: boom");

        let err = ClientError::network("dns failure");
        assert_eq!(
            err.to_string(),
            "request failed without a response: dns failure"
        );
    }

    #[test]
    fn test_conversion_into_core_error() {
        let core: backoffice_core::Error = ClientError::http(401, "denied").into();
        assert!(matches!(
            core,
            backoffice_core::Error::Http { status: 401, .. }
        ));

        let core: backoffice_core::Error = ClientError::network("offline").into();
        assert!(matches!(core, backoffice_core::Error::Network { .. }));

        let core: backoffice_core::Error = ClientError::decode("bad body").into();
        assert!(matches!(core, backoffice_core::Error::Decode { .. }));
    }
}
