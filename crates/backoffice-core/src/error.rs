//! Error types for the backoffice console

use std::{error::Error as StdError, fmt};

/// Main error type for the backoffice console
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Transport failure before any response was received
    Network {
        /// Error message
        message: String,
    },

    /// Non-success HTTP response from a remote collaborator
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body could not be decoded
    Decode {
        /// Error message
        message: String,
    },

    /// Authentication failure surfaced to the login form
    Authentication(String),

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Network { message } => write!(f, "Network error: {message}"),
            Self::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Decode { message } => write!(f, "Decode error: {message}"),
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        match app_error {
            Error::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }

        assert!(format!("{}", app_error).contains("I/O error"));
    }

    #[test]
    fn test_configuration_error() {
        let error = Error::Configuration {
            message: "Missing API base URL".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing API base URL"
        );
    }

    #[test]
    fn test_network_error() {
        let error = Error::Network {
            message: "connection refused".to_string(),
        };

        assert_eq!(format!("{}", error), "Network error: connection refused");
    }

    #[test]
    fn test_http_error() {
        let error = Error::Http {
            status: 404,
            body: "{\"error\":\"not found\"}".to_string(),
        };

        assert_eq!(format!("{}", error), "HTTP 404: {\"error\":\"not found\"}");
    }

    #[test]
    fn test_decode_error() {
        let error = Error::Decode {
            message: "expected an array".to_string(),
        };

        assert_eq!(format!("{}", error), "Decode error: expected an array");
    }

    #[test]
    fn test_authentication_error() {
        let error = Error::Authentication("Invalid password".to_string());
        assert_eq!(
            format!("{}", error),
            "Authentication failed: Invalid password"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = Error::Validation {
            field: "customerName".to_string(),
            message: "Field is required".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Validation error: customerName - Field is required"
        );
    }

    #[test]
    fn test_not_found_error() {
        let error = Error::NotFound {
            resource: "order 42".to_string(),
        };

        assert_eq!(format!("{}", error), "Resource not found: order 42");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_str = r#"{"invalid": json}"#;
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let app_error = Error::from(json_error);

        match app_error {
            Error::Serialization(_) => {}
            _ => panic!("Expected Serialization error variant"),
        }

        assert!(format!("{}", app_error).contains("Serialization error"));
    }

    #[test]
    fn test_other_error() {
        let error = Error::Other("Unexpected error occurred".to_string());
        assert_eq!(format!("{}", error), "Unexpected error occurred");
    }

    #[test]
    fn test_error_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let app_error = Error::from(io_error);

        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_error_source_for_leaf_errors() {
        let error = Error::Configuration {
            message: "test".to_string(),
        };
        assert!(error.source().is_none());

        let error = Error::Authentication("test".to_string());
        assert!(error.source().is_none());

        let error = Error::Http {
            status: 500,
            body: "test".to_string(),
        };
        assert!(error.source().is_none());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        fn returns_error() -> Result<String> {
            Err(Error::Other("test error".to_string()))
        }

        assert!(returns_result().is_ok());
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_all_error_display_variants() {
        let test_cases = vec![
            (Error::Io(io::Error::other("test")), "I/O error:"),
            (
                Error::Configuration {
                    message: "config error".to_string(),
                },
                "Configuration error: config error",
            ),
            (
                Error::Network {
                    message: "dns failure".to_string(),
                },
                "Network error: dns failure",
            ),
            (
                Error::Http {
                    status: 503,
                    body: "unavailable".to_string(),
                },
                "HTTP 503: unavailable",
            ),
            (
                Error::Decode {
                    message: "bad body".to_string(),
                },
                "Decode error: bad body",
            ),
            (
                Error::Authentication("auth error".to_string()),
                "Authentication failed: auth error",
            ),
            (
                Error::Validation {
                    field: "field1".to_string(),
                    message: "invalid".to_string(),
                },
                "Validation error: field1 - invalid",
            ),
            (
                Error::NotFound {
                    resource: "lead 9".to_string(),
                },
                "Resource not found: lead 9",
            ),
            (Error::Other("other error".to_string()), "other error"),
        ];

        for (error, expected_contains) in test_cases {
            let display_str = format!("{}", error);
            assert!(
                display_str.contains(expected_contains),
                "Error display '{}' should contain '{}'",
                display_str,
                expected_contains
            );
        }
    }
}
