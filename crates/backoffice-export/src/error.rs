//! Error types for invoice export

use thiserror::Error;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while building or rendering an invoice
#[derive(Error, Debug)]
pub enum ExportError {
    /// A field the invoice needs is absent from the order
    #[error("order is missing the {field} field")]
    MissingField {
        /// Field name
        field: String,
    },

    /// An amount field is present but not numeric
    #[error("order field {field} is not a numeric amount")]
    InvalidAmount {
        /// Field name
        field: String,
    },

    /// The renderer failed
    #[error("rendering failed: {message}")]
    Render {
        /// Renderer error message
        message: String,
    },

    /// I/O error while writing the document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Create a missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid-amount error
    pub fn invalid_amount(field: impl Into<String>) -> Self {
        Self::InvalidAmount {
            field: field.into(),
        }
    }

    /// Create a renderer error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

// Conversion into the core error type
impl From<ExportError> for backoffice_core::Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::MissingField { field } => Self::Validation {
                field,
                message: "missing field required for invoice export".to_string(),
            },
            ExportError::InvalidAmount { field } => Self::Validation {
                field,
                message: "amount is not numeric".to_string(),
            },
            ExportError::Render { message } => Self::Other(message),
            ExportError::Io(err) => Self::Io(err),
        }
    }
}
