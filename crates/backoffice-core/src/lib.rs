//! Core types and utilities for the backoffice console
//!
//! Shared ground for the client, panel and export crates: the generic
//! [`Resource`] record model, per-entity [`EntitySchema`] descriptors,
//! configuration loading, the common error type and calendar helpers.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod schema;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use schema::{EntitySchema, RouteSet, SubRecordSpec};
pub use types::{FieldValue, Resource, ResourceId};

/// Initialize the logging system
///
/// # Errors
///
/// Returns an error if the logging system cannot be initialized.
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| Error::Configuration {
            message: e.to_string(),
        })
}
