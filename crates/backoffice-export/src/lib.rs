//! Invoice export for the backoffice console
//!
//! Builds the printable invoice model from a completed order record and
//! hands it to a rendering collaborator. The remaining-balance rule lives
//! here; the actual PDF engine stays behind the [`InvoiceRenderer`] trait.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

pub mod error;
pub mod invoice;

pub use error::{ExportError, ExportResult};
pub use invoice::{
    format_amount, remaining_balance, write_invoice, InvoiceDocument, InvoiceRenderer,
    PaymentStatus, TextRenderer, DEFAULT_MESSAGE, FOOTER, LETTERHEAD,
};
