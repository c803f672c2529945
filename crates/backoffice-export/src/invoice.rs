//! Invoice document model and rendering seam
//!
//! Building the printable model from an order record is this crate's job;
//! turning the model into final bytes belongs to an [`InvoiceRenderer`]
//! implementation. The shipped [`TextRenderer`] produces the plain layout;
//! a PDF engine plugs in behind the same trait.

use backoffice_core::Resource;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ExportError, ExportResult};

/// Fixed letterhead, printed at the top of every invoice
pub const LETTERHEAD: [&str; 4] = [
    "Artisticify",
    "3rd Floor, 307 Amanora Chamber, Amanora Mall Hadapsar, Pune",
    "City - Pune, State Maharashtra, ZIP - 411028",
    "Phone: +91-9112452929 | Email: info@artisticify.com",
];

/// Fixed footer lines
pub const FOOTER: [&str; 2] = [
    "This is a system-generated invoice.",
    "For any queries, contact us at info@artisticify.com.",
];

/// Message printed when the order carries none of its own
pub const DEFAULT_MESSAGE: &str = "Thank you for your business!";

/// Outcome of the remaining-balance computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaymentStatus {
    /// The order is fully paid
    Completed,

    /// An amount is still outstanding
    Remaining(f64),
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "Payment Completed"),
            Self::Remaining(amount) => {
                write!(f, "Remaining Amount: {}", format_amount(*amount))
            }
        }
    }
}

/// Compute the payment status from the order amounts
#[must_use]
pub fn remaining_balance(total: f64, paid: f64) -> PaymentStatus {
    let remaining = total - paid;
    if remaining.abs() < f64::EPSILON {
        PaymentStatus::Completed
    } else {
        PaymentStatus::Remaining(remaining)
    }
}

/// Render an amount without a trailing fraction when it is whole
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract().abs() < f64::EPSILON {
        format!("{amount:.0}")
    } else {
        amount.to_string()
    }
}

/// The printable invoice model built from one completed order
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    /// Date printed on the invoice
    pub invoice_date: NaiveDate,

    /// Customer-facing order identifier
    pub order_id: String,

    /// Customer name
    pub customer_name: String,

    /// Customer email
    pub customer_email: String,

    /// Customer city
    pub city: String,

    /// Purchased service
    pub service: String,

    /// Purchased package
    pub package: String,

    /// Total order amount
    pub total_amount: f64,

    /// Amount already paid
    pub amount_paid: f64,

    /// Payment status line
    pub payment_status: PaymentStatus,

    /// Order's custom note, when present
    pub custom_note: Option<String>,

    /// Closing message
    pub message: String,
}

impl InvoiceDocument {
    /// Build the invoice model from an order record
    ///
    /// The customer name and both amounts are required; contact fields and
    /// the note degrade to empty. An absent amount is a
    /// [`ExportError::MissingField`] and a non-numeric one an
    /// [`ExportError::InvalidAmount`], never a silent zero.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn from_resource(order: &Resource, invoice_date: NaiveDate) -> ExportResult<Self> {
        let order_id = order
            .display_value("orderId")
            .unwrap_or_else(|| order.id.clone());

        let customer_name = order
            .display_value("customerName")
            .ok_or_else(|| ExportError::missing_field("customerName"))?;

        let total_amount = required_amount(order, "totalAmount")?;
        let amount_paid = required_amount(order, "amountPaid")?;

        Ok(Self {
            invoice_date,
            order_id,
            customer_name,
            customer_email: order.display_value("customerEmail").unwrap_or_default(),
            city: order.display_value("city").unwrap_or_default(),
            service: order.display_value("serviceSelected").unwrap_or_default(),
            package: order.display_value("packageSelected").unwrap_or_default(),
            total_amount,
            amount_paid,
            payment_status: remaining_balance(total_amount, amount_paid),
            custom_note: order.display_value("custom").filter(|note| !note.is_empty()),
            message: order
                .display_value("message")
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        })
    }

    /// Suggested download file name
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("Invoice-{}.pdf", self.order_id)
    }
}

fn required_amount(order: &Resource, field: &str) -> ExportResult<f64> {
    let value = order
        .field(field)
        .ok_or_else(|| ExportError::missing_field(field))?;
    value
        .as_number()
        .ok_or_else(|| ExportError::invalid_amount(field))
}

/// The rendering collaborator behind the download button
pub trait InvoiceRenderer: Send + Sync {
    /// Render the document into final bytes
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Render`] when the engine fails.
    fn render(&self, document: &InvoiceDocument) -> ExportResult<Vec<u8>>;

    /// Renderer name, for logs
    fn name(&self) -> &str;
}

/// Plain-text layout renderer
///
/// Mirrors the printed structure of the real document: letterhead, identity
/// block, one-row order table, payment status, notes and footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl InvoiceRenderer for TextRenderer {
    fn render(&self, document: &InvoiceDocument) -> ExportResult<Vec<u8>> {
        let separator = "-".repeat(52);
        let mut lines: Vec<String> = LETTERHEAD.iter().map(ToString::to_string).collect();
        lines.push(separator.clone());
        lines.push("Invoice".to_string());
        lines.push(format!(
            "Invoice Date: {}",
            document.invoice_date.format("%d/%m/%Y")
        ));
        lines.push(format!("Order ID: {}", document.order_id));
        lines.push(format!("Customer Name: {}", document.customer_name));
        lines.push(format!("Email: {}", document.customer_email));
        lines.push(format!("City: {}", document.city));
        lines.push(separator);
        lines.push("Order Details".to_string());
        lines.push("Service | Package | Total Amount | Amount Paid".to_string());
        lines.push(format!(
            "{} | {} | {} | {}",
            document.service,
            document.package,
            format_amount(document.total_amount),
            format_amount(document.amount_paid)
        ));
        lines.push(document.payment_status.to_string());
        if let Some(note) = &document.custom_note {
            lines.push(note.clone());
        }
        lines.push(document.message.clone());
        lines.extend(FOOTER.iter().map(ToString::to_string));

        Ok(lines.join("\n").into_bytes())
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// Render an invoice and write it under the given directory
///
/// # Errors
///
/// Surfaces renderer failures and I/O trouble.
pub fn write_invoice(
    dir: &Path,
    renderer: &dyn InvoiceRenderer,
    document: &InvoiceDocument,
) -> ExportResult<PathBuf> {
    let bytes = renderer.render(document)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(document.file_name());
    std::fs::write(&path, bytes)?;
    info!(
        renderer = renderer.name(),
        path = %path.display(),
        "invoice written"
    );
    Ok(path)
}
