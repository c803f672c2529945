//! Outbound payloads and the JSON-vs-multipart encoding strategy

use backoffice_core::FieldValue;
use indexmap::IndexMap;
use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, ClientResult};

/// A binary upload attached to a payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form field the file is appended under
    pub field: String,

    /// Original file name
    pub file_name: String,

    /// MIME type, e.g. `image/png`
    pub mime_type: String,

    /// Raw file content
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create an attachment
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// How a payload goes onto the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Structured JSON object
    Json,
    /// multipart/form-data with each field appended by name
    Multipart,
}

/// An outbound create/update body: named fields plus optional uploads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Named fields, submission order preserved
    pub fields: IndexMap<String, FieldValue>,

    /// File uploads
    pub attachments: Vec<Attachment>,
}

impl Payload {
    /// Create an empty payload
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style attachment
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The encoding this payload must use
    ///
    /// Any attachment forces multipart; a payload of plain fields is JSON.
    /// This is the one place the choice is made.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        if self.attachments.is_empty() {
            Encoding::Json
        } else {
            Encoding::Multipart
        }
    }

    /// Render the fields as a JSON object
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                .collect(),
        )
    }

    /// Render the payload as a multipart form
    ///
    /// Scalar fields become text parts carrying their display value; list
    /// and record fields are JSON-encoded into a single text part, the way
    /// the backend expects sub-record lists next to binary parts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if a structured field cannot be
    /// JSON-encoded.
    pub fn to_multipart(&self) -> ClientResult<Form> {
        let mut form = Form::new();

        for (name, value) in &self.fields {
            let text = match value {
                FieldValue::Items(_) | FieldValue::Record(_) => serde_json::to_string(value)
                    .map_err(|e| ClientError::decode(e.to_string()))?,
                other => other.display_value(),
            };
            form = form.text(name.clone(), text);
        }

        for attachment in &self.attachments {
            form = form.part(attachment.field.clone(), attachment_part(attachment));
        }

        Ok(form)
    }
}

fn attachment_part(attachment: &Attachment) -> Part {
    let part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
    match part.mime_str(&attachment.mime_type) {
        Ok(part) => part,
        // An unparsable MIME string degrades to an untyped part.
        Err(_) => Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone()),
    }
}
