//! Add/edit form session: draft state and modal lifecycle
//!
//! One controller per page manages the add/edit modal. The draft is the
//! only mutable working copy; it is created fresh per session, discarded on
//! cancel, and kept intact when a submit fails so the operator can retry.

use backoffice_client::{Attachment, Payload};
use backoffice_core::{EntitySchema, Error, FieldValue, Resource, ResourceId, Result};
use indexmap::IndexMap;
use tracing::debug;

use crate::list::{ResourceListController, UpdatePolicy};

/// What an open form session will do on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Creating a new record
    Create,

    /// Editing an existing record
    Edit {
        /// Identifier of the record being edited
        id: ResourceId,
    },
}

/// The working copy of a record being created or edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    /// Named scalar fields
    pub fields: IndexMap<String, FieldValue>,

    /// File uploads; always start unset, even when editing
    pub attachments: Vec<Attachment>,

    /// Sub-record entries (blog sections and the like)
    pub sub_records: Vec<IndexMap<String, FieldValue>>,
}

#[derive(Debug, Clone)]
struct OpenForm {
    mode: FormMode,
    draft: Draft,
}

/// Modal form controller for one entity kind
#[derive(Debug, Clone)]
pub struct FormSessionController {
    schema: EntitySchema,
    form: Option<OpenForm>,
}

impl FormSessionController {
    /// Create a closed controller for an entity kind
    #[must_use]
    pub const fn new(schema: EntitySchema) -> Self {
        Self { schema, form: None }
    }

    /// Whether a form session is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.form.is_some()
    }

    /// The open session's mode
    #[must_use]
    pub fn mode(&self) -> Option<&FormMode> {
        self.form.as_ref().map(|form| &form.mode)
    }

    /// The open session's draft
    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.form.as_ref().map(|form| &form.draft)
    }

    /// Open (or reopen) the form with an empty draft in Create mode
    ///
    /// Entity kinds that require at least one sub-record start with a single
    /// default entry.
    pub fn open_for_create(&mut self) {
        self.form = Some(OpenForm {
            mode: FormMode::Create,
            draft: self.default_draft(),
        });
    }

    /// Open (or reopen) the form seeded from an existing record
    ///
    /// File fields are never seeded: replacing an upload means supplying it
    /// again.
    pub fn open_for_edit(&mut self, resource: &Resource) {
        let sub_record_field = self
            .schema
            .sub_records
            .as_ref()
            .map(|spec| spec.field.clone());

        let fields = resource
            .fields
            .iter()
            .filter(|(name, _)| {
                !self.schema.file_fields.contains(name)
                    && Some(name.as_str()) != sub_record_field.as_deref()
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let mut sub_records = sub_record_field
            .as_deref()
            .and_then(|field| resource.field(field))
            .and_then(FieldValue::as_items)
            .map(seed_sub_records)
            .unwrap_or_default();

        if let Some(spec) = &self.schema.sub_records
            && spec.require_one
            && sub_records.is_empty()
        {
            sub_records.push(spec.default_entry.clone());
        }

        self.form = Some(OpenForm {
            mode: FormMode::Edit {
                id: resource.id.clone(),
            },
            draft: Draft {
                fields,
                attachments: Vec::new(),
                sub_records,
            },
        });
    }

    /// Set one draft field; ignored while the form is closed
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        if let Some(form) = &mut self.form {
            form.draft.fields.insert(name.into(), value.into());
        }
    }

    /// Attach (or replace) a file upload; ignored while the form is closed
    pub fn set_file_field(&mut self, attachment: Attachment) {
        if let Some(form) = &mut self.form {
            form.draft
                .attachments
                .retain(|existing| existing.field != attachment.field);
            form.draft.attachments.push(attachment);
        }
    }

    /// Append a default sub-record entry
    ///
    /// A no-op while closed or for kinds without a sub-record list.
    pub fn add_sub_record(&mut self) {
        let Some(spec) = &self.schema.sub_records else {
            return;
        };
        if let Some(form) = &mut self.form {
            form.draft.sub_records.push(spec.default_entry.clone());
        }
    }

    /// Set one field of one sub-record entry; out-of-range is a no-op
    pub fn set_sub_record_field(
        &mut self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) {
        if let Some(form) = &mut self.form
            && let Some(entry) = form.draft.sub_records.get_mut(index)
        {
            entry.insert(name.into(), value.into());
        }
    }

    /// Remove a sub-record entry
    ///
    /// Out-of-range is a no-op. For kinds that require at least one entry,
    /// removing the last one is also a no-op.
    pub fn remove_sub_record(&mut self, index: usize) {
        let require_one = self
            .schema
            .sub_records
            .as_ref()
            .is_some_and(|spec| spec.require_one);

        if let Some(form) = &mut self.form {
            if index >= form.draft.sub_records.len() {
                return;
            }
            if require_one && form.draft.sub_records.len() <= 1 {
                return;
            }
            form.draft.sub_records.remove(index);
        }
    }

    /// Submit the open session through the list controller
    ///
    /// On success the form closes and the draft is discarded; the next
    /// [`Self::open_for_create`] starts from the default shape again. On
    /// failure the form stays open with the draft intact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no form is open, otherwise surfaces
    /// the list controller's failure.
    pub async fn submit(&mut self, list: &mut ResourceListController) -> Result<()> {
        let (mode, payload) = {
            let Some(form) = &self.form else {
                return Err(Error::Validation {
                    field: "form".to_string(),
                    message: "no form session is open".to_string(),
                });
            };
            (form.mode.clone(), self.build_payload(&form.draft))
        };

        match &mode {
            FormMode::Create => list.submit_create(&payload).await?,
            FormMode::Edit { id } => {
                list.submit_update(id, &payload, UpdatePolicy::Reload)
                    .await?;
            }
        }

        debug!(entity = %self.schema.name, ?mode, "form submitted");
        self.form = None;
        Ok(())
    }

    /// Close the form and discard the draft unconditionally
    pub fn cancel(&mut self) {
        self.form = None;
    }

    fn default_draft(&self) -> Draft {
        let sub_records = self
            .schema
            .sub_records
            .as_ref()
            .filter(|spec| spec.require_one)
            .map(|spec| vec![spec.default_entry.clone()])
            .unwrap_or_default();

        Draft {
            fields: IndexMap::new(),
            attachments: Vec::new(),
            sub_records,
        }
    }

    fn build_payload(&self, draft: &Draft) -> Payload {
        let mut payload = Payload {
            fields: draft.fields.clone(),
            attachments: draft.attachments.clone(),
        };

        if let Some(spec) = &self.schema.sub_records
            && (!draft.sub_records.is_empty() || spec.require_one)
        {
            let entries = draft
                .sub_records
                .iter()
                .map(|entry| FieldValue::Record(entry.clone()))
                .collect();
            payload
                .fields
                .insert(spec.field.clone(), FieldValue::Items(entries));
        }

        payload
    }
}

fn seed_sub_records(items: &[FieldValue]) -> Vec<IndexMap<String, FieldValue>> {
    items
        .iter()
        .map(|entry| match entry {
            FieldValue::Record(members) => members.clone(),
            scalar => [("value".to_string(), scalar.clone())].into_iter().collect(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use backoffice_client::MockBackend;
    use backoffice_core::EntitySchema;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn blog_resource() -> Resource {
        Resource::new("b1")
            .with_field("mainTitle", "Existing post")
            .with_field("shortDescription", "Short")
            .with_field("image", "uploads/old-cover.png")
            .with_field(
                "sections",
                FieldValue::Items(vec![FieldValue::Record(
                    [
                        ("title".to_string(), FieldValue::Text("Intro".into())),
                        ("content".to_string(), FieldValue::Text("Hello".into())),
                    ]
                    .into_iter()
                    .collect(),
                )]),
            )
    }

    #[test]
    fn test_open_for_create_has_the_default_shape() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        assert!(!form.is_open());

        form.open_for_create();
        assert!(form.is_open());
        assert_eq!(form.mode(), Some(&FormMode::Create));

        let draft = form.draft().unwrap();
        assert!(draft.fields.is_empty());
        assert!(draft.attachments.is_empty());
        // Blogs always carry at least one (empty) section.
        assert_eq!(draft.sub_records.len(), 1);
        assert_eq!(
            draft.sub_records[0].get("title"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_open_for_edit_seeds_fields_but_not_files() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        form.open_for_edit(&blog_resource());

        assert_eq!(form.mode(), Some(&FormMode::Edit { id: "b1".into() }));
        let draft = form.draft().unwrap();
        assert_eq!(
            draft.fields.get("mainTitle"),
            Some(&FieldValue::Text("Existing post".into()))
        );
        // The stored image URL must not leak into the draft.
        assert!(draft.fields.get("image").is_none());
        assert!(draft.attachments.is_empty());
        // Sections seed from the record.
        assert_eq!(draft.sub_records.len(), 1);
        assert_eq!(
            draft.sub_records[0].get("title"),
            Some(&FieldValue::Text("Intro".into()))
        );
    }

    #[test]
    fn test_set_field_is_ignored_while_closed() {
        let mut form = FormSessionController::new(EntitySchema::orders());
        form.set_field("customerName", "Asha");
        assert!(form.draft().is_none());
    }

    #[test]
    fn test_set_file_field_replaces_the_same_field() {
        let mut form = FormSessionController::new(EntitySchema::testimonials());
        form.open_for_create();

        form.set_file_field(Attachment::new("image", "first.png", "image/png", vec![1]));
        form.set_file_field(Attachment::new("image", "second.png", "image/png", vec![2]));

        let draft = form.draft().unwrap();
        assert_eq!(draft.attachments.len(), 1);
        assert_eq!(draft.attachments[0].file_name, "second.png");
    }

    #[test]
    fn test_sub_record_editing() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        form.open_for_create();

        form.set_sub_record_field(0, "title", "First section");
        form.add_sub_record();
        form.set_sub_record_field(1, "title", "Second section");

        let draft = form.draft().unwrap();
        assert_eq!(draft.sub_records.len(), 2);
        assert_eq!(
            draft.sub_records[0].get("title"),
            Some(&FieldValue::Text("First section".into()))
        );
        assert_eq!(
            draft.sub_records[1].get("title"),
            Some(&FieldValue::Text("Second section".into()))
        );

        form.remove_sub_record(0);
        let draft = form.draft().unwrap();
        assert_eq!(draft.sub_records.len(), 1);
        assert_eq!(
            draft.sub_records[0].get("title"),
            Some(&FieldValue::Text("Second section".into()))
        );
    }

    #[test]
    fn test_remove_sub_record_out_of_range_is_a_noop() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        form.open_for_create();

        form.remove_sub_record(5);
        assert_eq!(form.draft().unwrap().sub_records.len(), 1);
    }

    #[test]
    fn test_remove_last_required_sub_record_is_a_noop() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        form.open_for_create();

        form.remove_sub_record(0);
        assert_eq!(form.draft().unwrap().sub_records.len(), 1);
    }

    #[test]
    fn test_set_sub_record_field_out_of_range_is_a_noop() {
        let mut form = FormSessionController::new(EntitySchema::blogs());
        form.open_for_create();
        form.set_sub_record_field(7, "title", "ghost");
        assert_eq!(form.draft().unwrap().sub_records.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_create_closes_and_resets() {
        let backend = Arc::new(MockBackend::new(EntitySchema::blogs()));
        let mut list = ResourceListController::new(backend.clone());
        let mut form = FormSessionController::new(EntitySchema::blogs());

        form.open_for_create();
        form.set_field("mainTitle", "New post");
        form.set_sub_record_field(0, "title", "Section one");
        form.add_sub_record();

        form.submit(&mut list).await.unwrap();
        assert!(!form.is_open());

        // The payload carried the sections as a list field.
        let creates = backend.recorded_creates();
        assert_eq!(creates.len(), 1);
        let sections = creates[0].fields.get("sections").unwrap();
        assert_eq!(sections.as_items().map(<[FieldValue]>::len), Some(2));

        // Reopening starts from the default shape again.
        form.open_for_create();
        let draft = form.draft().unwrap();
        assert!(draft.fields.is_empty());
        assert_eq!(draft.sub_records.len(), 1);
        assert_eq!(
            draft.sub_records[0].get("title"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[tokio::test]
    async fn test_submit_edit_uses_the_reload_policy() {
        let backend = Arc::new(
            MockBackend::new(EntitySchema::blogs()).with_resources(vec![blog_resource()]),
        );
        let mut list = ResourceListController::new(backend.clone());
        list.refresh().await.unwrap();

        let mut form = FormSessionController::new(EntitySchema::blogs());
        let seed = list.find("b1").unwrap().clone();
        form.open_for_edit(&seed);
        form.set_field("mainTitle", "Renamed post");

        form.submit(&mut list).await.unwrap();
        assert!(!form.is_open());

        assert_eq!(backend.recorded_updates().len(), 1);
        assert_eq!(
            list.find("b1").unwrap().text("mainTitle"),
            Some("Renamed post")
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_the_form_open_with_the_draft() {
        let backend = Arc::new(MockBackend::new(EntitySchema::blogs()).with_failure("offline"));
        let mut list = ResourceListController::new(backend);
        let mut form = FormSessionController::new(EntitySchema::blogs());

        form.open_for_create();
        form.set_field("mainTitle", "Doomed post");
        form.set_file_field(Attachment::new("image", "cover.png", "image/png", vec![1]));

        assert!(form.submit(&mut list).await.is_err());

        // Still open, draft intact, ready for a retry.
        assert!(form.is_open());
        let draft = form.draft().unwrap();
        assert_eq!(
            draft.fields.get("mainTitle"),
            Some(&FieldValue::Text("Doomed post".into()))
        );
        assert_eq!(draft.attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_without_an_open_form_is_an_error() {
        let backend = Arc::new(MockBackend::new(EntitySchema::orders()));
        let mut list = ResourceListController::new(backend);
        let mut form = FormSessionController::new(EntitySchema::orders());

        assert!(matches!(
            form.submit(&mut list).await,
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_cancel_discards_the_draft() {
        let mut form = FormSessionController::new(EntitySchema::orders());
        form.open_for_create();
        form.set_field("customerName", "Asha");

        form.cancel();
        assert!(!form.is_open());
        assert!(form.draft().is_none());
    }

    #[test]
    fn test_scalar_sub_record_entries_seed_under_a_value_key() {
        let mut form = FormSessionController::new(EntitySchema::leads());
        let lead = Resource::new("l1").with_field(
            "followUp",
            FieldValue::Items(vec![FieldValue::Text("called client".into())]),
        );
        form.open_for_edit(&lead);

        let draft = form.draft().unwrap();
        assert_eq!(draft.sub_records.len(), 1);
        assert_eq!(
            draft.sub_records[0].get("value"),
            Some(&FieldValue::Text("called client".into()))
        );
    }
}
