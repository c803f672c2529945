//! In-memory collection backend for tests

use async_trait::async_trait;
use backoffice_core::{EntitySchema, FieldValue, Resource};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::collection::CollectionBackend;
use crate::error::{ClientError, ClientResult};
use crate::payload::Payload;

/// In-memory [`CollectionBackend`] with failure injection and call recording
///
/// Behaves like a tiny backend: `create` assigns identifiers and creation
/// timestamps, `update`/`patch` merge fields into the stored record, and
/// `delete` removes it. A configured failure makes every operation fail
/// with a network error, the way an unreachable backend would.
#[derive(Debug)]
pub struct MockBackend {
    schema: EntitySchema,
    resources: Arc<Mutex<Vec<Resource>>>,
    next_id: AtomicU64,
    failure: Arc<Mutex<Option<String>>>,
    created: Arc<Mutex<Vec<Payload>>>,
    updated: Arc<Mutex<Vec<(String, Payload)>>>,
    patched: Arc<Mutex<Vec<(String, Payload)>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBackend {
    /// Create an empty mock backend for an entity kind
    #[must_use]
    pub fn new(schema: EntitySchema) -> Self {
        Self {
            schema,
            resources: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
            failure: Arc::new(Mutex::new(None)),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
            patched: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed the backend with existing records
    #[must_use]
    pub fn with_resources(self, resources: Vec<Resource>) -> Self {
        *lock(&self.resources) = resources;
        self
    }

    /// Configure every operation to fail with a network error
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *lock(&self.failure) = Some(message.into());
        self
    }

    /// Start failing every operation from now on
    pub fn set_failure(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    /// Stop failing
    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    /// Snapshot of the stored records
    #[must_use]
    pub fn resources(&self) -> Vec<Resource> {
        lock(&self.resources).clone()
    }

    /// Payloads passed to `create`, in call order
    #[must_use]
    pub fn recorded_creates(&self) -> Vec<Payload> {
        lock(&self.created).clone()
    }

    /// `(id, payload)` pairs passed to `update`, in call order
    #[must_use]
    pub fn recorded_updates(&self) -> Vec<(String, Payload)> {
        lock(&self.updated).clone()
    }

    /// `(id, payload)` pairs passed to `patch`, in call order
    #[must_use]
    pub fn recorded_patches(&self) -> Vec<(String, Payload)> {
        lock(&self.patched).clone()
    }

    /// Identifiers passed to `delete`, in call order
    #[must_use]
    pub fn recorded_deletes(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    fn check_failure(&self) -> ClientResult<()> {
        lock(&self.failure)
            .as_ref()
            .map_or(Ok(()), |message| Err(ClientError::network(message.clone())))
    }

    fn apply_fields(resource: &mut Resource, payload: &Payload) {
        resource.merge_fields(&payload.fields);
        for attachment in &payload.attachments {
            // The real backend stores uploads and writes back a URL.
            resource.fields.insert(
                attachment.field.clone(),
                FieldValue::Text(format!("uploads/{}", attachment.file_name)),
            );
        }
    }

    fn merge_into(&self, id: &str, payload: &Payload) -> ClientResult<Value> {
        let mut resources = lock(&self.resources);
        let Some(resource) = resources.iter_mut().find(|r| r.id == id) else {
            return Err(ClientError::http(404, json!({"error": "not found"}).to_string()));
        };
        Self::apply_fields(resource, payload);
        let id_field = self.schema.id_field.clone();
        Ok(json!({ id_field: id }))
    }
}

#[async_trait]
impl CollectionBackend for MockBackend {
    async fn list(&self) -> ClientResult<Vec<Resource>> {
        self.check_failure()?;
        Ok(self.resources())
    }

    async fn create(&self, payload: &Payload) -> ClientResult<Value> {
        self.check_failure()?;
        lock(&self.created).push(payload.clone());

        let id = format!("mock-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut resource = Resource::new(id.clone()).with_created_at(Utc::now());
        Self::apply_fields(&mut resource, payload);
        lock(&self.resources).push(resource);

        let id_field = self.schema.id_field.clone();
        Ok(json!({ id_field: id }))
    }

    async fn update(&self, id: &str, payload: &Payload) -> ClientResult<Value> {
        self.check_failure()?;
        lock(&self.updated).push((id.to_string(), payload.clone()));
        self.merge_into(id, payload)
    }

    async fn patch(&self, id: &str, payload: &Payload) -> ClientResult<Value> {
        self.check_failure()?;
        lock(&self.patched).push((id.to_string(), payload.clone()));
        self.merge_into(id, payload)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.check_failure()?;
        lock(&self.deleted).push(id.to_string());

        let mut resources = lock(&self.resources);
        let before = resources.len();
        resources.retain(|r| r.id != id);
        if resources.len() == before {
            return Err(ClientError::http(404, json!({"error": "not found"}).to_string()));
        }
        Ok(())
    }

    fn schema(&self) -> &EntitySchema {
        &self.schema
    }
}
