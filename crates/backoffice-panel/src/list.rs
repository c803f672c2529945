//! Collection state synchronized with the remote backend
//!
//! One controller owns one entity kind's in-memory collection. Mutations go
//! through the backend first; the local collection is then reconciled either
//! by reloading or by patching in place, chosen per call. Failures leave the
//! prior collection visible and are never retried here.

use backoffice_client::{CollectionBackend, Payload};
use backoffice_core::{Error, FieldValue, Resource, Result};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Reconciliation policy for an update, chosen per call
///
/// Single-field edits patch locally to avoid a visible reload; multi-field
/// edits reload because the backend may recompute derived fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// PATCH the backend, then merge only the submitted fields locally
    PatchLocal,

    /// PUT the backend, then refetch the whole collection
    Reload,
}

/// Owner of one entity kind's collection
pub struct ResourceListController {
    backend: Arc<dyn CollectionBackend>,
    collection: Vec<Resource>,
}

impl std::fmt::Debug for ResourceListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceListController")
            .field("entity", &self.backend.schema().name)
            .field("records", &self.collection.len())
            .finish()
    }
}

impl ResourceListController {
    /// Create a controller over a backend, with an empty collection
    #[must_use]
    pub fn new(backend: Arc<dyn CollectionBackend>) -> Self {
        Self {
            backend,
            collection: Vec::new(),
        }
    }

    /// The current collection, in backend order
    #[must_use]
    pub fn collection(&self) -> &[Resource] {
        &self.collection
    }

    /// Look up a record by identifier
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Resource> {
        self.collection.iter().find(|resource| resource.id == id)
    }

    /// The backend this controller mutates through
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn CollectionBackend> {
        &self.backend
    }

    /// Refetch the collection, replacing it wholesale on success
    ///
    /// # Errors
    ///
    /// Surfaces the backend failure; the existing collection is left
    /// untouched in that case.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.backend.list().await {
            Ok(records) => {
                debug!(
                    entity = %self.backend.schema().name,
                    count = records.len(),
                    "collection refreshed"
                );
                self.collection = records;
                Ok(())
            }
            Err(err) => {
                error!(
                    entity = %self.backend.schema().name,
                    %err,
                    "refresh failed; keeping the previous collection"
                );
                Err(err.into())
            }
        }
    }

    /// Create a record, then reload the collection
    ///
    /// Reloading rather than splicing gives read-your-writes for fields the
    /// backend assigns (identifier, creation timestamp, computed amounts).
    ///
    /// # Errors
    ///
    /// Surfaces the backend failure from either the create or the reload.
    pub async fn submit_create(&mut self, payload: &Payload) -> Result<()> {
        self.backend.create(payload).await.map_err(|err| {
            error!(entity = %self.backend.schema().name, %err, "create failed");
            Error::from(err)
        })?;
        self.refresh().await
    }

    /// Update a record under the given reconciliation policy
    ///
    /// # Errors
    ///
    /// Surfaces the backend failure; the local record is only touched after
    /// the backend accepted the mutation.
    pub async fn submit_update(
        &mut self,
        id: &str,
        payload: &Payload,
        policy: UpdatePolicy,
    ) -> Result<()> {
        match policy {
            UpdatePolicy::PatchLocal => {
                self.backend.patch(id, payload).await.map_err(|err| {
                    error!(entity = %self.backend.schema().name, %err, "patch failed");
                    Error::from(err)
                })?;
                if let Some(resource) = self.collection.iter_mut().find(|r| r.id == id) {
                    resource.merge_fields(&payload.fields);
                } else {
                    warn!(
                        entity = %self.backend.schema().name,
                        id,
                        "patched a record that is not in the local collection"
                    );
                }
                Ok(())
            }
            UpdatePolicy::Reload => {
                self.backend.update(id, payload).await.map_err(|err| {
                    error!(entity = %self.backend.schema().name, %err, "update failed");
                    Error::from(err)
                })?;
                self.refresh().await
            }
        }
    }

    /// Append one entry to a record's list field (follow-up comments)
    ///
    /// The wire payload carries just the new entry; locally the entry is
    /// appended to the list without a refetch, and the next [`Self::refresh`]
    /// re-syncs with whatever the backend stored.
    ///
    /// # Errors
    ///
    /// Surfaces the backend failure; nothing is appended locally then.
    pub async fn submit_append(&mut self, id: &str, field: &str, value: FieldValue) -> Result<()> {
        let payload = Payload::new().with_field(field, value.clone());
        self.backend.patch(id, &payload).await.map_err(|err| {
            error!(entity = %self.backend.schema().name, %err, "append failed");
            Error::from(err)
        })?;
        if let Some(resource) = self.collection.iter_mut().find(|r| r.id == id) {
            resource.append_item(field, value);
        }
        Ok(())
    }

    /// Delete a record and drop it from the local collection
    ///
    /// The delete is authoritative, so no refetch follows.
    ///
    /// # Errors
    ///
    /// Surfaces the backend failure; the record stays visible then.
    pub async fn submit_delete(&mut self, id: &str) -> Result<()> {
        self.backend.delete(id).await.map_err(|err| {
            error!(entity = %self.backend.schema().name, %err, "delete failed");
            Error::from(err)
        })?;
        self.collection.retain(|resource| resource.id != id);
        Ok(())
    }
}
