//! HTTP client for the entity collection endpoints

use async_trait::async_trait;
use backoffice_core::{DashboardConfig, EntitySchema, Resource, RouteSet};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::payload::{Encoding, Payload};

/// The collection side of the remote backend, one instance per entity kind
///
/// [`RemoteCollectionClient`] is the real implementation; tests and
/// downstream crates can substitute [`crate::mock::MockBackend`].
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// Fetch the full collection, order as the backend returns it
    async fn list(&self) -> ClientResult<Vec<Resource>>;

    /// Create a record; the backend assigns the identifier
    async fn create(&self, payload: &Payload) -> ClientResult<Value>;

    /// Replace or extend a record wholesale (PUT)
    async fn update(&self, id: &str, payload: &Payload) -> ClientResult<Value>;

    /// Update single fields in place (PATCH)
    async fn patch(&self, id: &str, payload: &Payload) -> ClientResult<Value>;

    /// Delete a record
    async fn delete(&self, id: &str) -> ClientResult<()>;

    /// The entity schema this backend serves
    fn schema(&self) -> &EntitySchema;
}

/// HTTP implementation of [`CollectionBackend`] over one REST endpoint set
#[derive(Debug, Clone)]
pub struct RemoteCollectionClient {
    http: reqwest::Client,
    base_url: String,
    schema: EntitySchema,
}

impl RemoteCollectionClient {
    /// Create a client over an existing HTTP client
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, schema: EntitySchema) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            schema,
        }
    }

    /// Create a client from configuration, with the configured transport
    /// timeout
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client cannot be built.
    pub fn from_config(config: &DashboardConfig, schema: EntitySchema) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;
        Ok(Self::new(http, config.api.base_url.clone(), schema))
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route)
    }

    /// Send a request, enforce the status check, hand back the raw body
    async fn execute(&self, request: reqwest::RequestBuilder) -> ClientResult<String> {
        let response = request.send().await.map_err(|e| ClientError::classify(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(ClientError::from)?;

        if status.is_success() {
            Ok(body)
        } else {
            warn!(
                entity = %self.schema.name,
                status = status.as_u16(),
                "backend returned an error response"
            );
            Err(ClientError::http(status.as_u16(), body))
        }
    }

    fn send_payload(
        &self,
        request: reqwest::RequestBuilder,
        payload: &Payload,
    ) -> ClientResult<reqwest::RequestBuilder> {
        match payload.encoding() {
            Encoding::Json => Ok(request.json(&payload.to_json())),
            Encoding::Multipart => Ok(request.multipart(payload.to_multipart()?)),
        }
    }
}

/// Parse a non-empty body as JSON; an empty body decodes to `null`
fn decode_body(body: &str) -> ClientResult<Value> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(trimmed).map_err(|e| ClientError::decode(e.to_string()))
}

/// Pull the record array out of a list response
///
/// Backends answer either with a bare array or with an object wrapping the
/// array under a named key; both shapes are accepted.
fn extract_records(schema: &EntitySchema, value: Value) -> ClientResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut members) => {
            if let Some(key) = &schema.envelope_key
                && let Some(Value::Array(items)) = members.remove(key)
            {
                return Ok(items);
            }
            members
                .into_iter()
                .find_map(|(_, member)| match member {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    ClientError::decode(format!(
                        "list response for {} held no record array",
                        schema.name
                    ))
                })
        }
        other => Err(ClientError::decode(format!(
            "expected an array or an enveloping object, got {other}"
        ))),
    }
}

#[async_trait]
impl CollectionBackend for RemoteCollectionClient {
    async fn list(&self) -> ClientResult<Vec<Resource>> {
        let url = self.url(&self.schema.routes.list);
        debug!(entity = %self.schema.name, %url, "fetching collection");

        let body = self.execute(self.http.get(&url)).await?;
        let value = decode_body(&body)?;

        extract_records(&self.schema, value)?
            .into_iter()
            .map(|item| match item {
                Value::Object(members) => self
                    .schema
                    .resource_from_object(&members)
                    .map_err(|e| ClientError::decode(e.to_string())),
                other => Err(ClientError::decode(format!(
                    "expected a record object, got {other}"
                ))),
            })
            .collect()
    }

    async fn create(&self, payload: &Payload) -> ClientResult<Value> {
        let url = self.url(&self.schema.routes.create);
        debug!(entity = %self.schema.name, %url, encoding = ?payload.encoding(), "creating record");

        let request = self.send_payload(self.http.post(&url), payload)?;
        let body = self.execute(request).await?;
        decode_body(&body)
    }

    async fn update(&self, id: &str, payload: &Payload) -> ClientResult<Value> {
        let url = self.url(&RouteSet::for_id(&self.schema.routes.update, id));
        debug!(entity = %self.schema.name, %url, "updating record");

        let request = self.send_payload(self.http.put(&url), payload)?;
        let body = self.execute(request).await?;
        decode_body(&body)
    }

    async fn patch(&self, id: &str, payload: &Payload) -> ClientResult<Value> {
        let pattern = self
            .schema
            .routes
            .patch
            .as_deref()
            .unwrap_or(&self.schema.routes.update);
        let url = self.url(&RouteSet::for_id(pattern, id));
        debug!(entity = %self.schema.name, %url, "patching record");

        let request = self.send_payload(self.http.patch(&url), payload)?;
        let body = self.execute(request).await?;
        decode_body(&body)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.url(&RouteSet::for_id(&self.schema.routes.delete, id));
        debug!(entity = %self.schema.name, %url, "deleting record");

        self.execute(self.http.delete(&url)).await?;
        Ok(())
    }

    fn schema(&self) -> &EntitySchema {
        &self.schema
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_body_empty_is_null() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert_eq!(decode_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_body_rejects_garbage() {
        assert!(matches!(
            decode_body("{not json"),
            Err(ClientError::Decode { .. })
        ));
    }

    #[test]
    fn test_extract_records_bare_array() {
        let schema = EntitySchema::orders();
        let records = extract_records(&schema, json!([{"_id": "1"}, {"_id": "2"}])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_records_envelope_key() {
        let schema = EntitySchema::blogs();
        let records =
            extract_records(&schema, json!({"blogs": [{"_id": "1"}], "total": 1})).unwrap();
        assert_eq!(records, vec![json!({"_id": "1"})]);
    }

    #[test]
    fn test_extract_records_falls_back_to_first_array_member() {
        let schema = EntitySchema::orders();
        let records =
            extract_records(&schema, json!({"success": true, "items": [{"_id": "9"}]})).unwrap();
        assert_eq!(records, vec![json!({"_id": "9"})]);
    }

    #[test]
    fn test_extract_records_rejects_scalar() {
        let schema = EntitySchema::orders();
        assert!(matches!(
            extract_records(&schema, json!(42)),
            Err(ClientError::Decode { .. })
        ));
        assert!(matches!(
            extract_records(&schema, json!({"count": 3})),
            Err(ClientError::Decode { .. })
        ));
    }

    #[test]
    fn test_url_joining() {
        let client = RemoteCollectionClient::new(
            reqwest::Client::new(),
            "http://localhost:5000/",
            EntitySchema::orders(),
        );
        assert_eq!(client.url("api/orders"), "http://localhost:5000/api/orders");
    }
}
