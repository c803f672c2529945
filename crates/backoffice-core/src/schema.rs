//! Entity schemas: per-kind routing and field layout
//!
//! Every dashboard page manages one entity kind. The pages share a single
//! generic controller stack, so everything kind-specific lives here: the
//! route set, the identifier and creation-timestamp field names, the list
//! envelope key, which fields carry uploads, and the shape of sub-record
//! lists.

use crate::error::{Error, Result};
use crate::types::{FieldValue, Resource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Route patterns for one entity kind, relative to the API base URL
///
/// `{id}` in a pattern is replaced with the resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSet {
    /// Collection fetch route (GET)
    pub list: String,

    /// Creation route (POST)
    pub create: String,

    /// Whole-record update route (PUT)
    pub update: String,

    /// Single-field update route (PATCH), where the kind supports it
    pub patch: Option<String>,

    /// Deletion route (DELETE)
    pub delete: String,
}

impl RouteSet {
    /// Uniform routes `{collection}` / `{collection}/{id}`
    #[must_use]
    pub fn collection(path: &str) -> Self {
        Self {
            list: path.to_string(),
            create: path.to_string(),
            update: format!("{path}/{{id}}"),
            patch: None,
            delete: format!("{path}/{{id}}"),
        }
    }

    /// Substitute the identifier into a route pattern
    #[must_use]
    pub fn for_id(pattern: &str, id: &str) -> String {
        pattern.replace("{id}", id)
    }
}

/// Shape of an entity's sub-record list (blog sections, lead follow-ups)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRecordSpec {
    /// Field that carries the list
    pub field: String,

    /// Default entry used to seed new drafts
    pub default_entry: IndexMap<String, FieldValue>,

    /// Whether a draft must always hold at least one entry
    pub require_one: bool,
}

/// Everything kind-specific a page needs to manage one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name, used in routes, logs and error messages
    pub name: String,

    /// Route patterns for the kind
    pub routes: RouteSet,

    /// Field carrying the backend-assigned identifier
    pub id_field: String,

    /// Field carrying the creation timestamp
    pub created_at_field: String,

    /// Key wrapping the list response, when the backend wraps it
    pub envelope_key: Option<String>,

    /// Fields submitted as file uploads
    pub file_fields: Vec<String>,

    /// Sub-record list layout, for kinds that have one
    pub sub_records: Option<SubRecordSpec>,
}

impl EntitySchema {
    /// Orders: customer orders with status and payment tracking
    #[must_use]
    pub fn orders() -> Self {
        Self {
            name: "orders".to_string(),
            routes: RouteSet::collection("api/orders"),
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: None,
            file_fields: Vec::new(),
            sub_records: None,
        }
    }

    /// Leads: CRM contacts with status, priority and follow-up comments
    #[must_use]
    pub fn leads() -> Self {
        let mut routes = RouteSet::collection("api/contact");
        routes.patch = Some("api/contact/{id}".to_string());
        Self {
            name: "leads".to_string(),
            routes,
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: None,
            file_fields: Vec::new(),
            sub_records: Some(SubRecordSpec {
                field: "followUp".to_string(),
                default_entry: IndexMap::new(),
                require_one: false,
            }),
        }
    }

    /// Blog posts: cover image plus an ordered list of sections
    #[must_use]
    pub fn blogs() -> Self {
        Self {
            name: "blogs".to_string(),
            routes: RouteSet {
                list: "api/blogs/allBlogs".to_string(),
                create: "api/blogs/addBlog".to_string(),
                update: "api/blogs/updateBlog/{id}".to_string(),
                patch: None,
                delete: "api/blogs/deleteBlog/{id}".to_string(),
            },
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: Some("blogs".to_string()),
            file_fields: vec!["image".to_string()],
            sub_records: Some(SubRecordSpec {
                field: "sections".to_string(),
                default_entry: [
                    ("title".to_string(), FieldValue::Text(String::new())),
                    ("content".to_string(), FieldValue::Text(String::new())),
                ]
                .into_iter()
                .collect(),
                require_one: true,
            }),
        }
    }

    /// Testimonials: customer quotes with a portrait and a rating
    #[must_use]
    pub fn testimonials() -> Self {
        Self {
            name: "testimonials".to_string(),
            routes: RouteSet::collection("api/testimonials"),
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: None,
            file_fields: vec!["image".to_string()],
            sub_records: None,
        }
    }

    /// Carousel cards: image-only records
    #[must_use]
    pub fn cards() -> Self {
        Self {
            name: "cards".to_string(),
            routes: RouteSet {
                list: "api/cards/fetchCards".to_string(),
                create: "api/cards/addCard".to_string(),
                update: "api/cards/updateCard/{id}".to_string(),
                patch: None,
                delete: "api/cards/deleteCard/{id}".to_string(),
            },
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: Some("cards".to_string()),
            file_fields: vec!["image".to_string()],
            sub_records: None,
        }
    }

    /// Portfolio gallery: categorized images
    #[must_use]
    pub fn gallery() -> Self {
        Self {
            name: "gallery".to_string(),
            routes: RouteSet {
                list: "api/ourwork".to_string(),
                create: "api/ourwork/add".to_string(),
                update: "api/ourwork/{id}".to_string(),
                patch: None,
                delete: "api/ourwork/delete/{id}".to_string(),
            },
            id_field: "_id".to_string(),
            created_at_field: "createdAt".to_string(),
            envelope_key: None,
            file_fields: vec!["image".to_string()],
            sub_records: None,
        }
    }

    /// Map one wire object into a [`Resource`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the identifier field is missing or
    /// not textual. A missing or unparsable creation timestamp is tolerated;
    /// such records simply never match a temporal filter.
    pub fn resource_from_object(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Resource> {
        let id = object
            .get(&self.id_field)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::Validation {
                field: self.id_field.clone(),
                message: format!("missing identifier on a {} record", self.name),
            })?
            .to_string();

        let created_at = object
            .get(&self.created_at_field)
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&chrono::Utc));

        let fields = object
            .iter()
            .filter(|(name, _)| *name != &self.id_field && *name != &self.created_at_field)
            .map(|(name, value)| (name.clone(), FieldValue::from(value.clone())))
            .collect();

        Ok(Resource {
            id,
            created_at,
            fields,
        })
    }
}
