//! Pure filter evaluation over a collection
//!
//! Filtering never touches I/O: the visible subset is recomputed from the
//! owned collection, a filter description and an explicit "now". Order is
//! always preserved.

use backoffice_core::utils::{same_calendar_day, start_of_month, start_of_week};
use backoffice_core::Resource;
use chrono::{DateTime, TimeZone, Utc};

/// Sentinel field-filter value meaning "do not filter on this field"
pub const FIELD_VALUE_ALL: &str = "All";

/// Temporal window over a record's creation timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateWindow {
    /// Every record
    #[default]
    All,

    /// Created on the current calendar date
    Today,

    /// Created on or after the start of the current week (weeks start on
    /// Sunday); no upper bound
    ThisWeek,

    /// Created on or after the first calendar day of the current month; no
    /// upper bound
    ThisMonth,

    /// Created within `[start, end]` inclusive; a missing bound matches
    /// nothing
    Custom {
        /// Inclusive lower bound
        start: Option<DateTime<Utc>>,
        /// Inclusive upper bound
        end: Option<DateTime<Utc>>,
    },
}

/// Exact-match predicate on one field's display value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Field name
    pub field: String,

    /// Value to match; [`FIELD_VALUE_ALL`] disables the predicate
    pub value: String,
}

impl FieldFilter {
    /// Create a field filter
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the predicate participates in evaluation
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.value != FIELD_VALUE_ALL
    }
}

/// A full filter description: one temporal window AND any field predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// Temporal window
    pub window: DateWindow,

    /// Field equality predicates, all of which must match
    pub fields: Vec<FieldFilter>,
}

impl FilterSet {
    /// A filter set with only a temporal window
    #[must_use]
    pub const fn window(window: DateWindow) -> Self {
        Self {
            window,
            fields: Vec::new(),
        }
    }

    /// Builder-style field predicate
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FieldFilter::new(field, value));
        self
    }
}

/// Compute the filtered view of a collection at a given "now"
///
/// The result preserves the input order; the empty filter set returns the
/// collection unchanged.
#[must_use]
pub fn apply<Tz: TimeZone>(
    collection: &[Resource],
    filters: &FilterSet,
    now: &DateTime<Tz>,
) -> Vec<Resource> {
    collection
        .iter()
        .filter(|resource| matches(resource, filters, now))
        .cloned()
        .collect()
}

/// Whether one record passes a filter set at a given "now"
#[must_use]
pub fn matches<Tz: TimeZone>(resource: &Resource, filters: &FilterSet, now: &DateTime<Tz>) -> bool {
    matches_window(resource, &filters.window, now)
        && filters
            .fields
            .iter()
            .filter(|field| field.is_active())
            .all(|field| {
                resource.display_value(&field.field).as_deref() == Some(field.value.as_str())
            })
}

fn matches_window<Tz: TimeZone>(
    resource: &Resource,
    window: &DateWindow,
    now: &DateTime<Tz>,
) -> bool {
    if matches!(window, DateWindow::All) {
        return true;
    }

    // A record with no creation timestamp never matches a temporal window.
    let Some(created) = resource.created_at else {
        return false;
    };
    let local = created.with_timezone(&now.timezone());

    match window {
        DateWindow::All => true,
        DateWindow::Today => same_calendar_day(&local, now),
        DateWindow::ThisWeek => local.naive_local() >= start_of_week(now),
        DateWindow::ThisMonth => local.naive_local() >= start_of_month(now),
        DateWindow::Custom {
            start: Some(start),
            end: Some(end),
        } => created >= *start && created <= *end,
        // A half-specified range must not silently pass everything.
        DateWindow::Custom { .. } => false,
    }
}
