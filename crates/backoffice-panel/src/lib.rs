//! Page-level state for the backoffice console
//!
//! Everything a dashboard page needs between the HTTP boundary and the
//! rendering layer: the collection controller with its reconciliation
//! policies, pure filter evaluation, the add/edit form session, and the
//! authentication gate with its persisted session state.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

pub mod filter;
pub mod form;
pub mod list;
pub mod session;

pub use filter::{DateWindow, FieldFilter, FilterSet, FIELD_VALUE_ALL};
pub use form::{Draft, FormMode, FormSessionController};
pub use list::{ResourceListController, UpdatePolicy};
pub use session::{
    PersistedSession, SessionGate, SessionState, SessionStore, LOGIN_FALLBACK_MESSAGE,
};
