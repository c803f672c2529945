//! HTTP boundary for the backoffice console
//!
//! This crate is the only place remote I/O happens: collection CRUD against
//! the REST backend ([`RemoteCollectionClient`]) and credential checks
//! against the authentication collaborator ([`AuthClient`]). Everything is
//! asynchronous, nothing retries, and every failure is one of three kinds
//! (network, HTTP status, decode).

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

pub mod auth;
pub mod collection;
pub mod error;
pub mod mock;
pub mod payload;

pub use auth::{AuthClient, Authenticator, MockAuthenticator};
pub use collection::{CollectionBackend, RemoteCollectionClient};
pub use error::{ClientError, ClientResult};
pub use mock::MockBackend;
pub use payload::{Attachment, Encoding, Payload};
