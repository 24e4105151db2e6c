//! User directory view for the usuarios API.
//!
//! Holds the cached user list and the table state around it: search,
//! single-column sort, ten-row pages and the create/edit modal. Create,
//! update and delete go through an injected [`DirectoryApi`] and are applied
//! to the cache only when the backend accepts them.
//!
//! The crate also carries the per-scheme [`login`] flow and registration form
//! validation.

#![deny(missing_docs)]

pub mod api;
pub mod directory;
pub mod form;
pub mod login;
pub mod query;
pub mod register;

pub use api::{CredentialVerifier, DirectoryApi};
pub use directory::Directory;
pub use form::{FormField, Modal};
pub use login::{login, LoginOutcome, DASHBOARD_ROUTE};
pub use query::{Page, SortDirection, SortField, SortState, PAGE_SIZE};
pub use register::{Registration, RegistrationForm, PASSWORD_MISMATCH};
