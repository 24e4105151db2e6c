//! Client utilities for the usuarios REST API.
//!
//! This crate provides typed models and an asynchronous client for the
//! `/usuarios` endpoints: listing, creating, updating and deleting users, and
//! verifying credentials against one of the stored password schemes.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{UsuariosClient, UsuariosClientBuilder};
pub use models::{Credentials, Scheme, Status, UserDraft, UserId, UserRecord, Verification};

/// Convenient result alias that reuses the shared usuarios error type.
pub type Result<T> = usuarios_core::Result<T>;
