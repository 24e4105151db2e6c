//! # usuarios-core
//!
//! Core types and utilities for talking to the usuarios API.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP failure mapping
//! - [`config`] - Client configuration and environment loading
//! - [`client`] - HTTP service client and retry policy

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{Error, Result};
