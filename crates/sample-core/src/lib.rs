//! # sample-core
//!
//! Core types and utilities for working with the Sample service.
//!
//! This crate provides the shared error type, client configuration, the HTTP
//! transport used by every resource manager, and the generic CRUD and
//! pagination primitives the per-resource managers are built from.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Validated client configuration
//! - [`auth`] - Token providers supplying `X-Auth-Token`
//! - [`version`] - API version selection and provenance
//! - [`client`] - HTTP transport collaborator
//! - [`query`] - Query string builder
//! - [`patch`] - JSON Patch operations for partial updates
//! - [`resource`] - Generic resource records and managers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod patch;
pub mod query;
pub mod resource;
pub mod version;

// Re-export commonly used types
pub use auth::{NoAuth, StaticToken, TokenProvider};
pub use client::{HttpClient, HttpClientBuilder, Transport};
pub use error::{Error, Result};
pub use patch::{PatchOp, PatchOperation};
pub use resource::{ListLimit, ListOptions, Manager, Resource, SortDir};
pub use version::{ApiVersion, VersionSelectState, DEFAULT_API_VERSION};

/// Re-exported so callers of [`Transport`] do not need a direct `reqwest` dependency.
pub use reqwest::Method;
