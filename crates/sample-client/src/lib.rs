//! Sample service client library.
//!
//! This crate provides typed models and an asynchronous, versioned client for
//! the Sample service. The v1 API lives in [`v1`]; build a [`v1::Client`] and
//! reach each resource through its manager:
//!
//! ```no_run
//! # async fn run() -> sample_client::Result<()> {
//! use sample_client::v1::{Client, CreateSample};
//! use sample_client::ListOptions;
//!
//! let client = Client::builder("http://sample.example.com:6385")
//!     .with_token("gAAAAAB...")
//!     .build()?;
//!
//! let created = client
//!     .sample()
//!     .create(&CreateSample::new().with_description("x"))
//!     .await?;
//! let everything = client.sample().list(&ListOptions::new().with_limit(0)).await?;
//! # let _ = (created, everything);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod v1;

pub use sample_core::{
    ApiVersion, Error, ListOptions, PatchOp, PatchOperation, SortDir, VersionSelectState,
    DEFAULT_API_VERSION,
};

/// Convenient result alias that reuses the shared Sample error type.
pub type Result<T> = sample_core::Result<T>;
