//! Sample service v1 API.

pub mod client;
pub mod models;
pub mod sample;

pub use client::{Client, ClientBuilder};
pub use models::{CreateSample, Sample, CREATION_ATTRIBUTES};
pub use sample::SampleManager;
