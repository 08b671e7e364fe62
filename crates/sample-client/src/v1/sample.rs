//! Sample resource manager.

use crate::v1::models::{CreateSample, Sample};
use crate::{Error, Result};
use futures::{future, stream, Stream, StreamExt};
use sample_core::{ListOptions, Manager, PatchOperation, Transport};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

const BASE_PATH: &str = "/v1/sample";
const LIST_KEY: &str = "sample";
const CHILDREN_KEY: &str = "children";

/// List, fetch, create, update and delete samples.
#[derive(Debug, Clone)]
pub struct SampleManager {
    inner: Manager<Sample>,
}

impl SampleManager {
    /// Bind the manager to a transport.
    #[must_use]
    pub fn new(api: Arc<dyn Transport>) -> Self {
        Self {
            inner: Manager::new(api),
        }
    }

    /// Percent-encode an id as a single path segment.
    fn segment(sample_id: &str) -> Result<Cow<'_, str>> {
        if matches!(sample_id, "" | "." | "..") {
            return Err(Error::ValidationError(format!(
                "Invalid sample id {sample_id:?}"
            )));
        }
        Ok(urlencoding::encode(sample_id))
    }

    fn sample_path(sample_id: &str) -> Result<String> {
        Ok(format!("{BASE_PATH}/{}", Self::segment(sample_id)?))
    }

    fn children_path(sample_id: &str) -> Result<String> {
        Ok(format!("{BASE_PATH}/{}/children", Self::segment(sample_id)?))
    }

    /// Lazily list samples; pages are requested as the stream is polled.
    ///
    /// `options.limit`: `None` returns what one request yields (the
    /// service's own maximum applies), `0` follows pagination to the end,
    /// and `n > 0` returns at most `n` samples.
    pub fn list_stream<'a>(
        &'a self,
        options: &ListOptions,
    ) -> impl Stream<Item = Result<Sample>> + Send + 'a {
        let path = options.list_path(BASE_PATH);
        debug!(%path, "Listing samples");
        self.inner
            .paginate(path, Some(LIST_KEY), options.list_limit())
    }

    /// List samples. See [`SampleManager::list_stream`] for the limit semantics.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors unchanged.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<Sample>> {
        let path = options.list_path(BASE_PATH);
        debug!(%path, "Listing samples");
        self.inner
            .list(path, Some(LIST_KEY), options.list_limit())
            .await
    }

    /// Lazily list the children of a sample.
    ///
    /// An invalid `sample_id` yields a single error item.
    pub fn list_children_stream<'a>(
        &'a self,
        sample_id: &str,
        options: &ListOptions,
    ) -> impl Stream<Item = Result<Sample>> + Send + 'a {
        match Self::children_path(sample_id) {
            Ok(base) => {
                let path = options.list_path(&base);
                debug!(%path, "Listing sample children");
                self.inner
                    .paginate(path, Some(CHILDREN_KEY), options.list_limit())
                    .left_stream()
            }
            Err(err) => stream::once(future::ready(Err(err))).right_stream(),
        }
    }

    /// List the children of a sample, with the same contract as [`SampleManager::list`].
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors unchanged.
    pub async fn list_children(
        &self,
        sample_id: &str,
        options: &ListOptions,
    ) -> Result<Vec<Sample>> {
        let path = options.list_path(&Self::children_path(sample_id)?);
        debug!(%path, "Listing sample children");
        self.inner
            .list(path, Some(CHILDREN_KEY), options.list_limit())
            .await
    }

    /// Fetch a sample; `Ok(None)` when the service has no such sample.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::ValidationError`] for an empty id, and
    /// propagates every error other than not-found.
    pub async fn get(&self, sample_id: &str) -> Result<Option<Sample>> {
        self.inner.get(&Self::sample_path(sample_id)?).await
    }

    /// Create a sample.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors unchanged.
    pub async fn create(&self, request: &CreateSample) -> Result<Sample> {
        self.inner.create(BASE_PATH, request).await
    }

    /// Create a sample from free-form `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::InvalidAttribute`] before any request is
    /// sent if a name is not a creation attribute.
    pub async fn create_from_attributes<I, K>(&self, attributes: I) -> Result<Sample>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let request = CreateSample::from_attributes(attributes)?;
        self.create(&request).await
    }

    /// Apply patch operations to a sample and return its new representation.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors unchanged.
    pub async fn update(&self, sample_id: &str, patch: &[PatchOperation]) -> Result<Sample> {
        self.inner.update(&Self::sample_path(sample_id)?, patch).await
    }

    /// Delete a sample.
    ///
    /// # Errors
    ///
    /// Propagates whatever the service returns, including not-found.
    pub async fn delete(&self, sample_id: &str) -> Result<()> {
        self.inner.delete(&Self::sample_path(sample_id)?).await
    }
}
