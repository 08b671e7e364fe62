//! Generic resource records and CRUD managers.
//!
//! A [`Resource`] is whatever the service returned for one record: an
//! explicit field-name to value mapping with typed accessors. A [`Manager`]
//! issues the REST calls for one resource type and materialises responses
//! into records; it holds nothing but the shared transport handle.
//!
//! Listing follows the service's pagination contract: pages look like
//! `{"<key>": [...], "next": "<url>"}` and the `next` link is followed
//! according to the requested [`ListLimit`].

use crate::client::Transport;
use crate::error::{Error, Result};
use crate::patch::PatchOperation;
use crate::query::QueryParams;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// One record returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
    info: Map<String, Value>,
}

impl Resource {
    /// Wrap a decoded JSON object.
    #[must_use]
    pub fn new(info: Map<String, Value>) -> Self {
        Self { info }
    }

    /// The record's `uuid`, if present.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.info.get("uuid").and_then(Value::as_str)
    }

    /// Raw value of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.info.get(name)
    }

    /// Value of a field, or `default` when the field is absent.
    #[must_use]
    pub fn field_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.info.get(name).unwrap_or(default)
    }

    /// A field as a string, if it is one.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.info.get(name).and_then(Value::as_str)
    }

    /// A field rendered for display; absent and `null` fields render as `""`.
    #[must_use]
    pub fn display_field(&self, name: &str) -> String {
        match self.info.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Whether the record carries a field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.info.contains_key(name)
    }

    /// All fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Consume the record, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.info
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(info: Map<String, Value>) -> Self {
        Self { info }
    }
}

/// Sort direction for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending (the service default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDir {
    /// Returns the direction as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::ValidationError(format!(
                "Invalid sort direction `{other}`: expected `asc` or `desc`"
            ))),
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many records a listing should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListLimit {
    /// One request; the service's configured maximum applies.
    #[default]
    ServerDefault,
    /// Follow pagination until the service reports no further records.
    Unbounded,
    /// Stop after this many records, requesting more pages only as needed.
    AtMost(NonZeroUsize),
}

impl ListLimit {
    /// Interpret a caller-supplied limit: `None` defers to the service,
    /// `0` means unbounded, anything else is a cap.
    #[must_use]
    pub fn from_option(limit: Option<usize>) -> Self {
        match limit {
            None => Self::ServerDefault,
            Some(n) => NonZeroUsize::new(n).map_or(Self::Unbounded, Self::AtMost),
        }
    }

    /// The value sent as the `limit` query parameter, if any.
    #[must_use]
    pub const fn page_size(&self) -> Option<usize> {
        match self {
            Self::AtMost(n) => Some(n.get()),
            Self::ServerDefault | Self::Unbounded => None,
        }
    }

    const fn follows_next(&self) -> bool {
        !matches!(self, Self::ServerDefault)
    }
}

/// Filters and pagination settings shared by every list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Record cap; see [`ListLimit::from_option`].
    pub limit: Option<usize>,
    /// Pagination cursor: the id of the last record already seen.
    pub marker: Option<String>,
    /// Field to sort by.
    pub sort_key: Option<String>,
    /// Sort direction.
    pub sort_dir: Option<SortDir>,
    /// Request the detailed field set.
    pub detail: bool,
}

impl ListOptions {
    /// Options with every filter unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record cap.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start after the given record.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Sort by a field.
    #[must_use]
    pub fn with_sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub const fn with_sort_dir(mut self, dir: SortDir) -> Self {
        self.sort_dir = Some(dir);
        self
    }

    /// Request the detailed field set.
    #[must_use]
    pub const fn detailed(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }

    /// The effective limit mode.
    #[must_use]
    pub fn list_limit(&self) -> ListLimit {
        ListLimit::from_option(self.limit)
    }

    /// Query parameters in the order the service documents them.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("limit", self.list_limit().page_size());
        params.push_opt("marker", self.marker.as_deref());
        params.push_opt("sort_key", self.sort_key.as_deref());
        params.push_opt("sort_dir", self.sort_dir);
        params
    }

    /// Build the list path for `base`, adding `/detail` and the query string.
    #[must_use]
    pub fn list_path(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = if self.detail {
            format!("{base}/detail")
        } else {
            base.to_string()
        };
        self.to_query().apply_to(&path)
    }
}

/// Strip scheme and host from a `next` link so it can be requested through
/// the transport like any other path.
#[must_use]
pub fn relative_next(next: &str) -> String {
    match url::Url::parse(next) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => next.to_string(),
    }
}

struct Page {
    items: Vec<Value>,
    next: Option<String>,
}

impl Page {
    fn parse(body: Option<Value>, response_key: Option<&str>) -> Result<Self> {
        let Some(body) = body else {
            return Ok(Self {
                items: Vec::new(),
                next: None,
            });
        };

        let next = body
            .get("next")
            .and_then(Value::as_str)
            .filter(|next| !next.is_empty())
            .map(relative_next);

        let data = match response_key {
            Some(key) => match body {
                Value::Object(mut map) => map.remove(key).ok_or_else(|| {
                    Error::ParseError(format!("Response is missing the `{key}` collection"))
                })?,
                other => other,
            },
            None => body,
        };

        let items = match data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };

        Ok(Self { items, next })
    }
}

struct PageCursor {
    next: Option<String>,
    buffered: VecDeque<Value>,
    remaining: Option<usize>,
    follow: bool,
    pages: usize,
}

/// Stateless CRUD dispatcher for one resource type.
pub struct Manager<R> {
    api: Arc<dyn Transport>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Manager<R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            _resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Manager<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("resource", &std::any::type_name::<R>())
            .finish_non_exhaustive()
    }
}

impl<R> Manager<R>
where
    R: DeserializeOwned,
{
    /// Bind a manager to a transport.
    #[must_use]
    pub fn new(api: Arc<dyn Transport>) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    /// The shared transport.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn Transport> {
        &self.api
    }

    /// Lazily list records starting at `path`.
    ///
    /// Pages are requested only as the stream is polled. The stream is
    /// finite and cannot be restarted; call again to list afresh.
    pub fn paginate<'a>(
        &'a self,
        path: String,
        response_key: Option<&'a str>,
        limit: ListLimit,
    ) -> impl Stream<Item = Result<R>> + Send + 'a
    where
        R: Send + 'a,
    {
        let cursor = PageCursor {
            next: Some(path),
            buffered: VecDeque::new(),
            remaining: limit.page_size(),
            follow: limit.follows_next(),
            pages: 0,
        };
        let api = &self.api;

        stream::try_unfold(cursor, move |cursor| {
            next_record::<R>(api, response_key, cursor)
        })
    }

    /// List records, collecting every page the limit asks for.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors unchanged.
    pub async fn list(
        &self,
        path: String,
        response_key: Option<&str>,
        limit: ListLimit,
    ) -> Result<Vec<R>>
    where
        R: Send,
    {
        self.paginate(path, response_key, limit).try_collect().await
    }

    /// Fetch a single record.
    ///
    /// An empty or missing body, an empty list, or a 404 from the service
    /// all yield `Ok(None)`. A list body yields its first element.
    ///
    /// # Errors
    ///
    /// Propagates every other transport or parse error.
    pub async fn get(&self, path: &str) -> Result<Option<R>> {
        let body = match self.api.json_request(Method::GET, path, None).await {
            Ok(body) => body,
            Err(Error::NotFound(message)) => {
                debug!(%path, %message, "Resource not found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let first = match body {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => items.into_iter().next(),
            Some(single) => Some(single),
        };

        first
            .map(|raw| serde_json::from_value(raw).map_err(Error::from))
            .transpose()
    }

    /// `POST` a new record.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors; an empty response body is a parse error.
    pub async fn create<B>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(body)?;
        let response = self
            .api
            .json_request(Method::POST, path, Some(payload))
            .await?;
        decode_record(path, response)
    }

    /// `PATCH` a record with a list of operations.
    ///
    /// # Errors
    ///
    /// Propagates transport and parse errors; an empty response body is a parse error.
    pub async fn update(&self, path: &str, patch: &[PatchOperation]) -> Result<R> {
        let payload = serde_json::to_value(patch)?;
        let response = self
            .api
            .json_request(Method::PATCH, path, Some(payload))
            .await?;
        decode_record(path, response)
    }

    /// `DELETE` a record.
    ///
    /// # Errors
    ///
    /// Propagates whatever the service returns, including not-found.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.api
            .json_request(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }
}

async fn next_record<R>(
    api: &Arc<dyn Transport>,
    response_key: Option<&str>,
    mut cursor: PageCursor,
) -> Result<Option<(R, PageCursor)>>
where
    R: DeserializeOwned,
{
    loop {
        if cursor.remaining == Some(0) {
            return Ok(None);
        }

        if let Some(raw) = cursor.buffered.pop_front() {
            if let Some(remaining) = cursor.remaining.as_mut() {
                *remaining -= 1;
            }
            let record = serde_json::from_value::<R>(raw)?;
            return Ok(Some((record, cursor)));
        }

        let Some(path) = cursor.next.take() else {
            return Ok(None);
        };

        let body = api.json_request(Method::GET, &path, None).await?;
        let page = Page::parse(body, response_key)?;
        cursor.pages += 1;
        debug!(
            %path,
            page = cursor.pages,
            records = page.items.len(),
            has_next = page.next.is_some(),
            "Fetched list page"
        );

        cursor.buffered.extend(page.items);
        if cursor.follow {
            cursor.next = page.next;
        }
    }
}

fn decode_record<R: DeserializeOwned>(path: &str, body: Option<Value>) -> Result<R> {
    let body =
        body.ok_or_else(|| Error::ParseError(format!("Empty response body for `{path}`")))?;
    serde_json::from_value(body).map_err(Error::from)
}
