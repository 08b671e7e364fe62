//! Sample v1 models.

use chrono::{DateTime, Utc};
use sample_core::{Error, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// Attribute names accepted when creating a sample.
pub const CREATION_ATTRIBUTES: &[&str] = &["description", "extra"];

/// A sample as returned by the service.
///
/// Every field the service sent is kept; the typed accessors cover the
/// documented ones and [`Deref`] exposes the generic [`Resource`] accessors
/// for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(Resource);

impl Sample {
    /// Sample UUID.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.0.uuid()
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.str_field("description")
    }

    /// Arbitrary key/value metadata.
    #[must_use]
    pub fn extra(&self) -> Option<&Map<String, Value>> {
        self.0.field("extra").and_then(Value::as_object)
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("created_at")
    }

    /// Last update timestamp; absent until the sample is first updated.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("updated_at")
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.0
            .str_field(field)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// The underlying generic record.
    #[must_use]
    pub fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for Sample {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl From<Resource> for Sample {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Sample {}>", Value::Object(self.0.fields().clone()))
    }
}

/// Attributes for a new sample.
///
/// Only the allow-listed attributes exist as fields, so a typed request can
/// never carry anything else; [`CreateSample::from_attributes`] is the
/// checked path for free-form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSample {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary key/value metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

impl CreateSample {
    /// An empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the extra metadata.
    #[must_use]
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Build a request from free-form `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidAttribute`] on the first name outside
    /// [`CREATION_ATTRIBUTES`], and with [`Error::ValidationError`] when a
    /// value has the wrong type.
    pub fn from_attributes<I, K>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut request = Self::new();
        for (name, value) in attributes {
            match name.as_ref() {
                "description" => match value {
                    Value::String(description) => request.description = Some(description),
                    Value::Null => request.description = None,
                    other => {
                        return Err(Error::ValidationError(format!(
                            "`description` must be a string, got {other}"
                        )))
                    }
                },
                "extra" => match value {
                    Value::Object(extra) => request.extra = Some(extra),
                    Value::Null => request.extra = None,
                    other => {
                        return Err(Error::ValidationError(format!(
                            "`extra` must be an object, got {other}"
                        )))
                    }
                },
                unknown => return Err(Error::InvalidAttribute(unknown.to_string())),
            }
        }
        Ok(request)
    }
}
