//! JSON Patch operations used by `update` requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kind of a patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOp {
    /// Add a value at a path
    Add,
    /// Replace the value at a path
    Replace,
    /// Remove the value at a path
    Remove,
}

impl PatchOp {
    /// Returns the operation name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        }
    }

    /// Returns all supported operations.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Add, Self::Replace, Self::Remove]
    }
}

impl FromStr for PatchOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "replace" => Ok(Self::Replace),
            "remove" => Ok(Self::Remove),
            other => Err(Error::ValidationError(format!(
                "Unknown PATCH operation: {other}"
            ))),
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One partial-update instruction.
///
/// Serialises as a JSON Patch object, e.g.
/// `{"op": "replace", "path": "/description", "value": "new"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Add `value` at `path`
    Add {
        /// JSON pointer to the target
        path: String,
        /// Value to add
        value: Value,
    },
    /// Replace the value at `path` with `value`
    Replace {
        /// JSON pointer to the target
        path: String,
        /// Replacement value
        value: Value,
    },
    /// Remove the value at `path`
    Remove {
        /// JSON pointer to the target
        path: String,
    },
}

impl PatchOperation {
    /// Build an `add` operation.
    pub fn add(path: impl AsRef<str>, value: impl Into<Value>) -> Self {
        Self::Add {
            path: pointer(path.as_ref()),
            value: value.into(),
        }
    }

    /// Build a `replace` operation.
    pub fn replace(path: impl AsRef<str>, value: impl Into<Value>) -> Self {
        Self::Replace {
            path: pointer(path.as_ref()),
            value: value.into(),
        }
    }

    /// Build a `remove` operation.
    pub fn remove(path: impl AsRef<str>) -> Self {
        Self::Remove {
            path: pointer(path.as_ref()),
        }
    }

    /// Build an operation of the given kind. `value` is ignored for [`PatchOp::Remove`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] when `add` or `replace` has no value.
    pub fn from_parts(op: PatchOp, path: &str, value: Option<Value>) -> Result<Self> {
        match (op, value) {
            (PatchOp::Add, Some(value)) => Ok(Self::add(path, value)),
            (PatchOp::Replace, Some(value)) => Ok(Self::replace(path, value)),
            (PatchOp::Remove, _) => Ok(Self::remove(path)),
            (op, None) => Err(Error::ValidationError(format!(
                "PATCH operation `{op}` on `{path}` requires a value"
            ))),
        }
    }

    /// The operation kind.
    #[must_use]
    pub const fn op(&self) -> PatchOp {
        match self {
            Self::Add { .. } => PatchOp::Add,
            Self::Replace { .. } => PatchOp::Replace,
            Self::Remove { .. } => PatchOp::Remove,
        }
    }

    /// The JSON pointer the operation targets.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. } | Self::Replace { path, .. } | Self::Remove { path } => path,
        }
    }
}

fn pointer(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_serializes_as_json_patch() {
        let op = PatchOperation::replace("description", "new text");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "replace", "path": "/description", "value": "new text"})
        );
    }

    #[test]
    fn remove_has_no_value() {
        let op = PatchOperation::remove("/extra/foo");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "remove", "path": "/extra/foo"})
        );
    }

    #[test]
    fn from_parts_requires_value_for_add() {
        assert!(PatchOperation::from_parts(PatchOp::Add, "a", None).is_err());
        let op = PatchOperation::from_parts(PatchOp::Remove, "a", Some(json!(1))).unwrap();
        assert_eq!(op, PatchOperation::remove("/a"));
        assert_eq!(op.op(), PatchOp::Remove);
        assert_eq!(op.path(), "/a");
    }

    #[test]
    fn op_parsing() {
        for op in PatchOp::all() {
            assert_eq!(op.as_str().parse::<PatchOp>().unwrap(), *op);
        }
        assert!("move".parse::<PatchOp>().is_err());
    }
}
