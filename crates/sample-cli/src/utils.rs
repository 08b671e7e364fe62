//! Argument helpers shared by the shell commands.

use crate::error::{CliError, CliResult};
use crate::resource_fields::ResourceFields;
use sample_core::{ListOptions, PatchOp, PatchOperation, SortDir};
use serde_json::{Map, Value};

/// Reject an empty or whitespace-only positional argument.
pub fn check_empty_arg(value: &str, name: &str) -> CliResult<()> {
    if value.trim().is_empty() {
        return Err(CliError::command(format!(
            "{name} cannot be empty or only have blank spaces"
        )));
    }
    Ok(())
}

fn split_key_value(attr: &str) -> CliResult<(&str, &str)> {
    attr.split_once('=').ok_or_else(|| {
        CliError::command(format!(
            "Attributes must be a list of PATH=VALUE not \"{attr}\""
        ))
    })
}

/// Turn repeated `KEY=VALUE` arguments into a mapping of strings.
pub fn args_array_to_dict(pairs: &[String]) -> CliResult<Map<String, Value>> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, value) = split_key_value(pair)?;
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(map)
}

/// Turn `PATH=VALUE` arguments into patch operations.
///
/// Values that parse as JSON are sent as JSON, anything else as a string.
/// `remove` takes bare paths.
pub fn args_array_to_patch(op: PatchOp, attributes: &[String]) -> CliResult<Vec<PatchOperation>> {
    attributes
        .iter()
        .map(|attr| -> CliResult<PatchOperation> {
            match op {
                PatchOp::Remove => Ok(PatchOperation::remove(attr)),
                PatchOp::Add | PatchOp::Replace => {
                    let (path, raw) = split_key_value(attr)?;
                    let value = serde_json::from_str(raw)
                        .unwrap_or_else(|_| Value::String(raw.to_string()));
                    Ok(PatchOperation::from_parts(op, path, Some(value))?)
                }
            }
        })
        .collect()
}

/// Raw list arguments as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub limit: Option<i64>,
    pub marker: Option<String>,
    pub sort_key: Option<String>,
    pub sort_dir: Option<String>,
    pub detail: bool,
}

/// Validate list arguments against a field set and build the list options.
///
/// The sort key may be given as a field name or as its column label.
pub fn common_params_for_list(args: &ListArgs, columns: &ResourceFields) -> CliResult<ListOptions> {
    let mut options = ListOptions::new().detailed(args.detail);

    if let Some(limit) = args.limit {
        let limit = usize::try_from(limit).map_err(|_| {
            CliError::command(format!("Expected non-negative --limit, got {limit}"))
        })?;
        options = options.with_limit(limit);
    }

    if let Some(marker) = &args.marker {
        options = options.with_marker(marker.clone());
    }

    if let Some(key) = &args.sort_key {
        let fields = columns.sort_fields();
        let labels = columns.sort_labels();
        let field = if let Some(index) = labels.iter().position(|label| label == key) {
            fields[index]
        } else if let Some(field) = fields.iter().copied().find(|field| field == key) {
            field
        } else {
            return Err(CliError::command(format!(
                "{key} is an invalid field for sorting, valid values for --sort-key are: {fields:?}"
            )));
        };
        options = options.with_sort_key(field);
    }

    if let Some(dir) = &args.sort_dir {
        options = options.with_sort_dir(dir.parse::<SortDir>()?);
    }

    Ok(options)
}
