//! Table output for shell commands.

use crate::error::CliResult;
use crate::resource_fields::ResourceFields;
use comfy_table::Table;
use sample_core::Resource;
use std::io::Write;
use std::ops::Deref;

/// Default width at which long values are wrapped in property tables.
pub const DEFAULT_WRAP: usize = 72;

/// Print selected fields of one record as a Property/Value table.
///
/// Absent and `null` fields print as empty cells.
pub fn print_dict(
    out: &mut dyn Write,
    record: &Resource,
    fields: &[&str],
    wrap: usize,
) -> CliResult<()> {
    let mut table = Table::new();
    table.set_header(vec!["Property", "Value"]);

    for field in fields {
        let value = wrap_text(&record.display_field(field), wrap);
        table.add_row(vec![(*field).to_string(), value]);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Print records as a table with one column per field, in service order.
pub fn print_list<R>(out: &mut dyn Write, records: &[R], columns: &ResourceFields) -> CliResult<()>
where
    R: Deref<Target = Resource>,
{
    let mut table = Table::new();
    table.set_header(columns.labels.to_vec());

    for record in records {
        let row: Vec<String> = columns
            .fields
            .iter()
            .map(|field| record.display_field(field))
            .collect();
        table.add_row(row);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Wrap long values at `width` columns; embedded line breaks are kept.
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    textwrap::fill(text, width)
}
