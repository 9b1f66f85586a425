//! Final result formatting: serialize row store contents to the dialog's
//! standard output for consumption by shell scripts.
//!
//! Attribute columns are never printed; booleans print as `TRUE`/`FALSE`;
//! floats print with a configurable fixed precision; text can be shell-quoted
//! so a `while read` loop in the calling script survives embedded spaces.

use std::io::{self, Write};

use crate::types::{Cell, ColumnSchema, RowStore};

/// Options controlling result output.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Print only this column (zero-based); `None` prints all data columns.
    pub print_column: Option<usize>,
    /// Shell-quote printed values.
    pub quoted: bool,
    /// Digits after the decimal point for Float columns.
    pub float_precision: usize,
    /// Separator appended after each printed column.
    pub separator: String,
    /// Print only rows whose first cell is a checked boolean
    /// (checkbox/radio list result semantics).
    pub checked_only: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            print_column: None,
            quoted: false,
            float_precision: 3,
            separator: "|".to_string(),
            checked_only: false,
        }
    }
}

/// Write every selected row of `store` to `out`, one line per row.
pub fn write_rows<W: Write>(
    out: &mut W,
    schema: &ColumnSchema,
    store: &RowStore,
    opts: &OutputOptions,
) -> io::Result<()> {
    for row in store.rows() {
        if opts.checked_only && !matches!(row.first(), Some(Cell::Bool(true))) {
            continue;
        }
        write_row(out, schema, row, opts)?;
    }
    Ok(())
}

/// Write a single row to `out`, honoring the column selection.
pub fn write_row<W: Write>(
    out: &mut W,
    schema: &ColumnSchema,
    row: &[Cell],
    opts: &OutputOptions,
) -> io::Result<()> {
    match opts.print_column {
        Some(col) if col < schema.column_count() => {
            write_cell(out, schema, row, col, opts)?;
        }
        _ => {
            for col in 0..schema.column_count() {
                write_cell(out, schema, row, col, opts)?;
            }
        }
    }
    writeln!(out)
}

fn write_cell<W: Write>(
    out: &mut W,
    schema: &ColumnSchema,
    row: &[Cell],
    column: usize,
    opts: &OutputOptions,
) -> io::Result<()> {
    // Attribute columns are styling hints, not data.
    if schema.column(column).kind.is_attribute() {
        return Ok(());
    }

    match &row[column] {
        Cell::Bool(v) => {
            let s = if *v { "TRUE" } else { "FALSE" };
            if opts.quoted {
                write!(out, "'{s}'")?;
            } else {
                write!(out, "{s}")?;
            }
        }
        Cell::Int(v) => {
            if opts.quoted {
                write!(out, "'{v}'")?;
            } else {
                write!(out, "{v}")?;
            }
        }
        Cell::Float(v) => {
            if opts.quoted {
                write!(out, "'{:.*}'", opts.float_precision, v)?;
            } else {
                write!(out, "{:.*}", opts.float_precision, v)?;
            }
        }
        Cell::Image(_) => {
            // Images have no textual value; an empty quoted placeholder keeps
            // the calling script's field positions stable.
            if opts.quoted {
                write!(out, "''")?;
            }
        }
        Cell::Text(v) => {
            if opts.quoted {
                write!(out, "{}", shell_quote(v))?;
            } else {
                write!(out, "{v}")?;
            }
        }
    }
    write!(out, "{}", opts.separator)
}

/// Quote `s` for a POSIX shell: single quotes, with embedded single quotes
/// spliced out as `'\''`.
pub fn shell_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_wraps_and_escapes() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
