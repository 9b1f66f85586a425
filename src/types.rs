//! Core data model types for list ingestion.
//!
//! A list dialog is configured with an immutable [`ColumnSchema`] (ordered,
//! typed [`ColumnSpec`]s) and backed by a [`RowStore`] of typed [`Cell`] rows
//! that grows as tokens arrive from the input stream.

use crate::error::{IngestError, IngestResult};
use std::collections::VecDeque;

/// Logical type of a list column.
///
/// The three attribute kinds carry row-level styling hints (foreground,
/// background, font); they are stored like text columns but never displayed or
/// printed as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain text (the default).
    Text,
    /// Check box, toggled independently per row.
    Checkable,
    /// Radio button, exclusive within its column.
    Radio,
    /// 64-bit signed integer.
    Integer,
    /// Byte size, stored as an integer.
    Size,
    /// 64-bit floating point number.
    Float,
    /// Progress bar value, clamped to 0..=100.
    ProgressBar,
    /// Small icon resolved from a textual reference.
    Image,
    /// Text column that is stored but not displayed.
    Hidden,
    /// Row foreground color hint.
    AttrForeground,
    /// Row background color hint.
    AttrBackground,
    /// Row font hint.
    AttrFont,
}

impl ColumnKind {
    /// Parse a column type from the header suffix convention (`TITLE:TYPE`).
    ///
    /// Recognized suffixes (case-insensitive): `TEXT`, `NUM`, `SZ`, `FLT`,
    /// `CHK`, `RD`, `BAR`, `IMG`, `HD`, `FORE`, `BACK`, `FONT`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_uppercase().as_str() {
            "TEXT" => Some(Self::Text),
            "NUM" => Some(Self::Integer),
            "SZ" => Some(Self::Size),
            "FLT" => Some(Self::Float),
            "CHK" => Some(Self::Checkable),
            "RD" => Some(Self::Radio),
            "BAR" => Some(Self::ProgressBar),
            "IMG" => Some(Self::Image),
            "HD" => Some(Self::Hidden),
            "FORE" => Some(Self::AttrForeground),
            "BACK" => Some(Self::AttrBackground),
            "FONT" => Some(Self::AttrFont),
            _ => None,
        }
    }

    /// Whether this kind is a row-level styling attribute rather than data.
    pub fn is_attribute(&self) -> bool {
        matches!(
            self,
            Self::AttrForeground | Self::AttrBackground | Self::AttrFont
        )
    }
}

/// A single named, typed column in a [`ColumnSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column header.
    pub name: String,
    /// Column type.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// Create a new column spec.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Parse a column spec from a `TITLE:TYPE` header string.
    ///
    /// An unknown or missing suffix leaves the whole string as the name of a
    /// [`ColumnKind::Text`] column, so a plain header like `"Host"` (or one with
    /// an unrelated colon, like `"time:utc"`) keeps working.
    pub fn parse(header: &str) -> Self {
        if let Some((name, suffix)) = header.rsplit_once(':') {
            if let Some(kind) = ColumnKind::from_suffix(suffix) {
                return Self::new(name, kind);
            }
        }
        Self::new(header, ColumnKind::Text)
    }
}

/// Ordered, immutable list of typed columns, configured before ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
    fore: Option<usize>,
    back: Option<usize>,
    font: Option<usize>,
}

impl ColumnSchema {
    /// Create a schema from columns.
    ///
    /// Refuses an empty column list and more than one column of each attribute
    /// kind; either would make the dialog unbuildable.
    pub fn new(columns: Vec<ColumnSpec>) -> IngestResult<Self> {
        if columns.is_empty() {
            return Err(IngestError::MalformedSchema {
                message: "no columns specified for list dialog".to_string(),
            });
        }

        let mut fore = None;
        let mut back = None;
        let mut font = None;
        for (i, col) in columns.iter().enumerate() {
            let slot = match col.kind {
                ColumnKind::AttrForeground => &mut fore,
                ColumnKind::AttrBackground => &mut back,
                ColumnKind::AttrFont => &mut font,
                _ => continue,
            };
            if slot.is_some() {
                return Err(IngestError::MalformedSchema {
                    message: format!(
                        "duplicate {:?} attribute column '{}'",
                        col.kind, col.name
                    ),
                });
            }
            *slot = Some(i);
        }

        Ok(Self {
            columns,
            fore,
            back,
            font,
        })
    }

    /// Parse a schema from `TITLE:TYPE` header strings (one per `--column` flag).
    pub fn parse_headers<S: AsRef<str>>(headers: &[S]) -> IngestResult<Self> {
        Self::new(headers.iter().map(|h| ColumnSpec::parse(h.as_ref())).collect())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn column(&self, index: usize) -> &ColumnSpec {
        &self.columns[index]
    }

    /// Index of the foreground attribute column, if configured.
    pub fn attr_foreground(&self) -> Option<usize> {
        self.fore
    }

    /// Index of the background attribute column, if configured.
    pub fn attr_background(&self) -> Option<usize> {
        self.back
    }

    /// Index of the font attribute column, if configured.
    pub fn attr_font(&self) -> Option<usize> {
        self.font
    }

    /// A row of per-column zero values (false / 0 / 0.0 / empty text / no image).
    pub fn zero_row(&self) -> Vec<Cell> {
        self.columns.iter().map(|c| Cell::zero_for(c.kind)).collect()
    }
}

/// Handle to a resolved small icon.
///
/// Resolution happens through [`crate::ingestion::IconResolver`]; the
/// presentation layer decides how to draw it from the recorded source and
/// icon-fitted dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The textual reference the icon was resolved from (usually a file path).
    pub source: String,
    /// Width after fitting to the small-icon size.
    pub width: u32,
    /// Height after fitting to the small-icon size.
    pub height: u32,
}

/// A single typed value in a [`RowStore`] row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Check/radio state.
    Bool(bool),
    /// Integer, size, or progress value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text, hidden text, or attribute hint.
    Text(String),
    /// Resolved icon; `None` when resolution failed or no resolver is set.
    Image(Option<ImageRef>),
}

impl Cell {
    /// The zero value for a column kind.
    pub fn zero_for(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Checkable | ColumnKind::Radio => Self::Bool(false),
            ColumnKind::Integer | ColumnKind::Size | ColumnKind::ProgressBar => Self::Int(0),
            ColumnKind::Float => Self::Float(0.0),
            ColumnKind::Image => Self::Image(None),
            ColumnKind::Text
            | ColumnKind::Hidden
            | ColumnKind::AttrForeground
            | ColumnKind::AttrBackground
            | ColumnKind::AttrFont => Self::Text(String::new()),
        }
    }
}

/// Ordered, bounded collection of ingested rows backing the displayed table.
///
/// Insertion order is arrival order. The store provides the structural
/// mutations (append, evict, clear, insert, remove); the decision of *when* to
/// evict belongs to the ingestion driver, so the bulk load path can bypass the
/// limit entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct RowStore {
    column_count: usize,
    limit: usize,
    rows: VecDeque<Vec<Cell>>,
}

impl RowStore {
    /// Create an empty store for rows of `column_count` cells.
    ///
    /// `limit` is the maximum row count the driver enforces; 0 means unlimited.
    pub fn new(column_count: usize, limit: usize) -> Self {
        Self {
            column_count,
            limit,
            rows: VecDeque::new(),
        }
    }

    /// Configured row-count limit (0 = unlimited).
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Iterate rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Append a row at the end.
    ///
    /// # Panics
    ///
    /// Panics if the row length does not match the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.assert_row_len(&row);
        self.rows.push_back(row);
    }

    /// Insert a row at `index`, shifting later rows.
    ///
    /// # Panics
    ///
    /// Panics if the row length does not match the column count or `index` is
    /// past the end.
    pub fn insert_row_at(&mut self, index: usize, row: Vec<Cell>) {
        self.assert_row_len(&row);
        assert!(index <= self.rows.len(), "row index {index} out of range");
        self.rows.insert(index, row);
    }

    /// Remove the row at `index`, returning it if it existed.
    pub fn remove_row(&mut self, index: usize) -> Option<Vec<Cell>> {
        self.rows.remove(index)
    }

    /// Remove and return the oldest row (FIFO eviction).
    pub fn evict_oldest(&mut self) -> Option<Vec<Cell>> {
        self.rows.pop_front()
    }

    /// Remove all rows.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Overwrite one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    pub fn set_cell(&mut self, row: usize, column: usize, cell: Cell) {
        assert!(column < self.column_count, "column index {column} out of range");
        self.rows[row][column] = cell;
    }

    /// Cell at `(row, column)`, if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    fn assert_row_len(&self, row: &[Cell]) {
        assert!(
            row.len() == self.column_count,
            "row length {} does not match column count {}",
            row.len(),
            self.column_count
        );
    }
}
