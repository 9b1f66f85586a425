//! Ingestion driver: the state machine gluing reader, coercion, and row store.
//!
//! An [`IngestionSession`] owns the [`ColumnSchema`], the [`RowStore`], and the
//! [`IngestionCursor`] as one explicit object, passed by reference into the
//! event-loop callback. Both the streaming path ([`IngestionSession::pump`])
//! and the bulk path ([`IngestionSession::load_tokens`]) commit fields through
//! the same row-boundary and coercion core, so identical data produces an
//! identical store regardless of input source.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::event_loop::{EventLoop, StreamEvents, WatchStatus};
use crate::types::{Cell, ColumnSchema, RowStore};

use super::coerce::{IconResolver, NoIcons, coerce_field};
use super::observability::{IngestEvent, SessionObserver};
use super::reader::{LineReader, StreamSignal};

/// A line consisting solely of this control character clears the store.
pub const CLEAR_MARKER: char = '\u{000C}';

/// Options controlling a streaming ingestion session.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Maximum number of rows kept in the store; 0 means unlimited. When a new
    /// streaming row would exceed the limit, the oldest row is evicted first.
    pub row_limit: usize,
    /// Flush pending UI event-loop work every this many processed lines while
    /// draining a burst, so the interface stays responsive. Minimum 1.
    pub flush_interval: usize,
    /// Optional observer for mutation/lifecycle events.
    pub observer: Option<Arc<dyn SessionObserver>>,
    /// Resolver for Image column references.
    pub icon_resolver: Arc<dyn IconResolver>,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            row_limit: 0,
            flush_interval: 1,
            observer: None,
            icon_resolver: Arc::new(NoIcons),
        }
    }
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("row_limit", &self.row_limit)
            .field("flush_interval", &self.flush_interval)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Where the driver currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting for the next field of the current (or very first) row.
    AwaitingField,
    /// The previous row just completed; the next field opens a new row.
    RowBoundary,
    /// The stream ended; no further ingestion occurs this session.
    Closed,
}

/// Transient position of the driver within the incoming token grid.
///
/// Reset to zero by a clear marker; lives as long as the active stream handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionCursor {
    /// Column the next field will be written to.
    pub column: usize,
    /// Rows opened since construction or the last clear.
    pub rows_opened: usize,
}

/// Outcome of one [`IngestionSession::pump`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// All currently available lines were drained; retry on the next
    /// readability wakeup.
    WouldBlock,
    /// The stream ended (or failed); the session is closed for good.
    Closed,
}

/// One streaming list-ingestion session: schema, store, and cursor.
pub struct IngestionSession {
    schema: ColumnSchema,
    store: RowStore,
    cursor: IngestionCursor,
    closed: bool,
    opts: IngestionOptions,
}

impl fmt::Debug for IngestionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionSession")
            .field("columns", &self.schema.column_count())
            .field("rows", &self.store.len())
            .field("cursor", &self.cursor)
            .field("closed", &self.closed)
            .finish()
    }
}

impl IngestionSession {
    /// Create a session with an empty store.
    pub fn new(schema: ColumnSchema, opts: IngestionOptions) -> Self {
        let store = RowStore::new(schema.column_count(), opts.row_limit);
        Self {
            schema,
            store,
            cursor: IngestionCursor::default(),
            closed: false,
            opts,
        }
    }

    /// The column schema.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// The row store.
    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// The ingestion cursor.
    pub fn cursor(&self) -> IngestionCursor {
        self.cursor
    }

    /// Consume the session, returning the store for final output formatting.
    pub fn into_store(self) -> RowStore {
        self.store
    }

    /// Current driver state.
    pub fn state(&self) -> DriverState {
        if self.closed {
            DriverState::Closed
        } else if self.cursor.rows_opened > 0 && self.cursor.column == self.schema.column_count() {
            DriverState::RowBoundary
        } else {
            DriverState::AwaitingField
        }
    }

    /// Whether the stream has ended for this session.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drain all currently available lines from `reader`.
    ///
    /// Clear markers are recognized before coercion; every other line is one
    /// field token. Pending UI work is flushed every
    /// [`IngestionOptions::flush_interval`] lines so a large burst cannot
    /// starve the interface. Never blocks: a not-ready stream yields
    /// [`PumpOutcome::WouldBlock`] back to the event loop.
    pub fn pump<R: Read>(
        &mut self,
        reader: &mut LineReader<R>,
        ui: &mut dyn EventLoop,
    ) -> PumpOutcome {
        if self.closed {
            return PumpOutcome::Closed;
        }

        let flush_interval = self.opts.flush_interval.max(1);
        let mut since_flush = 0usize;

        loop {
            match reader.read_line() {
                Ok(line) => {
                    if is_clear_marker(&line) {
                        self.clear();
                    } else {
                        self.feed(&line);
                    }
                    since_flush += 1;
                    if since_flush >= flush_interval {
                        ui.flush_pending();
                        since_flush = 0;
                    }
                }
                Err(StreamSignal::WouldBlock) => return PumpOutcome::WouldBlock,
                Err(StreamSignal::EndOfStream) => {
                    self.close();
                    return PumpOutcome::Closed;
                }
                Err(StreamSignal::Io(e)) => {
                    self.emit(IngestEvent::StreamError {
                        message: e.to_string(),
                    });
                    self.close();
                    return PumpOutcome::Closed;
                }
            }
        }
    }

    /// Commit one streaming field token (row limit enforced at row-open).
    pub fn feed(&mut self, token: &str) {
        self.commit_field(token, true);
    }

    /// Bulk load a flat, pre-supplied token sequence.
    ///
    /// Shares the coercion and row-boundary logic with the streaming path, but
    /// performs no clear-marker handling and no eviction: the fixed list loads
    /// atomically before the dialog is shown.
    pub fn load_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.commit_field(token.as_ref(), false);
        }
    }

    /// Clear the store and reset the cursor.
    ///
    /// Selection-style handlers are suppressed between the
    /// [`IngestEvent::ClearStarted`] and [`IngestEvent::ClearFinished`] events
    /// so they never observe the store mid-mutation. A partially filled row is
    /// discarded entirely.
    pub fn clear(&mut self) {
        self.emit(IngestEvent::ClearStarted);
        self.store.clear();
        self.cursor = IngestionCursor::default();
        self.emit(IngestEvent::ClearFinished);
    }

    /// Mark the stream as ended. The store and cursor remain as last
    /// committed; a partial trailing row keeps its zero-valued tail cells.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.emit(IngestEvent::StreamClosed);
        }
    }

    fn commit_field(&mut self, token: &str, evict: bool) {
        let cols = self.schema.column_count();

        // A user delete can empty the store between wakeups; reopen in that
        // case too, or the write below would have no row to land in.
        if self.cursor.rows_opened == 0 || self.cursor.column == cols || self.store.is_empty() {
            // Row boundary. Eviction happens here, at row-open, never mid-row.
            self.cursor.column = 0;
            if evict && self.store.limit() > 0 && self.store.len() >= self.store.limit() {
                self.store.evict_oldest();
                self.emit(IngestEvent::RowEvicted);
            }
            self.store.push_row(self.schema.zero_row());
            self.cursor.rows_opened += 1;
            self.emit(IngestEvent::RowOpened {
                index: self.store.len() - 1,
            });
        }

        let row = self.store.len() - 1;
        let column = self.cursor.column;
        let kind = self.schema.column(column).kind;
        let cell = coerce_field(kind, token, self.opts.icon_resolver.as_ref());
        self.store.set_cell(row, column, cell);
        self.cursor.column += 1;
        self.emit(IngestEvent::CellWritten { row, column });
    }

    fn emit(&self, event: IngestEvent) {
        if let Some(obs) = &self.opts.observer {
            obs.on_event(&event);
        }
    }

    // User-initiated edit operations, dispatched from the same event-loop
    // thread as the streaming callback.

    /// Append an empty (zero-valued) row; returns its index.
    pub fn add_row(&mut self) -> usize {
        self.store.push_row(self.schema.zero_row());
        self.store.len() - 1
    }

    /// Remove the row at `index`, returning it if it existed.
    pub fn remove_row(&mut self, index: usize) -> Option<Vec<Cell>> {
        self.store.remove_row(index)
    }

    /// Clone the row at `index` and insert the copy right after it; returns
    /// the copy's index.
    pub fn duplicate_row(&mut self, index: usize) -> Option<usize> {
        let copy = self.store.row(index)?.to_vec();
        self.store.insert_row_at(index + 1, copy);
        Some(index + 1)
    }

    /// Re-coerce `token` through the column's coercion rule and store it.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of range.
    pub fn edit_cell(&mut self, row: usize, column: usize, token: &str) {
        let kind = self.schema.column(column).kind;
        let cell = coerce_field(kind, token, self.opts.icon_resolver.as_ref());
        self.store.set_cell(row, column, cell);
    }

    /// Flip a check cell. Non-boolean cells are left untouched.
    pub fn toggle_cell(&mut self, row: usize, column: usize) {
        if let Some(Cell::Bool(v)) = self.store.cell(row, column).cloned() {
            self.store.set_cell(row, column, Cell::Bool(!v));
        }
    }

    /// Select one radio cell, clearing every other row's cell in that column.
    pub fn select_radio(&mut self, row: usize, column: usize) {
        for i in 0..self.store.len() {
            if let Some(Cell::Bool(_)) = self.store.cell(i, column) {
                self.store.set_cell(i, column, Cell::Bool(i == row));
            }
        }
    }
}

fn is_clear_marker(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(CLEAR_MARKER) && chars.next().is_none()
}

/// A session bundled with its line reader: the handler pair registered on the
/// surrounding event loop for stream readability and closure.
pub struct StreamingIngest<R> {
    session: IngestionSession,
    reader: LineReader<R>,
}

impl<R: Read> StreamingIngest<R> {
    /// Bundle `session` with `input` (typically a non-blocking stdin handle).
    pub fn new(session: IngestionSession, input: R) -> Self {
        Self {
            session,
            reader: LineReader::new(input),
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &IngestionSession {
        &self.session
    }

    /// Mutable access, e.g. for user edit operations between wakeups.
    pub fn session_mut(&mut self) -> &mut IngestionSession {
        &mut self.session
    }

    /// Tear down the bundle, releasing the stream handle.
    pub fn into_session(self) -> IngestionSession {
        self.session
    }
}

impl<R: Read> StreamEvents for StreamingIngest<R> {
    fn on_stream_readable(&mut self, ui: &mut dyn EventLoop) -> WatchStatus {
        match self.session.pump(&mut self.reader, ui) {
            PumpOutcome::WouldBlock => WatchStatus::Continue,
            PumpOutcome::Closed => WatchStatus::Remove,
        }
    }

    fn on_stream_closed(&mut self, _ui: &mut dyn EventLoop) {
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnKind, ColumnSpec};

    fn two_text_columns() -> ColumnSchema {
        ColumnSchema::new(vec![
            ColumnSpec::new("a", ColumnKind::Text),
            ColumnSpec::new("b", ColumnKind::Text),
        ])
        .unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn state_walks_field_to_row_boundary() {
        let mut session = IngestionSession::new(two_text_columns(), IngestionOptions::default());
        assert_eq!(session.state(), DriverState::AwaitingField);
        session.feed("x");
        assert_eq!(session.state(), DriverState::AwaitingField);
        session.feed("y");
        assert_eq!(session.state(), DriverState::RowBoundary);
        session.feed("z");
        assert_eq!(session.state(), DriverState::AwaitingField);
        session.close();
        assert_eq!(session.state(), DriverState::Closed);
    }

    #[test]
    fn fields_wrap_into_rows_in_arrival_order() {
        let mut session = IngestionSession::new(two_text_columns(), IngestionOptions::default());
        for t in ["a", "b", "c", "d"] {
            session.feed(t);
        }
        assert_eq!(session.store().len(), 2);
        assert_eq!(session.store().row(0).unwrap(), &[text("a"), text("b")]);
        assert_eq!(session.store().row(1).unwrap(), &[text("c"), text("d")]);
    }

    #[test]
    fn clear_resets_cursor_and_store() {
        let mut session = IngestionSession::new(two_text_columns(), IngestionOptions::default());
        session.feed("a");
        session.clear();
        assert!(session.store().is_empty());
        assert_eq!(session.cursor(), IngestionCursor::default());
        session.feed("b");
        assert_eq!(session.store().row(0).unwrap(), &[text("b"), text("")]);
    }

    #[test]
    fn duplicate_row_inserts_copy_after_original() {
        let mut session = IngestionSession::new(two_text_columns(), IngestionOptions::default());
        session.load_tokens(["a", "b", "c", "d"]);
        assert_eq!(session.duplicate_row(0), Some(1));
        assert_eq!(session.store().len(), 3);
        assert_eq!(session.store().row(1).unwrap(), &[text("a"), text("b")]);
        assert_eq!(session.store().row(2).unwrap(), &[text("c"), text("d")]);
    }

    #[test]
    fn radio_selection_is_exclusive() {
        let schema = ColumnSchema::new(vec![
            ColumnSpec::new("pick", ColumnKind::Radio),
            ColumnSpec::new("name", ColumnKind::Text),
        ])
        .unwrap();
        let mut session = IngestionSession::new(schema, IngestionOptions::default());
        session.load_tokens(["true", "one", "false", "two", "false", "three"]);
        session.select_radio(2, 0);
        assert_eq!(session.store().cell(0, 0), Some(&Cell::Bool(false)));
        assert_eq!(session.store().cell(1, 0), Some(&Cell::Bool(false)));
        assert_eq!(session.store().cell(2, 0), Some(&Cell::Bool(true)));
    }

    #[test]
    fn edit_cell_recoerces_by_column_kind() {
        let schema = ColumnSchema::new(vec![
            ColumnSpec::new("n", ColumnKind::Integer),
            ColumnSpec::new("s", ColumnKind::Text),
        ])
        .unwrap();
        let mut session = IngestionSession::new(schema, IngestionOptions::default());
        session.add_row();
        session.edit_cell(0, 0, "42kg");
        session.edit_cell(0, 1, "42kg");
        assert_eq!(session.store().cell(0, 0), Some(&Cell::Int(42)));
        assert_eq!(session.store().cell(0, 1), Some(&text("42kg")));
    }

    #[test]
    fn clear_marker_must_be_entire_line() {
        assert!(is_clear_marker("\u{000C}"));
        assert!(!is_clear_marker("\u{000C}junk"));
        assert!(!is_clear_marker(""));
    }
}
