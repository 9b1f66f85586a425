//! `listfeed` is the data-ingestion core of a stdin-fed list dialog: it reads
//! typed, newline-delimited tokens from a live input stream into a growing,
//! bounded [`types::RowStore`] while a GUI consumes the store concurrently
//! with event-loop ticks.
//!
//! The column layout is fixed up front by a [`types::ColumnSchema`]; tokens
//! map onto `(row, column)` positions in row-major order, wrapping after one
//! token per column. Coercion is deliberately lenient: scripts piping into a
//! long-lived dialog must not be able to kill it with one malformed field, so
//! bad numerics become 0, bad booleans become false, and a failed icon lookup
//! leaves an empty cell.
//!
//! ## Wire format
//!
//! - one token per line; `\r\n` and `\n` both accepted
//! - a line that is exactly one form-feed character (`\f`) clears the store
//! - boolean tokens: case-insensitive `"true"` vs anything else
//! - numeric tokens: base-10 leading-prefix parse, non-numeric parses as 0
//! - the stream ends on EOF/hangup of the descriptor
//!
//! ## Quick example: stream tokens into a bounded store
//!
//! ```rust
//! use listfeed::event_loop::{NullEventLoop, drive_to_end};
//! use listfeed::ingestion::{IngestionOptions, IngestionSession, StreamingIngest};
//! use listfeed::types::{Cell, ColumnSchema};
//!
//! # fn main() -> Result<(), listfeed::IngestError> {
//! // Column headers use the TITLE:TYPE convention of the dialog's CLI flags.
//! let schema = ColumnSchema::parse_headers(&["Done:CHK", "Task", "Load:BAR"])?;
//! let session = IngestionSession::new(schema, IngestionOptions::default());
//!
//! let input = std::io::Cursor::new("TRUE\nwrite docs\n40\nfalse\nship it\n120\n");
//! let mut ingest = StreamingIngest::new(session, input);
//! drive_to_end(&mut ingest, &mut NullEventLoop);
//!
//! let session = ingest.into_session();
//! assert_eq!(session.store().len(), 2);
//! assert_eq!(session.store().cell(0, 0), Some(&Cell::Bool(true)));
//! assert_eq!(session.store().cell(1, 2), Some(&Cell::Int(100))); // clamped
//! # Ok(())
//! # }
//! ```
//!
//! ## Bulk loading
//!
//! A fixed token list (e.g. from command-line arguments) loads through
//! [`ingestion::IngestionSession::load_tokens`], which shares the coercion and
//! row-boundary logic with the streaming path, so identical data produces an
//! identical store regardless of input source.
//!
//! ## Modules
//!
//! - [`types`]: column schema, cells, and the bounded row store
//! - [`ingestion`]: line reader, field coercion, and the ingestion driver
//! - [`event_loop`]: the abstract event-loop seam the driver runs against
//! - [`output`]: final result formatting for the calling script
//! - [`error`]: error types (coercion itself never fails)

pub mod error;
pub mod event_loop;
pub mod ingestion;
pub mod output;
pub mod types;

pub use error::{IngestError, IngestResult};
