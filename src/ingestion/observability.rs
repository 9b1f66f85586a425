use std::fmt;
use std::sync::Arc;

/// Mutation and lifecycle events emitted by an ingestion session.
///
/// The presentation layer uses these to schedule redraws; [`ClearStarted`] /
/// [`ClearFinished`] bracket the window in which selection-style handlers must
/// stay suppressed so they never observe a half-cleared store.
///
/// [`ClearStarted`]: IngestEvent::ClearStarted
/// [`ClearFinished`]: IngestEvent::ClearFinished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    /// A new row was opened at `index` (pre-filled with zero values).
    RowOpened { index: usize },
    /// One cell was written.
    CellWritten { row: usize, column: usize },
    /// The oldest row was evicted to make room under the row limit.
    RowEvicted,
    /// A clear marker arrived; the store is about to empty.
    ClearStarted,
    /// The store finished clearing and the cursor was reset.
    ClearFinished,
    /// The stream ended or was shut down; no further ingestion will happen.
    StreamClosed,
    /// The stream descriptor failed; reported to the diagnostic channel, the
    /// committed rows stay intact.
    StreamError { message: String },
}

/// Observer interface for session events.
///
/// Implementors can drive redraws, record metrics, or log diagnostics.
pub trait SessionObserver: Send + Sync {
    /// Called for every session event, in emission order.
    fn on_event(&self, event: &IngestEvent);
}

/// An observer that fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn SessionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SessionObserver for CompositeObserver {
    fn on_event(&self, event: &IngestEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Logs session events to stderr.
///
/// Stream errors always go to the diagnostic channel, never to the dialog's
/// data output.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl SessionObserver for StdErrObserver {
    fn on_event(&self, event: &IngestEvent) {
        match event {
            IngestEvent::StreamError { message } => {
                eprintln!("[ingest][error] {message}");
            }
            IngestEvent::StreamClosed => eprintln!("[ingest] stream closed"),
            IngestEvent::ClearFinished => eprintln!("[ingest] store cleared"),
            _ => {}
        }
    }
}
