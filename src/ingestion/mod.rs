//! Streaming and bulk ingestion into the row store.
//!
//! Most embedders construct an [`IngestionSession`], optionally pre-load it
//! via [`IngestionSession::load_tokens`], then wrap it in a [`StreamingIngest`]
//! registered on the event loop for stdin streaming.
//!
//! The pieces are also usable on their own:
//! - [`reader`]: non-blocking line reader / tokenizer
//! - [`coerce`]: token-to-cell coercion and the icon resolution seam
//! - [`session`]: the ingestion driver state machine
//! - [`observability`]: session event observers

pub mod coerce;
pub mod observability;
pub mod reader;
pub mod session;

pub use coerce::{IconResolver, NoIcons, SMALL_ICON_SIZE, coerce_field};
#[cfg(feature = "icons")]
pub use coerce::FileIconResolver;
pub use observability::{CompositeObserver, IngestEvent, SessionObserver, StdErrObserver};
pub use reader::{LineReader, StreamSignal};
pub use session::{
    CLEAR_MARKER, DriverState, IngestionCursor, IngestionOptions, IngestionSession, PumpOutcome,
    StreamingIngest,
};
