use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by ingestion setup and streaming.
///
/// Field-level coercion never fails (see [`crate::ingestion::coerce`]); the only
/// hard failures are stream I/O and a schema the dialog cannot be built from.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying read failure on the input stream descriptor.
    #[error("stream io error: {0}")]
    Io(#[from] std::io::Error),

    /// The column configuration cannot back a list dialog (zero columns,
    /// duplicate attribute columns, ...). Reported once, before ingestion starts.
    #[error("malformed schema: {message}")]
    MalformedSchema { message: String },
}
