//! Abstract event-loop interface the ingestion driver runs against.
//!
//! The driver is single-threaded and cooperative: it never blocks, and it
//! never spins on readability. The embedder registers the
//! [`StreamEvents`] handler pair with whatever readiness mechanism its
//! toolkit provides and invokes them on readable / hangup conditions.

/// Outcome of a readability callback: keep or drop the stream watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    /// Keep the watch; invoke the handler again on the next wakeup.
    Continue,
    /// The stream is finished; remove the watch and release the handle.
    Remove,
}

/// The handler pair a streaming source registers with the event loop.
pub trait StreamEvents {
    /// The stream became readable (or hit end-of-stream while readable).
    fn on_stream_readable(&mut self, ui: &mut dyn EventLoop) -> WatchStatus;

    /// The stream was closed from outside (hangup without pending data).
    fn on_stream_closed(&mut self, ui: &mut dyn EventLoop);
}

/// Minimal surface the driver needs from the surrounding UI event loop.
pub trait EventLoop {
    /// Run queued UI work. Called periodically while the driver drains a
    /// burst of input, so the interface stays responsive.
    fn flush_pending(&mut self);
}

/// Event loop that has no pending work, for tests and headless use.
#[derive(Debug, Default)]
pub struct NullEventLoop;

impl EventLoop for NullEventLoop {
    fn flush_pending(&mut self) {}
}

/// Invoke `handler` until it asks for its watch to be removed.
///
/// Only suitable for synchronous sources that terminate (files, in-memory
/// buffers, tests): a genuinely non-blocking descriptor would make this spin.
/// Real embeddings should register the handler pair with their toolkit's
/// readiness notification instead.
pub fn drive_to_end(handler: &mut dyn StreamEvents, ui: &mut dyn EventLoop) {
    while handler.on_stream_readable(ui) == WatchStatus::Continue {}
}
