//! Line reader over a non-blocking byte stream.
//!
//! Pulls complete newline-terminated records out of an [`std::io::Read`]
//! without ever blocking the surrounding event loop: a read that would block
//! surfaces as [`StreamSignal::WouldBlock`] and the caller retries on the next
//! readability wakeup, with any partial line kept buffered.

use std::io::{ErrorKind, Read};

/// Non-line outcomes of [`LineReader::read_line`].
#[derive(Debug)]
pub enum StreamSignal {
    /// No complete line is available yet; yield back to the event loop and
    /// retry when the stream becomes readable again.
    WouldBlock,
    /// The stream ended; no further lines will ever be produced.
    EndOfStream,
    /// The underlying descriptor failed; the stream must be treated as closed.
    Io(std::io::Error),
}

const READ_CHUNK: usize = 4096;

/// Buffering line reader for newline-delimited token streams.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    /// Wrap a byte stream. The stream may be in non-blocking mode.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            eof: false,
        }
    }

    /// Whether a complete line is already buffered and can be returned without
    /// touching the underlying stream.
    pub fn has_buffered_line(&self) -> bool {
        self.buf.contains(&b'\n') || (self.eof && !self.buf.is_empty())
    }

    /// Pull the next line, with trailing newline / carriage-return stripped.
    ///
    /// At end of stream a non-empty partial buffer is returned as the final
    /// line; the call after that reports [`StreamSignal::EndOfStream`]. Bytes
    /// are decoded lossily to UTF-8.
    pub fn read_line(&mut self) -> Result<String, StreamSignal> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
                line.pop();
                return Ok(finish_line(line));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Err(StreamSignal::EndOfStream);
                }
                let line = std::mem::take(&mut self.buf);
                return Ok(finish_line(line));
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.inner.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    return Err(StreamSignal::WouldBlock);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamSignal::Io(e)),
            }
        }
    }
}

fn finish_line(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8_lossy(&line).into_owned()
}
