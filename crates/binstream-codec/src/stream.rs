use std::fmt;
use std::io::{Seek, SeekFrom};
use std::panic::Location;
use std::sync::Arc;

use binstream_channel::{ByteChannel, FileMode};
use bytes::BytesMut;
use tracing::{debug, warn};

use crate::config::StreamConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{Operation, Result, StreamError};

pub(crate) const INITIAL_BUFFER_CAPACITY: usize = 256;
/// Scratch capacity kept between writes; larger buffers are released.
pub(crate) const SCRATCH_RETAIN_LIMIT: usize = 64 * 1024;

/// A typed cursor over a byte channel.
///
/// Usually built over `&mut channel`, so the channel outlives the stream
/// and is never closed by it. The stream copies the channel's mode at
/// construction and checks it before every read or write.
///
/// Health is sticky: after any failed read or write, further reads and
/// writes do nothing until a successful [`seek`](Self::seek) or
/// [`skip`](Self::skip).
pub struct BinaryStream<C> {
    pub(crate) inner: C,
    mode: FileMode,
    config: StreamConfig,
    diagnostics: Arc<dyn Diagnostics>,
    pub(crate) buf: BytesMut,
    healthy: bool,
    failure: Option<StreamError>,
}

impl<C: ByteChannel> BinaryStream<C> {
    /// Create a stream with default configuration.
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a stream with explicit configuration.
    pub fn with_config(inner: C, config: StreamConfig) -> Self {
        let mode = inner.mode();
        Self {
            inner,
            mode,
            config,
            diagnostics: Arc::new(TracingDiagnostics),
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            healthy: true,
            failure: None,
        }
    }

    /// Replace the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Mode copied from the channel.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Current stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Update the maximum text/buffer length for subsequent reads.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.config.max_length = max_length;
    }

    /// Returns true until a read or write fails.
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Take the failure recorded by a chained operation.
    ///
    /// The stream stays unhealthy until it is repositioned.
    pub fn take_error(&mut self) -> Option<StreamError> {
        self.failure.take()
    }

    /// Check the outcome of a chain of operations.
    pub fn finish(&mut self) -> Result<()> {
        if self.healthy {
            return Ok(());
        }
        Err(self.failure.take().unwrap_or(StreamError::Unhealthy))
    }

    /// Move the cursor. Success clears an unhealthy state.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.inner.seek(pos) {
            Ok(position) => {
                if !self.healthy {
                    debug!(position, "stream repositioned, health restored");
                }
                self.healthy = true;
                self.failure = None;
                Ok(position)
            }
            Err(err) => Err(self.fail(StreamError::Io(err))),
        }
    }

    /// Seek to the start.
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Move the cursor by `delta` bytes from the current position.
    pub fn skip(&mut self, delta: i64) -> Result<u64> {
        self.seek(SeekFrom::Current(delta))
    }

    /// Current cursor position. A failure marks the stream unhealthy.
    pub fn tell(&mut self) -> Result<u64> {
        match self.inner.stream_position() {
            Ok(position) => Ok(position),
            Err(err) => Err(self.fail(StreamError::Io(err))),
        }
    }

    /// Total channel size in bytes.
    ///
    /// Seeks to the end and back, so cache the value if it is needed often.
    /// A failure marks the stream unhealthy.
    pub fn size(&mut self) -> Result<u64> {
        match self.end_position() {
            Ok(end) => Ok(end),
            Err(err) => Err(self.fail(StreamError::Io(err))),
        }
    }

    fn end_position(&mut self) -> std::io::Result<u64> {
        let position = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        if end != position {
            self.inner.seek(SeekFrom::Start(position))?;
        }
        Ok(end)
    }

    /// Bytes between the cursor and the end of the channel.
    pub fn remaining(&mut self) -> Result<u64> {
        let position = self.tell()?;
        Ok(self.size()?.saturating_sub(position))
    }

    /// Returns true when the cursor is at (or past) the end.
    #[track_caller]
    pub fn is_at_end(&mut self) -> Result<bool> {
        self.require(Operation::Read)?;
        Ok(self.remaining()? == 0)
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Consume the stream and return the channel.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Fail unless the stream is healthy and its mode allows `operation`.
    ///
    /// Capability violations are reported to the diagnostics sink and make
    /// the stream unhealthy.
    #[track_caller]
    pub(crate) fn require(&mut self, operation: Operation) -> Result<()> {
        if !self.healthy {
            return Err(StreamError::Unhealthy);
        }

        let (allowed, condition) = match operation {
            Operation::Read => (self.mode.is_readable(), "stream mode is readable"),
            Operation::Write => (self.mode.is_writable(), "stream mode is writable"),
        };
        if !allowed {
            self.diagnostics
                .assertion_failed(condition, Location::caller());
            return Err(self.fail(StreamError::Capability {
                operation,
                mode: self.mode,
            }));
        }
        Ok(())
    }

    /// Mark the stream unhealthy and hand the error back.
    pub(crate) fn fail(&mut self, err: StreamError) -> StreamError {
        self.healthy = false;
        err
    }

    /// Record the outcome of a chained operation.
    pub(crate) fn record(&mut self, result: Result<()>) -> &mut Self {
        if let Err(err) = result {
            self.healthy = false;
            if self.failure.is_none() {
                self.failure = Some(err);
            }
        }
        self
    }

    /// Validate a decoded text/buffer length before allocating for it.
    pub(crate) fn check_len(&mut self, len: usize) -> Result<()> {
        if len > self.config.max_length {
            warn!(len, max = self.config.max_length, "rejected length prefix");
            return Err(self.fail(StreamError::LengthTooLarge {
                len,
                max: self.config.max_length,
            }));
        }

        if self.config.check_remaining {
            let available = self.remaining()?;
            if len as u64 > available {
                warn!(len, available, "length prefix exceeds remaining bytes");
                return Err(self.fail(StreamError::UnexpectedEof {
                    needed: len as u64,
                    available,
                }));
            }
        }
        Ok(())
    }
}

impl<C: ByteChannel> From<&BinaryStream<C>> for bool {
    fn from(stream: &BinaryStream<C>) -> bool {
        stream.is_healthy()
    }
}

impl<C> fmt::Debug for BinaryStream<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryStream")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("healthy", &self.healthy)
            .finish_non_exhaustive()
    }
}
