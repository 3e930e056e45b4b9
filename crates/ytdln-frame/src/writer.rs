use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::{FrameError, Result};

/// Outbound status messages are small; this covers all but pathological ones.
const SCRATCH_CAPACITY: usize = 1024;

/// Sends frames on a `Write` stream, one flush per frame.
///
/// The parent reads replies as they arrive, so nothing is left sitting in a
/// buffer between frames.
pub struct FrameWriter<T> {
    inner: T,
    scratch: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            scratch: BytesMut::with_capacity(SCRATCH_CAPACITY),
            config,
        }
    }

    /// Prefix `payload` with its length, write both and flush.
    ///
    /// Oversized payloads are rejected before anything reaches the stream.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        let max = self.config.max_payload_size;
        if payload.len() > max {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }

        self.scratch.clear();
        encode_frame(payload, &mut self.scratch)?;
        write_fully(&mut self.inner, &self.scratch)?;
        self.flush()?;

        tracing::trace!(bytes = self.scratch.len(), "frame written");
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        retry_interrupted(|| self.inner.flush())?;
        Ok(())
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Write every byte of `bytes`, tolerating short writes and `EINTR`.
///
/// A write that accepts zero bytes means the reader has gone away.
fn write_fully<W: Write>(sink: &mut W, mut bytes: &[u8]) -> Result<()> {
    while !bytes.is_empty() {
        let written = retry_interrupted(|| sink.write(bytes))?;
        if written == 0 {
            return Err(FrameError::ConnectionClosed);
        }
        bytes = &bytes[written..];
    }
    Ok(())
}

fn retry_interrupted<R>(mut op: impl FnMut() -> io::Result<R>) -> io::Result<R> {
    loop {
        match op() {
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}
