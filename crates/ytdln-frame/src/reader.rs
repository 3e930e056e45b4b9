use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{payload_len, Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads frames from a blocking `Read` stream.
///
/// The header is read first, then exactly the announced number of payload
/// bytes, so nothing past the current frame is ever consumed from the stream.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Block until the next frame arrives.
    ///
    /// Returns `Ok(None)` if the stream ends before the first header byte.
    /// Ending anywhere later is `TruncatedHeader` or `TruncatedPayload`.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut header = [0u8; HEADER_SIZE];
        match fill(&mut self.inner, &mut header)? {
            0 => return Ok(None),
            HEADER_SIZE => {}
            received => return Err(FrameError::TruncatedHeader { received }),
        }

        let expected = payload_len(header, self.config.max_payload_size)?;
        let mut payload = BytesMut::zeroed(expected);
        let received = fill(&mut self.inner, &mut payload)?;
        if received < expected {
            return Err(FrameError::TruncatedPayload { expected, received });
        }

        tracing::trace!(bytes = expected, "frame read");
        Ok(Some(Frame::new(payload.freeze())))
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

/// Read into `buf` until it is full or the stream ends; returns bytes read.
fn fill<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(filled)
}
