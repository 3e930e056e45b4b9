use std::collections::VecDeque;

use serde_json::Value;
use ytdln_frame::FrameError;

use crate::error::Result;
use crate::message::StatusMessage;
use crate::transport::{decode_payload, Transport};

/// A transport that keeps both directions in memory.
///
/// Inbound payloads are queued as raw bytes and decoded exactly like frames
/// off the wire, so malformed payloads behave the same way. Once the queue is
/// drained `receive` reports end of input.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<StatusMessage>,
    closed_for_writes: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON value as the next inbound frame.
    pub fn push_json(&mut self, value: &Value) -> &mut Self {
        self.inbound.push_back(value.to_string().into_bytes());
        self
    }

    /// Queue a raw payload as the next inbound frame.
    pub fn push_raw(&mut self, payload: impl Into<Vec<u8>>) -> &mut Self {
        self.inbound.push_back(payload.into());
        self
    }

    /// Make every subsequent `send` fail as if the parent had gone away.
    pub fn close_for_writes(&mut self) {
        self.closed_for_writes = true;
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> &[StatusMessage] {
        &self.sent
    }

    /// Take the sent messages, leaving the log empty.
    pub fn take_sent(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.sent)
    }

    /// Number of inbound frames not yet received.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for MemoryTransport {
    fn receive(&mut self) -> Result<Option<Value>> {
        match self.inbound.pop_front() {
            Some(payload) => decode_payload(&payload).map(Some),
            None => Ok(None),
        }
    }

    fn send(&mut self, message: &StatusMessage) -> Result<()> {
        if self.closed_for_writes {
            return Err(FrameError::ConnectionClosed.into());
        }
        self.sent.push(message.clone());
        Ok(())
    }
}
