use std::io::{Read, StdinLock, StdoutLock, Write};

use serde::Serialize;
use serde_json::Value;
use ytdln_frame::{FrameConfig, FrameReader, FrameWriter};

use crate::error::Result;
use crate::message::StatusMessage;

/// Bidirectional message channel to the parent application.
///
/// There is a single reader and a single writer; implementations need no
/// internal locking.
pub trait Transport {
    /// Block for the next inbound JSON value.
    ///
    /// Returns `Ok(None)` once the parent has closed its end of the stream.
    fn receive(&mut self) -> Result<Option<Value>>;

    /// Send one status message and flush it.
    fn send(&mut self, message: &StatusMessage) -> Result<()>;
}

/// Length-prefixed JSON over a reader/writer pair.
pub struct FramedTransport<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
}

/// The transport used by the host binary.
pub type StdioTransport = FramedTransport<StdinLock<'static>, StdoutLock<'static>>;

/// Lock the process's standard streams for framed I/O.
///
/// Nothing else may write to stdout once this is held; logs go to stderr.
pub fn stdio(config: FrameConfig) -> StdioTransport {
    FramedTransport::with_config(std::io::stdin().lock(), std::io::stdout().lock(), config)
}

impl<R: Read, W: Write> FramedTransport<R, W> {
    /// Create a transport with default frame configuration.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, FrameConfig::default())
    }

    /// Create a transport whose inbound frames are limited by `config`.
    ///
    /// Outbound frames are bounded only by the length prefix, so a status
    /// message always reaches the parent whatever inbound limit is set.
    pub fn with_config(reader: R, writer: W, config: FrameConfig) -> Self {
        Self {
            reader: FrameReader::with_config(reader, config),
            writer: FrameWriter::with_config(writer, FrameConfig::unbounded()),
        }
    }

    /// Read one frame and parse its payload as JSON.
    pub fn recv_json(&mut self) -> Result<Option<Value>> {
        match self.reader.read_frame()? {
            Some(frame) => decode_payload(frame.payload.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    /// Serialize `value` as JSON and send it as one frame.
    pub fn send_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let payload = serde_json::to_vec(value)?;
        self.writer.send(&payload)?;
        Ok(())
    }

    /// Split the transport back into its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}

impl<R: Read, W: Write> Transport for FramedTransport<R, W> {
    fn receive(&mut self) -> Result<Option<Value>> {
        self.recv_json()
    }

    fn send(&mut self, message: &StatusMessage) -> Result<()> {
        self.send_json(message)
    }
}

/// Parse a frame payload: UTF-8 first, then JSON.
///
/// An empty payload is not valid JSON and is rejected.
pub(crate) fn decode_payload(payload: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;
    use serde_json::json;
    use ytdln_frame::{encode_frame, FrameError};

    use super::*;
    use crate::error::ProtocolError;

    fn inbound(payloads: &[&[u8]]) -> Cursor<Vec<u8>> {
        let mut wire = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut wire).unwrap();
        }
        Cursor::new(wire.to_vec())
    }

    fn transport(payloads: &[&[u8]]) -> FramedTransport<Cursor<Vec<u8>>, Vec<u8>> {
        FramedTransport::new(inbound(payloads), Vec::new())
    }

    #[test]
    fn json_value_roundtrip() {
        let values = [
            json!({"url": "https://example.com", "use_aria2c": true}),
            json!({"nested": {"list": [1, 2, {"deep": ""}]}, "empty": ""}),
            json!(""),
            json!([]),
            json!(null),
        ];

        let mut writer = FramedTransport::new(Cursor::new(Vec::<u8>::new()), Vec::<u8>::new());
        for value in &values {
            writer.send_json(value).unwrap();
        }
        let (_, wire) = writer.into_parts();

        let mut reader = FramedTransport::new(Cursor::new(wire), Vec::<u8>::new());
        for value in &values {
            assert_eq!(reader.recv_json().unwrap().as_ref(), Some(value));
        }
        assert!(reader.recv_json().unwrap().is_none());
    }

    #[test]
    fn empty_stream_is_end_of_input() {
        let mut transport = transport(&[]);
        assert!(transport.receive().unwrap().is_none());
    }

    #[test]
    fn empty_payload_is_a_json_error() {
        let mut transport = transport(&[b""]);
        let err = transport.receive().unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn invalid_utf8_payload_is_rejected() {
        let mut transport = transport(&[b"{\xff}"]);
        let err = transport.receive().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidUtf8(_)));
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let mut transport = transport(&[b"url=https://example.com"]);
        let err = transport.receive().unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn truncated_prefix_is_a_frame_error() {
        let mut transport =
            FramedTransport::new(Cursor::new(vec![0x02u8, 0x00]), Vec::<u8>::new());
        let err = transport.receive().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Frame(FrameError::TruncatedHeader { received: 2 })
        ));
    }

    #[test]
    fn status_message_is_written_as_one_frame() {
        let mut transport = transport(&[]);
        transport.send(&StatusMessage::progress(12.5)).unwrap();

        let (_, wire) = transport.into_parts();
        let body = br#"{"status":"progress","progress":12.5}"#;
        assert_eq!(&wire[..4], &(body.len() as u32).to_le_bytes());
        assert_eq!(&wire[4..], body);
    }

    #[test]
    fn inbound_limit_does_not_cap_replies() {
        let config = FrameConfig {
            max_payload_size: 8,
        };
        let mut transport =
            FramedTransport::with_config(inbound(&[b"[1, 2, 3, 4]"]), Vec::<u8>::new(), config);
        let stderr = "ERROR: unable to download video data: HTTP Error 403: Forbidden";

        transport.send(&StatusMessage::error(stderr)).unwrap();
        let err = transport.receive().unwrap_err();

        assert!(matches!(
            err,
            ProtocolError::Frame(FrameError::PayloadTooLarge { size: 12, max: 8 })
        ));
        let (_, wire) = transport.into_parts();
        let mut replies = FramedTransport::new(Cursor::new(wire), Vec::<u8>::new());
        assert_eq!(
            replies.recv_json().unwrap(),
            Some(json!({"status": "error", "message": stderr}))
        );
    }
}
