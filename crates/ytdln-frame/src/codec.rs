use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Length prefix size in bytes.
pub const HEADER_SIZE: usize = 4;

/// Inbound limit when none is configured: 64 MiB, the most a browser will
/// send to a native host in one message.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Largest payload the 4-byte length prefix can describe.
pub const MAX_WIRE_PAYLOAD: usize = u32::MAX as usize;

/// One message, without its length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub payload: Bytes,
}

impl Frame {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Size limits applied by readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest payload accepted, in bytes.
    pub max_payload_size: usize,
}

impl FrameConfig {
    /// Accept anything the length prefix can describe.
    pub fn unbounded() -> Self {
        Self {
            max_payload_size: MAX_WIRE_PAYLOAD,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// Append `payload` to `dst` with its length prefix.
///
/// ```text
/// +----------------+-------------------+
/// | length (u32 LE)| payload           |
/// +----------------+-------------------+
/// ```
///
/// Browsers write the length in native byte order. This crate pins
/// little-endian so the format does not depend on the build target.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let Ok(len) = u32::try_from(payload.len()) else {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_WIRE_PAYLOAD,
        });
    };
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32_le(len);
    dst.extend_from_slice(payload);
    Ok(())
}

/// Payload length announced by a header, checked against `max_payload`.
pub fn payload_len(header: [u8; HEADER_SIZE], max_payload: usize) -> Result<usize> {
    let len = u32::from_le_bytes(header) as usize;
    if len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: len,
            max: max_payload,
        });
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(payload: &[u8]) -> BytesMut {
        let mut dst = BytesMut::new();
        encode_frame(payload, &mut dst).unwrap();
        dst
    }

    #[test]
    fn request_is_prefixed_with_its_length() {
        let request = br#"{"url":"https://example.com/watch?v=1","use_aria2c":false}"#;
        let dst = encoded(request);

        let header: [u8; HEADER_SIZE] = dst[..HEADER_SIZE].try_into().unwrap();
        assert_eq!(payload_len(header, DEFAULT_MAX_PAYLOAD).unwrap(), request.len());
        assert_eq!(dst[HEADER_SIZE..], request[..]);
    }

    #[test]
    fn length_prefix_is_little_endian() {
        let dst = encoded(&[b'x'; 0x0102]);
        assert_eq!(dst[..HEADER_SIZE], [0x02, 0x01, 0x00, 0x00]);
        assert_eq!(dst.len(), HEADER_SIZE + 0x0102);
    }

    #[test]
    fn empty_payload_is_a_bare_header() {
        assert_eq!(encoded(b"")[..], [0, 0, 0, 0]);
    }

    #[test]
    fn frames_append_back_to_back() {
        let mut dst = encoded(b"{}");
        encode_frame(b"[]", &mut dst).unwrap();
        assert_eq!(dst[..], *b"\x02\x00\x00\x00{}\x02\x00\x00\x00[]");
    }

    #[test]
    fn oversized_length_is_rejected_from_the_header_alone() {
        let header = (128u32 * 1024 * 1024).to_le_bytes();

        let err = payload_len(header, DEFAULT_MAX_PAYLOAD).unwrap_err();

        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size, max }
                if size == 128 * 1024 * 1024 && max == DEFAULT_MAX_PAYLOAD
        ));
    }

    #[test]
    fn payload_len_checks_limit() {
        assert_eq!(payload_len([0x10, 0, 0, 0], 16).unwrap(), 16);
        assert!(matches!(
            payload_len([0x11, 0, 0, 0], 16),
            Err(FrameError::PayloadTooLarge { size: 17, max: 16 })
        ));
    }

    #[test]
    fn unbounded_config_accepts_any_wire_length() {
        let config = FrameConfig::unbounded();
        assert_eq!(
            payload_len([0xff; HEADER_SIZE], config.max_payload_size).unwrap(),
            u32::MAX as usize
        );
    }
}
