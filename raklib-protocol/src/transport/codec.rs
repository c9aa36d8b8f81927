use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::CodecError;
use crate::protocol::{
    constants::DEFAULT_MAX_PAYLOAD_SIZE,
    encapsulated_packet::{CodecMode, EncapsulatedPacket},
    packet::{DecodeError, EncodeError},
};

/// Settings for [`EncapsulatedCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulatedCodecConfig {
    pub mode: CodecMode,
    pub max_payload_size: usize,
}

impl Default for EncapsulatedCodecConfig {
    fn default() -> Self {
        Self {
            mode: CodecMode::Wire,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// A codec for back-to-back encapsulated packets in a byte stream.
///
/// Typically used in [`CodecMode::Internal`] to persist frames waiting for
/// acknowledgement and read them back; decoding waits until a whole frame is
/// buffered.
#[derive(Debug, Clone, Default)]
pub struct EncapsulatedCodec {
    config: EncapsulatedCodecConfig,
}

impl EncapsulatedCodec {
    pub fn new(config: impl Into<EncapsulatedCodecConfig>) -> Self {
        Self {
            config: config.into(),
        }
    }

    pub fn mode(&self) -> CodecMode {
        self.config.mode
    }

    /// Effective payload limit: the configured one, capped by the mode.
    pub fn max_payload_size(&self) -> usize {
        self.config
            .max_payload_size
            .min(self.config.mode.max_payload_size())
    }
}

impl Decoder for EncapsulatedCodec {
    type Item = EncapsulatedPacket;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mode = self.config.mode;
        let Some((frame_len, payload_len)) = EncapsulatedPacket::peek_len(src, mode)? else {
            return Ok(None);
        };

        let max = self.max_payload_size();
        if payload_len > max {
            tracing::debug!(payload_len, max, "rejecting_oversized_frame");
            return Err(DecodeError::PayloadTooLarge {
                len: payload_len,
                max,
            }
            .into());
        }

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(frame_len).freeze();
        let packet = EncapsulatedPacket::decode_from(&mut frame, mode)?;
        tracing::trace!(frame_len, reliability = ?packet.reliability(), "frame_decoded");
        Ok(Some(packet))
    }
}

impl Encoder<EncapsulatedPacket> for EncapsulatedCodec {
    type Error = CodecError;

    fn encode(&mut self, item: EncapsulatedPacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = item.length();
        let max = self.max_payload_size();
        if len > max {
            return Err(EncodeError::PayloadTooLarge { len, max }.into());
        }

        let mode = self.config.mode;
        dst.reserve(item.encoded_len(mode));
        item.encode_into(dst, mode)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::EncapsulatedCodecBuilder;
    use crate::protocol::reliability::Reliability;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn stored(message_index: u32, ack: u32, payload: &[u8]) -> EncapsulatedPacket {
        EncapsulatedPacket::builder(Reliability::ReliableOrderedWithAckReceipt)
            .message_index(message_index)
            .order(message_index, 1)
            .identifier_ack(ack)
            .payload(payload.to_vec())
            .build()
            .unwrap()
    }

    #[test]
    fn internal_store_roundtrip() {
        init_tracing();
        let mut codec = EncapsulatedCodecBuilder::new()
            .mode(CodecMode::Internal)
            .build();

        let packets: Vec<_> = (0..3).map(|i| stored(i, 100 + i, &[i as u8; 20])).collect();
        let mut store = BytesMut::new();
        for p in &packets {
            codec.encode(p.clone(), &mut store).unwrap();
        }

        for p in &packets {
            assert_eq!(codec.decode(&mut store).unwrap().as_ref(), Some(p));
        }
        assert!(store.is_empty());
        assert!(codec.decode(&mut store).unwrap().is_none());
    }

    #[test]
    fn waits_for_complete_frame() {
        init_tracing();
        let mut codec = EncapsulatedCodecBuilder::new()
            .mode(CodecMode::Internal)
            .build();
        let packet = stored(5, 42, b"partial delivery");
        let mut encoded = BytesMut::new();
        codec.encode(packet.clone(), &mut encoded).unwrap();

        let mut src = BytesMut::new();
        let last = encoded.len() - 1;
        for (i, b) in encoded.iter().enumerate() {
            src.extend_from_slice(&[*b]);
            let out = codec.decode(&mut src).unwrap();
            if i < last {
                assert!(out.is_none(), "decoded early at byte {i}");
            } else {
                assert_eq!(out, Some(packet.clone()));
            }
        }
    }

    #[test]
    fn rejects_oversized_frames() {
        init_tracing();
        let mut codec = EncapsulatedCodecBuilder::new()
            .mode(CodecMode::Internal)
            .max_payload_size(8)
            .build();

        let mut dst = BytesMut::new();
        let err = codec
            .encode(stored(0, 0, &[0u8; 9]), &mut dst)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Encode(EncodeError::PayloadTooLarge { len: 9, max: 8 })
        ));
        assert!(dst.is_empty());

        // Header declares 9 bytes; rejected before the payload arrives.
        let mut src = BytesMut::from(&[0x00u8, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00][..]);
        let err = codec.decode(&mut src).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode(DecodeError::PayloadTooLarge { len: 9, max: 8 })
        ));
    }

    #[test]
    fn internal_encode_needs_identifier() {
        let mut codec = EncapsulatedCodecBuilder::new()
            .mode(CodecMode::Internal)
            .build();
        let packet = EncapsulatedPacket::builder(Reliability::Unreliable)
            .payload(vec![1u8])
            .build()
            .unwrap();
        let err = codec.encode(packet, &mut BytesMut::new()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Encode(EncodeError::MissingIdentifierAck)
        ));
    }

    #[test]
    fn trailing_bytes_at_eof_are_an_error() {
        let mut codec = EncapsulatedCodec::default();
        let mut src = BytesMut::from(&[0x00u8, 0x00][..]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(matches!(
            codec.decode_eof(&mut src),
            Err(CodecError::Io(_))
        ));
    }

    #[test]
    fn wire_mode_drops_identifier() {
        let mut codec = EncapsulatedCodec::default();
        let packet = stored(1, 77, b"wire");
        let mut dst = BytesMut::new();
        codec.encode(packet.clone(), &mut dst).unwrap();
        assert_eq!(dst.len(), packet.total_length());

        let decoded = codec.decode(&mut dst).unwrap().unwrap();
        assert_eq!(decoded.identifier_ack(), None);
        assert_eq!(decoded.payload(), packet.payload());
    }
}
