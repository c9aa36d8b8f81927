use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::protocol::{
    constants::{INTERNAL_HEADER_SIZE, MAX_WIRE_PAYLOAD_SIZE, SPLIT_INFO_SIZE, WIRE_HEADER_SIZE},
    packet::{BuildError, DecodeError, EncodeError, RaknetEncodable},
    reliability::Reliability,
    types::{EncapsulatedPacketHeader, Sequence24},
};

/// Serialization shape of an encapsulated packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecMode {
    /// Network form: 16-bit length in bits, no ACK identifier.
    #[default]
    Wire,
    /// Local retransmission storage: 32-bit byte length plus ACK identifier.
    /// Never sent to a peer. Encoding requires an identifier ACK to be set.
    Internal,
}

impl CodecMode {
    /// Size of the fixed header (flags + length [+ ACK identifier]).
    #[inline]
    pub fn header_size(self) -> usize {
        match self {
            CodecMode::Wire => WIRE_HEADER_SIZE,
            CodecMode::Internal => INTERNAL_HEADER_SIZE,
        }
    }

    /// Largest payload the length field of this mode can describe.
    #[inline]
    pub fn max_payload_size(self) -> usize {
        match self {
            CodecMode::Wire => MAX_WIRE_PAYLOAD_SIZE,
            CodecMode::Internal => u32::MAX as usize,
        }
    }
}

/// Position of a frame within one ordering/sequencing channel.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OrderInfo {
    pub index: Sequence24,
    pub channel: u8,
}

/// Fragment metadata; the reassembly buffer keys on `(id, index)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SplitInfo {
    pub count: u32,
    pub id: u16,
    pub index: u32,
}

/// One frame: a payload plus the reliability, ordering and split metadata the
/// transport needs to deliver it.
///
/// Which optional fields exist is decided by the reliability alone. Records
/// come either from [`EncapsulatedPacket::builder`], which enforces that, or
/// from decoding, which derives it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EncapsulatedPacket {
    reliability: Reliability,
    message_index: Option<Sequence24>,
    order: Option<OrderInfo>,
    split: Option<SplitInfo>,
    payload: Bytes,
    need_ack: bool,
    identifier_ack: Option<u32>,
}

/// Recovers the byte length from the wire bit length, rounding up.
///
/// Bit lengths above `MAX_WIRE_PAYLOAD_SIZE * 8` round up to a payload the
/// wire format cannot re-encode and are rejected.
#[inline]
fn wire_payload_len(bits: u16) -> Result<usize, DecodeError> {
    let len = ((bits as usize) + 7) >> 3;
    if len > MAX_WIRE_PAYLOAD_SIZE {
        return Err(DecodeError::PayloadTooLarge {
            len,
            max: MAX_WIRE_PAYLOAD_SIZE,
        });
    }
    Ok(len)
}

/// Total frame size for a header plus `payload_len` bytes of payload.
#[inline]
fn frame_len(
    mode: CodecMode,
    header: EncapsulatedPacketHeader,
    payload_len: usize,
) -> Result<usize, DecodeError> {
    let split = if header.is_split { SPLIT_INFO_SIZE } else { 0 };
    let overhead = mode.header_size() + header.reliability.header_size() + split;
    overhead
        .checked_add(payload_len)
        .ok_or(DecodeError::PayloadTooLarge {
            len: payload_len,
            max: usize::MAX - overhead,
        })
}

impl EncapsulatedPacket {
    pub fn builder(reliability: Reliability) -> EncapsulatedPacketBuilder {
        EncapsulatedPacketBuilder::new(reliability)
    }

    pub fn reliability(&self) -> Reliability {
        self.reliability
    }

    pub fn header(&self) -> EncapsulatedPacketHeader {
        EncapsulatedPacketHeader::new(self.reliability, self.split.is_some())
    }

    pub fn has_split(&self) -> bool {
        self.split.is_some()
    }

    /// Payload length in bytes.
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    pub fn message_index(&self) -> Option<Sequence24> {
        self.message_index
    }

    pub fn order(&self) -> Option<OrderInfo> {
        self.order
    }

    pub fn order_index(&self) -> Option<Sequence24> {
        self.order.map(|o| o.index)
    }

    pub fn order_channel(&self) -> Option<u8> {
        self.order.map(|o| o.channel)
    }

    pub fn split(&self) -> Option<SplitInfo> {
        self.split
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn is_reliable(&self) -> bool {
        self.reliability.is_reliable()
    }

    pub fn is_sequenced(&self) -> bool {
        self.reliability.is_sequenced()
    }

    /// Local hint for the sending session; never serialized.
    pub fn need_ack(&self) -> bool {
        self.need_ack
    }

    pub fn set_need_ack(&mut self, need_ack: bool) {
        self.need_ack = need_ack;
    }

    pub fn identifier_ack(&self) -> Option<u32> {
        self.identifier_ack
    }

    pub fn set_identifier_ack(&mut self, identifier_ack: Option<u32>) {
        self.identifier_ack = identifier_ack;
    }

    /// Removes the ACK identifier, e.g. before handing a stored frame back to
    /// the wire path.
    pub fn take_identifier_ack(&mut self) -> Option<u32> {
        self.identifier_ack.take()
    }

    /// Encoded size of this frame in the given mode.
    pub fn encoded_len(&self, mode: CodecMode) -> usize {
        let split = if self.split.is_some() {
            SPLIT_INFO_SIZE
        } else {
            0
        };
        mode.header_size() + self.reliability.header_size() + split + self.payload.len()
    }

    /// Total on-wire size (header + payload) of this encapsulated packet.
    pub fn total_length(&self) -> usize {
        self.encoded_len(CodecMode::Wire)
    }

    /// Reads the fixed header at the start of `src` and returns
    /// `(frame length, payload length)` without consuming anything.
    ///
    /// Returns `Ok(None)` while the fixed header is incomplete.
    pub fn peek_len(
        src: &[u8],
        mode: CodecMode,
    ) -> Result<Option<(usize, usize)>, DecodeError> {
        let Some(&flags) = src.first() else {
            return Ok(None);
        };
        let header = EncapsulatedPacketHeader::from_byte(flags)?;
        if src.len() < mode.header_size() {
            return Ok(None);
        }

        let mut rest = &src[1..];
        let payload_len = match mode {
            CodecMode::Wire => wire_payload_len(u16::decode_raknet(&mut rest)?)?,
            CodecMode::Internal => u32::decode_raknet(&mut rest)? as usize,
        };

        Ok(Some((frame_len(mode, header, payload_len)?, payload_len)))
    }

    /// Decodes one frame starting at `offset` and returns it together with the
    /// offset just past it, so a framer can continue with the next frame.
    pub fn decode(
        src: &[u8],
        mode: CodecMode,
        offset: usize,
    ) -> Result<(Self, usize), DecodeError> {
        let mut cursor = src.get(offset..).ok_or(DecodeError::UnexpectedEof)?;
        let available = cursor.len();
        let packet = Self::decode_from(&mut cursor, mode)?;
        Ok((packet, offset + (available - cursor.len())))
    }

    /// Decodes one frame from the front of `src`, advancing it past the frame.
    pub fn decode_from(src: &mut impl Buf, mode: CodecMode) -> Result<Self, DecodeError> {
        // 1) flags / header byte
        let header = EncapsulatedPacketHeader::decode_raknet(src)?;

        // 2) length (+ ACK identifier when stored locally)
        let (payload_len, identifier_ack) = match mode {
            CodecMode::Wire => (wire_payload_len(u16::decode_raknet(src)?)?, None),
            CodecMode::Internal => {
                let len = u32::decode_raknet(src)? as usize;
                (len, Some(u32::decode_raknet(src)?))
            }
        };

        // 3) reliability-dependent indexes
        let rel = header.reliability;
        let mut message_index = None;
        let mut order = None;
        if rel > Reliability::Unreliable {
            if rel.carries_message_index() {
                message_index = Some(Sequence24::decode_raknet(src)?);
            }
            if rel.carries_ordering() {
                let index = Sequence24::decode_raknet(src)?;
                let channel = u8::decode_raknet(src)?;
                order = Some(OrderInfo { index, channel });
            }
        }

        // 4) split metadata
        let split = if header.is_split {
            let count = u32::decode_raknet(src)?;
            let id = u16::decode_raknet(src)?;
            let index = u32::decode_raknet(src)?;
            Some(SplitInfo { count, id, index })
        } else {
            None
        };

        // 5) payload
        if src.remaining() < payload_len {
            return Err(DecodeError::TruncatedPayload {
                expected: payload_len,
                remaining: src.remaining(),
            });
        }
        let payload = src.copy_to_bytes(payload_len);

        Ok(EncapsulatedPacket {
            reliability: rel,
            message_index,
            order,
            split,
            payload,
            need_ack: false,
            identifier_ack,
        })
    }

    /// Decodes every frame in `src` back to back.
    ///
    /// A single malformed frame fails the whole bundle.
    pub fn decode_bundle(src: &[u8], mode: CodecMode) -> Result<Vec<Self>, DecodeError> {
        let mut packets = Vec::new();
        let mut offset = 0;
        while offset < src.len() {
            match Self::decode(src, mode, offset) {
                Ok((packet, next)) => {
                    packets.push(packet);
                    offset = next;
                }
                Err(e) => {
                    tracing::debug!(
                        error = ?e,
                        offset,
                        decoded = packets.len(),
                        "dropping_malformed_bundle"
                    );
                    return Err(e);
                }
            }
        }
        Ok(packets)
    }

    /// Encodes this frame into `dst`.
    ///
    /// Nothing is written when an error is returned.
    pub fn encode_into(
        &self,
        dst: &mut impl BufMut,
        mode: CodecMode,
    ) -> Result<(), EncodeError> {
        let len = self.payload.len();
        let max = mode.max_payload_size();
        if len > max {
            return Err(EncodeError::PayloadTooLarge { len, max });
        }
        let identifier_ack = match mode {
            CodecMode::Internal => {
                Some(self.identifier_ack.ok_or(EncodeError::MissingIdentifierAck)?)
            }
            CodecMode::Wire => {
                if let Some(id) = self.identifier_ack {
                    tracing::trace!(identifier_ack = id, "identifier_ack_not_transmitted");
                }
                None
            }
        };

        // 1) flags byte
        self.header().encode_raknet(dst)?;

        // 2) length
        match identifier_ack {
            Some(id) => {
                (len as u32).encode_raknet(dst)?;
                id.encode_raknet(dst)?;
            }
            None => ((len << 3) as u16).encode_raknet(dst)?,
        }

        // 3) reliability-dependent indexes
        let rel = self.reliability;
        if rel > Reliability::Unreliable {
            if rel.is_reliable() {
                if let Some(index) = self.message_index {
                    index.encode_raknet(dst)?;
                }
            }
            if rel.is_sequenced() {
                if let Some(order) = self.order {
                    order.index.encode_raknet(dst)?;
                    order.channel.encode_raknet(dst)?;
                }
            }
        }

        // 4) split metadata
        if let Some(split) = &self.split {
            split.count.encode_raknet(dst)?;
            split.id.encode_raknet(dst)?;
            split.index.encode_raknet(dst)?;
        }

        // 5) payload
        dst.put_slice(&self.payload);
        Ok(())
    }

    pub fn encode(&self, mode: CodecMode) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::with_capacity(self.encoded_len(mode));
        self.encode_into(&mut buf, mode)?;
        Ok(buf.freeze())
    }
}

impl RaknetEncodable for EncapsulatedPacket {
    fn encode_raknet(&self, dst: &mut impl BufMut) -> Result<(), EncodeError> {
        self.encode_into(dst, CodecMode::Wire)
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        Self::decode_from(src, CodecMode::Wire)
    }
}

/// Assembles an [`EncapsulatedPacket`], checking on [`build`] that the
/// optional fields match the reliability.
///
/// [`build`]: EncapsulatedPacketBuilder::build
#[derive(Debug, Clone)]
pub struct EncapsulatedPacketBuilder {
    reliability: Reliability,
    message_index: Option<Sequence24>,
    order: Option<OrderInfo>,
    split: Option<SplitInfo>,
    payload: Bytes,
    need_ack: bool,
    identifier_ack: Option<u32>,
}

impl EncapsulatedPacketBuilder {
    pub fn new(reliability: Reliability) -> Self {
        Self {
            reliability,
            message_index: None,
            order: None,
            split: None,
            payload: Bytes::new(),
            need_ack: false,
            identifier_ack: None,
        }
    }

    #[must_use]
    pub fn message_index(mut self, index: u32) -> Self {
        self.message_index = Some(Sequence24::new(index));
        self
    }

    #[must_use]
    pub fn order(mut self, index: u32, channel: u8) -> Self {
        self.order = Some(OrderInfo {
            index: Sequence24::new(index),
            channel,
        });
        self
    }

    #[must_use]
    pub fn split(mut self, count: u32, id: u16, index: u32) -> Self {
        self.split = Some(SplitInfo { count, id, index });
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    #[must_use]
    pub fn need_ack(mut self, need_ack: bool) -> Self {
        self.need_ack = need_ack;
        self
    }

    #[must_use]
    pub fn identifier_ack(mut self, identifier_ack: u32) -> Self {
        self.identifier_ack = Some(identifier_ack);
        self
    }

    pub fn build(self) -> Result<EncapsulatedPacket, BuildError> {
        let rel = self.reliability;
        match (rel.is_reliable(), self.message_index.is_some()) {
            (true, false) => return Err(BuildError::MissingMessageIndex(rel)),
            (false, true) => return Err(BuildError::UnexpectedMessageIndex(rel)),
            _ => {}
        }
        match (rel.is_sequenced(), self.order.is_some()) {
            (true, false) => return Err(BuildError::MissingOrdering(rel)),
            (false, true) => return Err(BuildError::UnexpectedOrdering(rel)),
            _ => {}
        }
        if let Some(split) = self.split {
            if split.count == 0 {
                return Err(BuildError::EmptySplit);
            }
            if split.index >= split.count {
                return Err(BuildError::SplitIndexOutOfRange {
                    index: split.index,
                    count: split.count,
                });
            }
        }

        Ok(EncapsulatedPacket {
            reliability: rel,
            message_index: self.message_index,
            order: self.order,
            split: self.split,
            payload: self.payload,
            need_ack: self.need_ack,
            identifier_ack: self.identifier_ack,
        })
    }
}
