use bytes::{Buf, BufMut};

use crate::protocol::{
    constants::{FrameFlags, RELIABILITY_FLAGS, RELIABILITY_SHIFT},
    packet::{DecodeError, EncodeError, RaknetEncodable},
    reliability::Reliability,
};

/// Header byte of a RakNet encapsulated packet (frame).
///
/// Layout on the wire (first byte of the frame):
///   bits 7..5: reliability (0..7)
///   bit 4:     split flag
///   bits 3..0: unused, ignored on decode and written as zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulatedPacketHeader {
    pub reliability: Reliability,
    pub is_split: bool,
}

impl EncapsulatedPacketHeader {
    pub fn new(reliability: Reliability, is_split: bool) -> Self {
        Self {
            reliability,
            is_split,
        }
    }

    /// Convert this header into the raw header byte.
    #[inline]
    pub fn to_byte(self) -> u8 {
        let mut flags = FrameFlags::empty();
        flags.set(FrameFlags::SPLIT, self.is_split);
        ((self.reliability as u8) << RELIABILITY_SHIFT) | flags.bits()
    }

    /// Construct a header from the raw header byte.
    #[inline]
    pub fn from_byte(b: u8) -> Result<Self, DecodeError> {
        let reliability = Reliability::try_from((b & RELIABILITY_FLAGS) >> RELIABILITY_SHIFT)?;
        let is_split = FrameFlags::from_bits_truncate(b).contains(FrameFlags::SPLIT);

        Ok(Self {
            reliability,
            is_split,
        })
    }
}

impl RaknetEncodable for EncapsulatedPacketHeader {
    fn encode_raknet(&self, dst: &mut impl BufMut) -> Result<(), EncodeError> {
        dst.put_u8(self.to_byte());
        Ok(())
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if !src.has_remaining() {
            return Err(DecodeError::UnexpectedEof);
        }
        let b = src.get_u8();
        EncapsulatedPacketHeader::from_byte(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_header_fields() {
        for reliability in Reliability::ALL {
            for is_split in [false, true] {
                let header = EncapsulatedPacketHeader::new(reliability, is_split);
                let decoded = EncapsulatedPacketHeader::from_byte(header.to_byte()).unwrap();
                assert_eq!(decoded, header);
            }
        }
    }

    #[test]
    fn known_bytes() {
        let header = EncapsulatedPacketHeader::new(Reliability::ReliableOrdered, true);
        assert_eq!(header.to_byte(), 0b0111_0000);
        assert_eq!(
            EncapsulatedPacketHeader::new(Reliability::ReliableOrderedWithAckReceipt, false)
                .to_byte(),
            0b1110_0000
        );
    }

    #[test]
    fn low_bits_are_ignored() {
        let header = EncapsulatedPacketHeader::from_byte(0b0100_1111).unwrap();
        assert_eq!(header.reliability, Reliability::Reliable);
        assert!(!header.is_split);
    }
}
