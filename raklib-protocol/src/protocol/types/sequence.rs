use crate::protocol::{
    packet::{DecodeError, EncodeError, RaknetEncodable},
    types::U24LE,
};

const MASK: u32 = (1 << 24) - 1;

/// 24-bit index used for message and order indexes.
///
/// Values are masked to 24 bits on construction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Sequence24(u32);

impl Sequence24 {
    pub fn new(v: u32) -> Sequence24 {
        Sequence24(v & MASK)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl RaknetEncodable for Sequence24 {
    fn encode_raknet(&self, dst: &mut impl bytes::BufMut) -> Result<(), EncodeError> {
        U24LE(self.0).encode_raknet(dst)
    }

    fn decode_raknet(src: &mut impl bytes::Buf) -> Result<Self, DecodeError> {
        Ok(Sequence24::new(U24LE::decode_raknet(src)?.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn masks_to_24_bits() {
        assert_eq!(Sequence24::new(0x0100_0005).value(), 5);
        assert_eq!(Sequence24::new(u32::MAX).value(), MASK);
    }

    #[test]
    fn encodes_as_triad() {
        let mut buf = BytesMut::new();
        Sequence24::new(0x00AB_CDEF).encode_raknet(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0xEF, 0xCD, 0xAB]);

        let mut slice = buf.freeze();
        assert_eq!(
            Sequence24::decode_raknet(&mut slice).unwrap(),
            Sequence24::new(0x00AB_CDEF)
        );
    }
}
