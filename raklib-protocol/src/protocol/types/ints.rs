use bytes::{Buf, BufMut};
use std::mem;

use crate::protocol::packet::{DecodeError, EncodeError, RaknetEncodable};

/// Internal helper macro implementing big-endian integer encoding/decoding
/// for a concrete integer type.
macro_rules! impl_raknet_int {
    ($ty:ty, $put:ident, $get:ident) => {
        impl RaknetEncodable for $ty {
            fn encode_raknet(&self, dst: &mut impl BufMut) -> Result<(), EncodeError> {
                dst.$put(*self as _);
                Ok(())
            }

            fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
                let size = mem::size_of::<$ty>();
                if src.remaining() < size {
                    return Err(DecodeError::UnexpectedEof);
                }
                Ok(src.$get() as $ty)
            }
        }
    };
}

// Length fields, split count/id/index and the ACK identifier.
impl_raknet_int!(u16, put_u16, get_u16);
impl_raknet_int!(u32, put_u32, get_u32);

/// Little-endian 24-bit unsigned integer wrapper (3-byte "triad").
pub struct U24LE(pub u32);

impl RaknetEncodable for U24LE {
    fn encode_raknet(&self, dst: &mut impl BufMut) -> Result<(), EncodeError> {
        // Bits above 24 are dropped.
        dst.put_uint_le(u64::from(self.0 & 0x00FF_FFFF), 3);
        Ok(())
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if src.remaining() < 3 {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(U24LE(src.get_uint_le(3) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn u24le_byte_order() {
        let mut buf = BytesMut::new();
        U24LE(0x00_12_34_56).encode_raknet(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x56, 0x34, 0x12]);

        let mut slice = buf.freeze();
        assert_eq!(U24LE::decode_raknet(&mut slice).unwrap().0, 0x12_34_56);
    }

    #[test]
    fn u16_is_big_endian() {
        let mut buf = BytesMut::new();
        0x0102u16.encode_raknet(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01, 0x02]);
    }

    #[test]
    fn short_reads_fail() {
        let mut two: &[u8] = &[0, 0];
        assert_eq!(
            U24LE::decode_raknet(&mut two).err(),
            Some(DecodeError::UnexpectedEof)
        );
        let mut three: &[u8] = &[0, 0, 0];
        assert_eq!(
            u32::decode_raknet(&mut three),
            Err(DecodeError::UnexpectedEof)
        );
        // A failed read must not consume anything.
        assert_eq!(three.len(), 3);
    }
}
