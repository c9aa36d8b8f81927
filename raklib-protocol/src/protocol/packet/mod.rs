mod error;

pub use error::{BuildError, DecodeError, EncodeError};

use bytes::{Buf, BufMut};

/// Trait for types that know how to encode/decode themselves using
/// the RakNet wire format.
pub trait RaknetEncodable: Sized {
    /// Encode this value into the destination buffer.
    fn encode_raknet(&self, dst: &mut impl BufMut) -> Result<(), EncodeError>;

    /// Decode a value of this type from the source buffer.
    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError>;
}
