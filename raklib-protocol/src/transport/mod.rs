//! Stream adapters around the frame codec.

mod codec;

pub use codec::{EncapsulatedCodec, EncapsulatedCodecConfig};
