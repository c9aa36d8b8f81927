mod codec;

pub use codec::EncapsulatedCodecBuilder;
