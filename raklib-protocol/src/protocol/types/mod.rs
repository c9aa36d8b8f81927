//! Low-level on-the-wire primitives used by the frame codec.
//!
//! This module defines the big-endian integer formats, the 24-bit
//! little-endian "triad" and the frame flags byte.

mod encapsulated_packet_header;
mod ints;
mod primitives;
mod sequence;

pub use encapsulated_packet_header::EncapsulatedPacketHeader;
pub use ints::U24LE;
pub use sequence::Sequence24;
