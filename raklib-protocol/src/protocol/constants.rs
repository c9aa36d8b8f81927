//! Protocol-level constants for the encapsulated packet (frame) layout.
//!
//! These values are part of the wire-level contract and must not change.

use bitflags::bitflags;

/// Number of bits the reliability ordinal is shifted by in the flags byte.
pub const RELIABILITY_SHIFT: u8 = 5;
/// Mask selecting the reliability bits of the flags byte.
pub const RELIABILITY_FLAGS: u8 = 0b111 << RELIABILITY_SHIFT;

bitflags! {
    /// Single-bit flags carried next to the reliability in the first frame byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct FrameFlags: u8 {
        /// Frame is one fragment of a larger message.
        const SPLIT = 0b0001_0000;
    }
}

/// Flags byte + 16-bit bit length.
pub const WIRE_HEADER_SIZE: usize = 3;
/// Flags byte + 32-bit byte length + 32-bit ACK identifier.
pub const INTERNAL_HEADER_SIZE: usize = 9;

/// Size of the message index (u24).
pub const MESSAGE_INDEX_SIZE: usize = 3;
/// Size of the order index (u24) and order channel (u8).
pub const ORDER_INFO_SIZE: usize = 4;
/// Size of split count (u32), split id (u16) and split index (u32).
pub const SPLIT_INFO_SIZE: usize = 10;

/// Largest payload whose length in bits still fits the u16 wire field.
pub const MAX_WIRE_PAYLOAD_SIZE: usize = (u16::MAX as usize) >> 3;

/// Default upper bound on payloads accepted by the streaming codec.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1 << 20;

const _: () = {
    assert!(
        MAX_WIRE_PAYLOAD_SIZE == 8191,
        "MAX_WIRE_PAYLOAD_SIZE must match the 16-bit bit-length field"
    );
    assert!(RELIABILITY_FLAGS & FrameFlags::SPLIT.bits() == 0);
};
