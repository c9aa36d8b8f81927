use thiserror::Error;

use crate::protocol::reliability::Reliability;

/// Errors that may occur while encoding an encapsulated packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The payload does not fit the length field of the selected mode.
    #[error("Payload of {len} bytes exceeds the maximum of {max} bytes.")]
    PayloadTooLarge { len: usize, max: usize },
    /// Internal mode always carries an ACK identifier.
    #[error("Identifier ACK missing for internal encoding.")]
    MissingIdentifierAck,
}

/// Errors that may occur while decoding RakNet protocol values or packets.
///
/// Any of these means the surrounding datagram can no longer be trusted;
/// callers should drop it whole rather than keep earlier frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer did not contain enough bytes to decode the requested value.
    #[error("Unexpected EoF, not enough bytes to read requested type.")]
    UnexpectedEof,
    /// The header declared more payload than the buffer holds.
    #[error("Payload truncated: expected {expected} bytes, {remaining} remaining.")]
    TruncatedPayload { expected: usize, remaining: usize },
    #[error("An unknown reliability value was provided. Reliability byte: {0}")]
    UnknownReliability(u8),
    /// The declared payload length is above the configured limit.
    #[error("Payload of {len} bytes exceeds the maximum of {max} bytes.")]
    PayloadTooLarge { len: usize, max: usize },
}

/// Errors raised when assembling an [`EncapsulatedPacket`] whose optional
/// fields do not match its reliability.
///
/// [`EncapsulatedPacket`]: crate::protocol::encapsulated_packet::EncapsulatedPacket
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Message index missing for reliable packet ({0:?}).")]
    MissingMessageIndex(Reliability),
    #[error("Message index set for unreliable packet ({0:?}).")]
    UnexpectedMessageIndex(Reliability),
    #[error("Ordering info missing for sequenced packet ({0:?}).")]
    MissingOrdering(Reliability),
    #[error("Ordering info set for unsequenced packet ({0:?}).")]
    UnexpectedOrdering(Reliability),
    #[error("Split count must be non-zero.")]
    EmptySplit,
    #[error("Split index {index} out of range for {count} parts.")]
    SplitIndexOutOfRange { index: u32, count: u32 },
}
