//! Codec for RakNet encapsulated packets ("frames").
//!
//! A frame is one payload plus the reliability, ordering and split metadata
//! a reliable-UDP transport needs. Frames have two shapes: the wire form sent
//! to peers, and an internal form used when queuing frames locally for
//! retransmission, which carries a 32-bit length and an ACK identifier.
//!
//! ## Example: building and parsing a frame
//!
//! ```rust
//! use raklib_protocol::{CodecMode, EncapsulatedPacket, Reliability};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let packet = EncapsulatedPacket::builder(Reliability::ReliableOrdered)
//!     .message_index(0)
//!     .order(0, 0)
//!     .payload(&b"hello"[..])
//!     .build()?;
//!
//! let wire = packet.encode(CodecMode::Wire)?;
//! assert_eq!(wire.len(), packet.total_length());
//!
//! let (decoded, next) = EncapsulatedPacket::decode(&wire, CodecMode::Wire, 0)?;
//! assert_eq!(decoded, packet);
//! assert_eq!(next, wire.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: local retransmission storage
//!
//! ```rust
//! use bytes::BytesMut;
//! use raklib_protocol::{CodecMode, EncapsulatedPacket, Reliability};
//! use raklib_protocol::builders::EncapsulatedCodecBuilder;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut codec = EncapsulatedCodecBuilder::new()
//!     .mode(CodecMode::Internal)
//!     .build();
//!
//! let packet = EncapsulatedPacket::builder(Reliability::ReliableWithAckReceipt)
//!     .message_index(7)
//!     .identifier_ack(42)
//!     .payload(vec![1u8, 2, 3])
//!     .build()?;
//!
//! let mut store = BytesMut::new();
//! codec.encode(packet.clone(), &mut store)?;
//! assert_eq!(codec.decode(&mut store)?, Some(packet));
//! # Ok(())
//! # }
//! ```
pub mod builders;
pub mod error;
pub mod protocol;
pub mod transport;

pub use error::CodecError;
pub use protocol::encapsulated_packet::{CodecMode, EncapsulatedPacket, OrderInfo, SplitInfo};
pub use protocol::reliability::Reliability;
pub use transport::EncapsulatedCodec;
