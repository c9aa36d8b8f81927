//! Reliability levels carried in the top three bits of every frame.
//!
//! The ordinals and their order are part of the wire format: decoding relies
//! on range comparisons between variants, so the declaration order below
//! must never change.

use crate::protocol::{
    constants::{MESSAGE_INDEX_SIZE, ORDER_INFO_SIZE},
    packet::{DecodeError, EncodeError, RaknetEncodable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Reliability {
    Unreliable = 0,
    UnreliableSequenced = 1,
    Reliable = 2,
    ReliableOrdered = 3,
    ReliableSequenced = 4,
    UnreliableWithAckReceipt = 5,
    ReliableWithAckReceipt = 6,
    ReliableOrderedWithAckReceipt = 7,
}

/// Holds the properties for a given Reliability.
#[derive(Debug, Clone, Copy)]
struct ReliabilityProperties {
    is_reliable: bool,
    is_sequenced: bool,
    is_with_ack_receipt: bool,
    header_size: usize,
}

const RELIABILITY_TABLE: [ReliabilityProperties; 8] = [
    // Unreliable
    ReliabilityProperties {
        is_reliable: false,
        is_sequenced: false,
        is_with_ack_receipt: false,
        header_size: 0,
    },
    // UnreliableSequenced
    ReliabilityProperties {
        is_reliable: false,
        is_sequenced: true,
        is_with_ack_receipt: false,
        header_size: ORDER_INFO_SIZE,
    },
    // Reliable
    ReliabilityProperties {
        is_reliable: true,
        is_sequenced: false,
        is_with_ack_receipt: false,
        header_size: MESSAGE_INDEX_SIZE,
    },
    // ReliableOrdered
    ReliabilityProperties {
        is_reliable: true,
        is_sequenced: true,
        is_with_ack_receipt: false,
        header_size: MESSAGE_INDEX_SIZE + ORDER_INFO_SIZE,
    },
    // ReliableSequenced
    ReliabilityProperties {
        is_reliable: true,
        is_sequenced: true,
        is_with_ack_receipt: false,
        header_size: MESSAGE_INDEX_SIZE + ORDER_INFO_SIZE,
    },
    // UnreliableWithAckReceipt
    ReliabilityProperties {
        is_reliable: false,
        is_sequenced: false,
        is_with_ack_receipt: true,
        header_size: 0,
    },
    // ReliableWithAckReceipt
    ReliabilityProperties {
        is_reliable: true,
        is_sequenced: false,
        is_with_ack_receipt: true,
        header_size: MESSAGE_INDEX_SIZE,
    },
    // ReliableOrderedWithAckReceipt
    ReliabilityProperties {
        is_reliable: true,
        is_sequenced: true,
        is_with_ack_receipt: true,
        header_size: MESSAGE_INDEX_SIZE + ORDER_INFO_SIZE,
    },
];

impl Reliability {
    pub const ALL: [Reliability; 8] = [
        Reliability::Unreliable,
        Reliability::UnreliableSequenced,
        Reliability::Reliable,
        Reliability::ReliableOrdered,
        Reliability::ReliableSequenced,
        Reliability::UnreliableWithAckReceipt,
        Reliability::ReliableWithAckReceipt,
        Reliability::ReliableOrderedWithAckReceipt,
    ];

    /// Gets the associated properties for this reliability from the lookup table.
    #[inline]
    fn properties(self) -> &'static ReliabilityProperties {
        &RELIABILITY_TABLE[self as usize]
    }

    /// Reliable levels carry a message index.
    #[inline]
    pub fn is_reliable(self) -> bool {
        self.properties().is_reliable
    }

    /// Sequenced and ordered levels carry an order index and channel.
    #[inline]
    pub fn is_sequenced(self) -> bool {
        self.properties().is_sequenced
    }

    #[inline]
    pub fn is_with_ack_receipt(self) -> bool {
        self.properties().is_with_ack_receipt
    }

    /// Gets the size of the required header fields for this reliability.
    #[inline]
    pub fn header_size(self) -> usize {
        self.properties().header_size
    }

    /// Range test used while decoding to decide whether a message index follows.
    ///
    /// `UnreliableWithAckReceipt` sits inside the reliable range numerically
    /// but carries no index.
    #[inline]
    pub(crate) fn carries_message_index(self) -> bool {
        self >= Reliability::Reliable && self != Reliability::UnreliableWithAckReceipt
    }

    /// Range test used while decoding to decide whether ordering info follows.
    ///
    /// `Reliable` sits inside the sequenced range numerically but carries no
    /// ordering; `ReliableOrderedWithAckReceipt` sits outside it but does.
    #[inline]
    pub(crate) fn carries_ordering(self) -> bool {
        (self > Reliability::Unreliable
            && self <= Reliability::ReliableSequenced
            && self != Reliability::Reliable)
            || self == Reliability::ReliableOrderedWithAckReceipt
    }
}

impl TryFrom<u8> for Reliability {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Reliability::Unreliable),
            1 => Ok(Reliability::UnreliableSequenced),
            2 => Ok(Reliability::Reliable),
            3 => Ok(Reliability::ReliableOrdered),
            4 => Ok(Reliability::ReliableSequenced),
            5 => Ok(Reliability::UnreliableWithAckReceipt),
            6 => Ok(Reliability::ReliableWithAckReceipt),
            7 => Ok(Reliability::ReliableOrderedWithAckReceipt),
            _ => Err(DecodeError::UnknownReliability(value)),
        }
    }
}

impl RaknetEncodable for Reliability {
    fn encode_raknet(&self, dst: &mut impl bytes::BufMut) -> Result<(), EncodeError> {
        (*self as u8).encode_raknet(dst)
    }

    fn decode_raknet(src: &mut impl bytes::Buf) -> Result<Self, DecodeError> {
        Reliability::try_from(u8::decode_raknet(src)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_stable() {
        for (i, r) in Reliability::ALL.iter().enumerate() {
            assert_eq!(*r as usize, i);
            assert_eq!(Reliability::try_from(i as u8).unwrap(), *r);
        }
        assert_eq!(
            Reliability::try_from(8),
            Err(DecodeError::UnknownReliability(8))
        );
    }

    #[test]
    fn reliable_set() {
        let reliable: Vec<_> = Reliability::ALL
            .into_iter()
            .filter(|r| r.is_reliable())
            .collect();
        assert_eq!(
            reliable,
            [
                Reliability::Reliable,
                Reliability::ReliableOrdered,
                Reliability::ReliableSequenced,
                Reliability::ReliableWithAckReceipt,
                Reliability::ReliableOrderedWithAckReceipt,
            ]
        );
    }

    #[test]
    fn sequenced_set() {
        let sequenced: Vec<_> = Reliability::ALL
            .into_iter()
            .filter(|r| r.is_sequenced())
            .collect();
        assert_eq!(
            sequenced,
            [
                Reliability::UnreliableSequenced,
                Reliability::ReliableOrdered,
                Reliability::ReliableSequenced,
                Reliability::ReliableOrderedWithAckReceipt,
            ]
        );
    }

    #[test]
    fn range_tests_agree_with_table() {
        for r in Reliability::ALL {
            assert_eq!(r.carries_message_index(), r.is_reliable(), "{r:?}");
            assert_eq!(r.carries_ordering(), r.is_sequenced(), "{r:?}");
        }
    }

    #[test]
    fn boundary_variants() {
        assert!(!Reliability::UnreliableWithAckReceipt.carries_message_index());
        assert!(!Reliability::Reliable.carries_ordering());
        assert!(Reliability::UnreliableWithAckReceipt.is_with_ack_receipt());
    }

    #[test]
    fn reliable_ordered_header_size() {
        assert_eq!(Reliability::ReliableOrdered.header_size(), 7);
        assert_eq!(Reliability::UnreliableSequenced.header_size(), 4);
        assert_eq!(Reliability::UnreliableWithAckReceipt.header_size(), 0);
    }

    #[test]
    fn roundtrip_encode_decode() {
        for r in [
            Reliability::Unreliable,
            Reliability::Reliable,
            Reliability::ReliableOrderedWithAckReceipt,
        ] {
            let mut buf = bytes::BytesMut::new();
            r.encode_raknet(&mut buf).unwrap();
            let mut slice = buf.freeze();
            let decoded = Reliability::decode_raknet(&mut slice).unwrap();
            assert_eq!(decoded, r);
        }
    }
}
