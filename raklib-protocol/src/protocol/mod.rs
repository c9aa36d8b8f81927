//! RakNet frame primitives: constants, reliability levels, on-the-wire
//! integer formats and the encapsulated packet itself.

pub mod constants;
pub mod encapsulated_packet;
pub mod packet;
pub mod reliability;
pub mod types;
