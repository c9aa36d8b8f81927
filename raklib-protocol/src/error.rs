use thiserror::Error;

use crate::protocol::packet::{DecodeError, EncodeError};

/// Error type of [`crate::transport::EncapsulatedCodec`].
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("packet decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("packet encode error: {0}")]
    Encode(#[from] EncodeError),
}
