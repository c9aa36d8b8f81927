//! Re-exports the [`raklib_protocol`] library for convenient access to the frame codec.
#[cfg(feature = "protocol")]
pub use raklib_protocol;
