use crate::protocol::encapsulated_packet::CodecMode;
use crate::transport::{EncapsulatedCodec, EncapsulatedCodecConfig};

/// Configuration builder for [`EncapsulatedCodec`].
#[derive(Debug, Clone)]
pub struct EncapsulatedCodecBuilder {
    mode: CodecMode,
    max_payload_size: usize,
}

impl Default for EncapsulatedCodecBuilder {
    /// Creates a [`EncapsulatedCodecBuilder`] pre-populated with the library's default codec settings.
    fn default() -> Self {
        let config = EncapsulatedCodecConfig::default();
        Self {
            mode: config.mode,
            max_payload_size: config.max_payload_size,
        }
    }
}

impl From<EncapsulatedCodecBuilder> for EncapsulatedCodecConfig {
    fn from(builder: EncapsulatedCodecBuilder) -> Self {
        builder.config()
    }
}

impl EncapsulatedCodecBuilder {
    /// Creates a new [`EncapsulatedCodecBuilder`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Sets the serialization shape used for both directions.
    pub fn mode(mut self, mode: CodecMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    /// Sets the largest payload accepted before a frame is rejected.
    ///
    /// The limit is further capped by what the mode's length field can hold.
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = size;
        self
    }

    /// Produces the plain configuration struct.
    pub fn config(self) -> EncapsulatedCodecConfig {
        EncapsulatedCodecConfig {
            mode: self.mode,
            max_payload_size: self.max_payload_size,
        }
    }

    /// Builds the codec.
    pub fn build(self) -> EncapsulatedCodec {
        EncapsulatedCodec::new(self.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::{DEFAULT_MAX_PAYLOAD_SIZE, MAX_WIRE_PAYLOAD_SIZE};

    #[test]
    fn defaults_match_config() {
        let config: EncapsulatedCodecConfig = EncapsulatedCodecBuilder::new().into();
        assert_eq!(config.mode, CodecMode::Wire);
        assert_eq!(config.max_payload_size, DEFAULT_MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn limit_is_capped_by_mode() {
        let wire = EncapsulatedCodecBuilder::new()
            .max_payload_size(usize::MAX)
            .build();
        assert_eq!(wire.max_payload_size(), MAX_WIRE_PAYLOAD_SIZE);

        let internal = EncapsulatedCodecBuilder::new()
            .mode(CodecMode::Internal)
            .max_payload_size(64)
            .build();
        assert_eq!(internal.max_payload_size(), 64);
    }
}
