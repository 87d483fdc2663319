//! Payload type registry
//!
//! Resolves static RTP payload types (RFC 3551) to codec descriptions when a
//! media line carries no usable rtpmap for them.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::types::{CodecInfo, MediaType};

/// Payload types below this value are statically assigned
pub const DYNAMIC_PAYLOAD_TYPE_MIN: u8 = 96;

/// Errors returned by a codec registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecRegistryError {
    /// No codec is registered for the payload type
    #[error("No codec registered for payload type {payload_type}")]
    NotFound { payload_type: u8 },
}

/// Lookup of codec descriptions by payload type
pub trait CodecRegistry: Send + Sync {
    /// Returns the codec statically bound to `payload_type`
    fn lookup_by_payload_type(&self, payload_type: u8) -> Result<CodecInfo, CodecRegistryError>;
}

// (payload type, media type, encoding name, clock rate, channels)
const RFC3551_STATIC_TYPES: &[(u8, MediaType, &str, u32, Option<u8>)] = &[
    (0, MediaType::Audio, "PCMU", 8000, Some(1)),
    (3, MediaType::Audio, "GSM", 8000, Some(1)),
    (4, MediaType::Audio, "G723", 8000, Some(1)),
    (5, MediaType::Audio, "DVI4", 8000, Some(1)),
    (6, MediaType::Audio, "DVI4", 16000, Some(1)),
    (7, MediaType::Audio, "LPC", 8000, Some(1)),
    (8, MediaType::Audio, "PCMA", 8000, Some(1)),
    // G.722 keeps the 8000 Hz RTP clock for historical reasons
    (9, MediaType::Audio, "G722", 8000, Some(1)),
    (10, MediaType::Audio, "L16", 44100, Some(2)),
    (11, MediaType::Audio, "L16", 44100, Some(1)),
    (12, MediaType::Audio, "QCELP", 8000, Some(1)),
    (13, MediaType::Audio, "CN", 8000, Some(1)),
    (14, MediaType::Audio, "MPA", 90000, None),
    (15, MediaType::Audio, "G728", 8000, Some(1)),
    (16, MediaType::Audio, "DVI4", 11025, Some(1)),
    (17, MediaType::Audio, "DVI4", 22050, Some(1)),
    (18, MediaType::Audio, "G729", 8000, Some(1)),
    (25, MediaType::Video, "CelB", 90000, None),
    (26, MediaType::Video, "JPEG", 90000, None),
    (28, MediaType::Video, "nv", 90000, None),
    (31, MediaType::Video, "H261", 90000, None),
    (32, MediaType::Video, "MPV", 90000, None),
    (33, MediaType::Video, "MP2T", 90000, None),
    (34, MediaType::Video, "H263", 90000, None),
];

/// Registry preloaded with the RFC 3551 static payload types
#[derive(Debug, Clone)]
pub struct StaticCodecRegistry {
    codecs: HashMap<u8, CodecInfo>,
}

impl StaticCodecRegistry {
    /// Create a registry with the RFC 3551 static assignments
    pub fn new() -> Self {
        let codecs = RFC3551_STATIC_TYPES
            .iter()
            .map(|&(pt, media_type, name, clock_rate, channels)| {
                let mut codec = CodecInfo::new(media_type, pt, name, clock_rate);
                codec.channels = channels;
                (pt, codec)
            })
            .collect::<HashMap<_, _>>();

        debug!("Initialized StaticCodecRegistry with {} payload types", codecs.len());
        Self { codecs }
    }

    /// Create a registry without any assignments
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register or replace the codec for `codec.payload_type`
    pub fn with_codec(mut self, codec: CodecInfo) -> Self {
        self.register(codec);
        self
    }

    /// Register or replace the codec for `codec.payload_type`
    pub fn register(&mut self, codec: CodecInfo) {
        debug!(
            "Registered codec: {} -> PT:{} @ {}Hz",
            codec.encoding_name, codec.payload_type, codec.clock_rate
        );
        self.codecs.insert(codec.payload_type, codec);
    }

    /// Number of registered payload types
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for StaticCodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry for StaticCodecRegistry {
    fn lookup_by_payload_type(&self, payload_type: u8) -> Result<CodecInfo, CodecRegistryError> {
        self.codecs
            .get(&payload_type)
            .cloned()
            .ok_or(CodecRegistryError::NotFound { payload_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let registry = StaticCodecRegistry::new();

        let pcmu = registry.lookup_by_payload_type(0).unwrap();
        assert_eq!(pcmu.encoding_name, "PCMU");
        assert_eq!(pcmu.clock_rate, 8000);
        assert_eq!(pcmu.media_type, MediaType::Audio);

        let h263 = registry.lookup_by_payload_type(34).unwrap();
        assert_eq!(h263.media_type, MediaType::Video);
        assert_eq!(h263.clock_rate, 90000);

        let dvi4 = registry.lookup_by_payload_type(17).unwrap();
        assert_eq!(dvi4.clock_rate, 22050);
    }

    #[test]
    fn test_unassigned_payload_types_miss() {
        let registry = StaticCodecRegistry::new();
        for pt in [1u8, 2, 19, 24, 27, 35, 96, 127] {
            assert_eq!(
                registry.lookup_by_payload_type(pt),
                Err(CodecRegistryError::NotFound { payload_type: pt })
            );
        }
    }

    #[test]
    fn test_with_codec_overrides() {
        let registry = StaticCodecRegistry::empty()
            .with_codec(CodecInfo::new(MediaType::Audio, 0, "PCMU", 8000))
            .with_codec(CodecInfo::new(MediaType::Audio, 0, "custom", 16000));

        assert_eq!(registry.len(), 1);
        let codec = registry.lookup_by_payload_type(0).unwrap();
        assert_eq!(codec.encoding_name, "custom");
        assert_eq!(codec.clock_rate, 16000);
    }
}
