//! Codec lookup for negotiation

pub mod registry;

pub use registry::{CodecRegistry, CodecRegistryError, StaticCodecRegistry, DYNAMIC_PAYLOAD_TYPE_MIN};
