//! Error types for stream negotiation and media session management
//!
//! Three families are kept apart:
//!
//! - caller errors ([`Error::InvalidArgument`], [`NegotiationError::InvalidArgument`]),
//! - negotiation errors ([`NegotiationError`]) raised when the local and remote
//!   descriptions cannot be reconciled,
//! - collaborator errors ([`StreamError`], [`CodecRegistryError`]) reported by
//!   the stream factory or codec registry and passed through unchanged.

use thiserror::Error;

pub use crate::codec::CodecRegistryError;
pub use crate::config::ConfigError;
pub use crate::stream::StreamError;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two descriptions an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSide {
    /// The locally generated description
    Local,
    /// The description received from the peer
    Remote,
}

impl std::fmt::Display for DescriptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptionSide::Local => write!(f, "local"),
            DescriptionSide::Remote => write!(f, "remote"),
        }
    }
}

/// Errors produced while negotiating a single media line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// Precondition violation by the caller, e.g. an out-of-range media index
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither the media line nor the session carries a connection line
    #[error("Missing connection data in {side} description")]
    MissingConnection { side: DescriptionSide },

    /// Media type other than audio or video
    #[error("Unsupported media type: {media}")]
    UnsupportedMediaType { media: String },

    /// Remote connection address is not an IP literal
    #[error("Invalid remote address: {address}")]
    InvalidAddress { address: String },

    /// First format on a media line is not a numeric payload type
    #[error("Invalid payload type '{format}' in {side} description")]
    InvalidPayloadType { side: DescriptionSide, format: String },

    /// Dynamic payload type without a usable rtpmap, or no remote format maps
    /// to the same encoding. Numeric tokens above 127 land here too, since no
    /// rtpmap can describe them.
    #[error("Missing rtpmap for payload type {payload_type}")]
    MissingRtpmap { payload_type: u32 },

    /// Static payload type with a malformed rtpmap (strict mode only)
    #[error("Invalid rtpmap for payload type {payload_type}: {reason}")]
    InvalidRtpmap { payload_type: u8, reason: String },

    /// Static payload type unknown to the codec registry
    #[error(transparent)]
    Codec(#[from] CodecRegistryError),
}

/// Errors returned by media session operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The descriptions ask for more streams than the session allows
    #[error("Too many streams: {requested} requested, at most {max} allowed")]
    TooManyStreams { requested: usize, max: usize },

    /// Negotiation of one media line failed
    #[error("Negotiation of stream {index} failed: {source}")]
    Negotiation {
        index: usize,
        #[source]
        source: NegotiationError,
    },

    /// Creating or starting the stream at `index` failed; earlier streams were rolled back
    #[error("Creation of stream {index} failed: {source}")]
    StreamCreation {
        index: usize,
        #[source]
        source: StreamError,
    },

    /// Error reported by a stream
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// True for errors caused by the caller rather than by the peer or a collaborator
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_)
                | Error::Negotiation {
                    source: NegotiationError::InvalidArgument(_),
                    ..
                }
        )
    }
}
