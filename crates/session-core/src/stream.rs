//! Stream collaborator interface
//!
//! The session manager negotiates parameters and owns stream lifetimes; the
//! media transport itself lives behind these traits. A [`MediaEndpoint`] is
//! the factory that turns a negotiated [`StreamInfo`] into a running
//! [`MediaStream`], and carries the codec registry negotiation falls back to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::CodecRegistry;
use crate::types::{MediaDirection, SessionId, StreamInfo};

/// Broad category of a stream failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamErrorKind {
    /// Socket or network failure
    Transport,
    /// Codec could not be instantiated
    Codec,
    /// Operation not supported by the stream (e.g. DTMF without telephone-event)
    Unsupported,
    /// Operation not valid in the stream's current state
    InvalidState,
    /// Anything else
    Other,
}

impl std::fmt::Display for StreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StreamErrorKind::Transport => "transport",
            StreamErrorKind::Codec => "codec",
            StreamErrorKind::Unsupported => "unsupported",
            StreamErrorKind::InvalidState => "invalid state",
            StreamErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error reported by a stream or the stream factory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Stream error ({kind}): {message}")]
pub struct StreamError {
    /// Failure category
    pub kind: StreamErrorKind,
    /// Human-readable description
    pub message: String,
}

impl StreamError {
    /// Create an error of the given kind
    pub fn new(kind: StreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an uncategorized error
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Other, message)
    }
}

/// RTCP-style counters of one stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamStat {
    /// RTP packets sent
    pub tx_packets: u64,
    /// Payload bytes sent
    pub tx_bytes: u64,
    /// RTP packets received
    pub rx_packets: u64,
    /// Payload bytes received
    pub rx_bytes: u64,
    /// Packets reported lost by the receiver side
    pub rx_lost: u64,
    /// Interarrival jitter in milliseconds
    pub rx_jitter_ms: f64,
    /// Last measured round-trip time in milliseconds, if RTCP reports have arrived
    pub rtt_ms: Option<f64>,
}

/// Identity of a stream as handed to the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamContext {
    /// Owning session
    pub session_id: SessionId,
    /// Position of the stream within the session
    pub index: usize,
}

/// Factory for media streams
///
/// Shared by every session created from it; the session manager never
/// mutates it.
#[async_trait]
pub trait MediaEndpoint: Send + Sync {
    /// Stream handle produced by this endpoint
    type Stream: MediaStream;

    /// Registry used to resolve static payload types
    fn codec_registry(&self) -> &dyn CodecRegistry;

    /// Instantiate a stream for the negotiated parameters
    ///
    /// The stream must not send or receive until [`MediaStream::start`] is called.
    async fn create_stream(
        &self,
        info: &StreamInfo,
        ctx: &StreamContext,
    ) -> Result<Self::Stream, StreamError>;
}

/// Handle to one running media stream
#[async_trait]
pub trait MediaStream: Send {
    /// Media port exposed for bridging into a conference or player
    type Port: Send;

    /// Begin media flow
    async fn start(&mut self) -> Result<(), StreamError>;

    /// Stop media flow and release transport resources
    ///
    /// Called exactly once per created stream.
    async fn destroy(&mut self) -> Result<(), StreamError>;

    /// Suspend media flow in `direction`
    async fn pause(&mut self, direction: MediaDirection) -> Result<(), StreamError>;

    /// Resume media flow in `direction`
    async fn resume(&mut self, direction: MediaDirection) -> Result<(), StreamError>;

    /// Media port of the stream
    fn port(&self) -> Result<Self::Port, StreamError>;

    /// Current counters
    fn stat(&self) -> Result<StreamStat, StreamError>;

    /// Queue DTMF digits for transmission as telephone events
    async fn dial_dtmf(&mut self, digits: &str) -> Result<(), StreamError>;

    /// True if received DTMF digits are waiting
    fn has_dtmf(&self) -> bool;

    /// Take up to `max_digits` received DTMF digits
    async fn get_dtmf(&mut self, max_digits: usize) -> Result<String, StreamError>;
}
