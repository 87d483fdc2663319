//! Negotiated stream and session types

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a media session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generates a new random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Media type of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// Audio media
    Audio,
    /// Video media
    Video,
    /// Anything else; never produced by a successful negotiation
    Unknown,
}

impl MediaType {
    /// Case-insensitive mapping of an `m=` media token
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("audio") {
            MediaType::Audio
        } else if token.eq_ignore_ascii_case("video") {
            MediaType::Video
        } else {
            MediaType::Unknown
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
            MediaType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Media stream direction, seen from the local side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaDirection {
    /// Neither sending nor receiving
    None,
    /// Encoding and sending only
    SendOnly,
    /// Receiving and decoding only
    RecvOnly,
    /// Send and receive
    SendRecv,
}

impl MediaDirection {
    /// True if the direction includes sending
    pub fn sends(&self) -> bool {
        matches!(self, MediaDirection::SendOnly | MediaDirection::SendRecv)
    }

    /// True if the direction includes receiving
    pub fn receives(&self) -> bool {
        matches!(self, MediaDirection::RecvOnly | MediaDirection::SendRecv)
    }
}

impl fmt::Display for MediaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaDirection::None => write!(f, "inactive"),
            MediaDirection::SendOnly => write!(f, "sendonly"),
            MediaDirection::RecvOnly => write!(f, "recvonly"),
            MediaDirection::SendRecv => write!(f, "sendrecv"),
        }
    }
}

/// Codec information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecInfo {
    /// Media type the codec carries
    pub media_type: MediaType,
    /// RTP payload type
    pub payload_type: u8,
    /// Encoding name (e.g., "PCMU", "opus")
    pub encoding_name: String,
    /// Clock rate in Hz
    pub clock_rate: u32,
    /// Number of channels, when known
    pub channels: Option<u8>,
}

impl CodecInfo {
    /// Create a new codec description
    pub fn new(
        media_type: MediaType,
        payload_type: u8,
        encoding_name: impl Into<String>,
        clock_rate: u32,
    ) -> Self {
        Self {
            media_type,
            payload_type,
            encoding_name: encoding_name.into(),
            clock_rate,
            channels: None,
        }
    }

    /// Set the number of channels
    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = Some(channels);
        self
    }
}

/// Local transport endpoint reserved by the caller for one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketInfo {
    /// Local RTP address
    pub rtp_addr: SocketAddr,
    /// Local RTCP address
    pub rtcp_addr: SocketAddr,
}

impl SocketInfo {
    /// Endpoint with explicit RTP and RTCP addresses
    pub fn new(rtp_addr: SocketAddr, rtcp_addr: SocketAddr) -> Self {
        Self { rtp_addr, rtcp_addr }
    }

    /// Endpoint with RTCP on the next port up, as RFC 3550 suggests.
    ///
    /// Returns `None` for RTP port 65535, which has no next port.
    pub fn with_rtp(rtp_addr: SocketAddr) -> Option<Self> {
        let rtcp_port = rtp_addr.port().checked_add(1)?;
        let mut rtcp_addr = rtp_addr;
        rtcp_addr.set_port(rtcp_port);
        Some(Self::new(rtp_addr, rtcp_addr))
    }
}

/// Jitter buffer settings in milliseconds; zero lets the transport choose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JitterBufferParams {
    /// Initial prefetch
    pub init: u32,
    /// Minimum prefetch
    pub min_prefetch: u32,
    /// Maximum prefetch
    pub max_prefetch: u32,
    /// Maximum buffer size
    pub max: u32,
}

/// Parameters of one negotiated media stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Media type
    pub media_type: MediaType,
    /// Negotiated direction
    pub direction: MediaDirection,
    /// Where outgoing RTP is sent
    pub remote_addr: SocketAddr,
    /// Codec used for receiving; `codec.payload_type` is the receive payload type
    pub codec: CodecInfo,
    /// Payload type placed on outgoing packets
    pub tx_payload_type: u8,
    /// telephone-event payload type for outgoing DTMF
    pub tx_dtmf_payload_type: Option<u8>,
    /// telephone-event payload type expected on incoming DTMF
    pub rx_dtmf_payload_type: Option<u8>,
    /// Local socket endpoint, attached when the session is created
    pub transport: Option<SocketInfo>,
    /// Jitter buffer settings, filled in by the transport layer
    pub jitter_buffer: JitterBufferParams,
    /// Outgoing SSRC; zero lets the transport pick one
    pub ssrc: u32,
}

impl StreamInfo {
    /// True if outgoing DTMF can be relayed as telephone events
    pub fn can_send_dtmf(&self) -> bool {
        self.tx_dtmf_payload_type.is_some()
    }
}

/// Snapshot of a media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Number of streams
    pub stream_count: usize,
    /// Negotiated info of every stream, in index order
    pub streams: Vec<StreamInfo>,
}
