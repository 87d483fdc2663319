//! # Session Core library for callmedia
//!
//! Turns a local and a remote SDP description (RFC 3264 offer/answer) into a
//! set of running media streams and manages them for the life of a call.
//!
//! - [`negotiate`] derives one [`StreamInfo`] per media line: remote endpoint,
//!   direction, codec, send payload type and telephone-event payload types.
//! - [`MediaSession`] negotiates every media line, creates and starts one
//!   stream per line through a [`MediaEndpoint`], rolls back on partial
//!   failure, and exposes per-stream control (pause/resume, DTMF, statistics).
//!
//! The media transport is not part of this crate; implement [`MediaEndpoint`]
//! and [`MediaStream`] on top of your RTP stack.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use callmedia_session_core::prelude::*;
//!
//! # async fn example<E: MediaEndpoint>(endpoint: Arc<E>, local: SdpSession, remote: SdpSession) -> Result<()> {
//! let sockets = [SocketInfo::new("0.0.0.0:4000".parse().unwrap(), "0.0.0.0:4001".parse().unwrap())];
//! let mut session = MediaSession::create(endpoint, 1, &sockets, &local, &remote, ()).await?;
//!
//! for info in session.info().streams {
//!     println!("{} {} via {}", info.media_type, info.codec.encoding_name, info.remote_addr);
//! }
//!
//! session.dial_dtmf(0, "123#").await?;
//! session.destroy().await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod negotiator;
pub mod session;
pub mod stream;
pub mod types;

pub use codec::{CodecRegistry, CodecRegistryError, StaticCodecRegistry};
pub use config::{ConfigError, SessionConfig};
pub use error::{DescriptionSide, Error, NegotiationError, Result};
pub use negotiator::{negotiate, NegotiationOptions};
pub use session::{MediaSession, StreamPort};
pub use stream::{MediaEndpoint, MediaStream, StreamContext, StreamError, StreamErrorKind, StreamStat};
pub use types::{
    CodecInfo, JitterBufferParams, MediaDirection, MediaType, SessionId, SessionInfo, SocketInfo,
    StreamInfo,
};

/// Prelude module with commonly used types
pub mod prelude {
    pub use crate::{
        negotiate, CodecInfo, CodecRegistry, Error, JitterBufferParams, MediaDirection,
        MediaEndpoint, MediaSession, MediaStream, MediaType, NegotiationError, NegotiationOptions,
        Result, SessionConfig, SessionInfo, SocketInfo, StaticCodecRegistry, StreamContext,
        StreamError, StreamInfo, StreamStat,
    };
    pub use callmedia_sdp_core::prelude::{
        ConnectionData, MediaDescription, RtpMapAttribute, SdpAttribute, SdpSession, ATTR_INACTIVE,
        ATTR_RECVONLY, ATTR_RTPMAP, ATTR_SENDONLY, ATTR_SENDRECV, TELEPHONE_EVENT,
    };
}
