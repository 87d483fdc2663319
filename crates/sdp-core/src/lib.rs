//! # SDP Core library for callmedia
//!
//! `sdp-core` holds the structured, already-parsed form of SDP session
//! descriptions (RFC 8866) that offer/answer media negotiation consumes.
//!
//! This crate provides:
//!
//! - Session and media descriptions with connection data and raw attributes
//! - Lazy `a=rtpmap` parsing, so a malformed mapping can be told apart from a
//!   missing one
//! - Constants for the attribute names and encoding tokens negotiation relies on
//!
//! ## Quick Start
//!
//! ```rust
//! use callmedia_sdp_core::prelude::*;
//!
//! let offer = SdpSession::new("call")
//!     .with_connection_data(ConnectionData::new("192.0.2.10"))
//!     .with_media(
//!         MediaDescription::new("audio", 49170, "RTP/AVP", vec!["97".into(), "101".into()])
//!             .with_rtpmap(RtpMapAttribute::new(97, "opus", 48000).with_params("2"))
//!             .with_rtpmap(RtpMapAttribute::new(101, "telephone-event", 8000)),
//!     );
//!
//! let media = &offer.media_descriptions[0];
//! let opus = media.rtpmap_for("97").unwrap().unwrap();
//! assert_eq!(opus.encoding_name, "opus");
//! ```

// Error handling
pub mod error;

pub mod attributes;
pub mod types;

pub use error::{Error, Result};
pub use attributes::{RtpMapAttribute, parse_rtpmap};
pub use types::{ConnectionData, MediaDescription, SdpAttribute, SdpSession};

/// Prelude module with commonly used types
pub mod prelude {
    pub use crate::{
        Error,
        Result,
        ConnectionData,
        MediaDescription,
        SdpAttribute,
        SdpSession,
        RtpMapAttribute,
    };
    pub use crate::attributes::{
        ATTR_RTPMAP, ATTR_SENDRECV, ATTR_SENDONLY, ATTR_RECVONLY, ATTR_INACTIVE, TELEPHONE_EVENT,
    };
}
