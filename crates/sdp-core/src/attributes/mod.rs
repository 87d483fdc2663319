//! SDP Attribute Parsers
//!
//! Attribute values are kept as raw text on the media description and parsed
//! on demand, so a malformed value can be told apart from a missing one.

pub mod common;
pub mod rtpmap;

pub use common::{is_token_char, positive_integer, token};
pub use rtpmap::{parse_rtpmap, RtpMapAttribute, MAX_PAYLOAD_TYPE};

/// `a=rtpmap`
pub const ATTR_RTPMAP: &str = "rtpmap";
/// `a=sendrecv`
pub const ATTR_SENDRECV: &str = "sendrecv";
/// `a=sendonly`
pub const ATTR_SENDONLY: &str = "sendonly";
/// `a=recvonly`
pub const ATTR_RECVONLY: &str = "recvonly";
/// `a=inactive`
pub const ATTR_INACTIVE: &str = "inactive";

/// Encoding name of RFC 4733 telephone events (out-of-band DTMF)
pub const TELEPHONE_EVENT: &str = "telephone-event";
