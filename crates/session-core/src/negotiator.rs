//! Stream negotiation
//!
//! Derives the parameters of one media stream from a local and a remote
//! session description (RFC 3264 offer/answer). Negotiation is a pure
//! function of its inputs; it holds no state and can run concurrently on
//! disjoint descriptions.
//!
//! The steps run in a fixed order and the first failure wins:
//!
//! 1. connection data on both sides (media level, else session level),
//! 2. media type (`audio` or `video`),
//! 3. direction,
//! 4. remote RTP endpoint,
//! 5. codec and payload types, keyed off the first local format,
//! 6. telephone-event payload types, independently per side.

use std::net::SocketAddr;

use callmedia_sdp_core::attributes::{
    RtpMapAttribute, ATTR_INACTIVE, ATTR_RECVONLY, ATTR_SENDONLY, MAX_PAYLOAD_TYPE, TELEPHONE_EVENT,
};
use callmedia_sdp_core::{ConnectionData, MediaDescription, SdpSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codec::{CodecRegistry, DYNAMIC_PAYLOAD_TYPE_MIN};
use crate::error::{DescriptionSide, NegotiationError};
use crate::types::{CodecInfo, JitterBufferParams, MediaDirection, MediaType, StreamInfo};

/// Tunables for stream negotiation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationOptions {
    /// Reject a static payload type whose rtpmap is present but malformed,
    /// instead of falling back to the codec registry
    pub strict_static_rtpmap: bool,
}

/// Negotiate the media line at `index` of `local` against the same line of `remote`.
///
/// # Errors
///
/// Returns [`NegotiationError::InvalidArgument`] if `index` is out of range
/// for either description, and one of the protocol variants of
/// [`NegotiationError`] when the descriptions cannot be reconciled.
///
/// # Examples
///
/// ```
/// use callmedia_sdp_core::prelude::*;
/// use callmedia_session_core::{negotiate, NegotiationOptions, StaticCodecRegistry, MediaDirection};
///
/// let local = SdpSession::new("local")
///     .with_connection_data(ConnectionData::new("192.0.2.1"))
///     .with_media(MediaDescription::new("audio", 4000, "RTP/AVP", vec!["0".into()]));
/// let remote = SdpSession::new("remote")
///     .with_connection_data(ConnectionData::new("192.0.2.2"))
///     .with_media(MediaDescription::new("audio", 5000, "RTP/AVP", vec!["0".into()]));
///
/// let info = negotiate(&local, &remote, 0, &StaticCodecRegistry::new(), &NegotiationOptions::default()).unwrap();
/// assert_eq!(info.codec.encoding_name, "PCMU");
/// assert_eq!(info.direction, MediaDirection::SendRecv);
/// assert_eq!(info.remote_addr.to_string(), "192.0.2.2:5000");
/// ```
pub fn negotiate(
    local: &SdpSession,
    remote: &SdpSession,
    index: usize,
    registry: &dyn CodecRegistry,
    options: &NegotiationOptions,
) -> Result<StreamInfo, NegotiationError> {
    let (local_media, remote_media) = match (
        local.media_descriptions.get(index),
        remote.media_descriptions.get(index),
    ) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return Err(NegotiationError::InvalidArgument(format!(
                "media index {} out of range (local has {}, remote has {})",
                index,
                local.media_count(),
                remote.media_count()
            )))
        }
    };

    trace!("Negotiating media {}:\nlocal:  {}remote: {}", index, local_media, remote_media);

    let local_conn = local
        .effective_connection(index)
        .ok_or(NegotiationError::MissingConnection {
            side: DescriptionSide::Local,
        })?;
    let remote_conn = remote
        .effective_connection(index)
        .ok_or(NegotiationError::MissingConnection {
            side: DescriptionSide::Remote,
        })?;

    let media_type = MediaType::from_token(&local_media.media);
    if media_type == MediaType::Unknown {
        return Err(NegotiationError::UnsupportedMediaType {
            media: local_media.media.clone(),
        });
    }

    let direction = resolve_direction(local_media, local_conn, remote_conn);
    let remote_addr = resolve_remote_addr(remote_media, remote_conn)?;

    let local_pt = first_payload_type(local_media, DescriptionSide::Local)?;
    first_payload_type(remote_media, DescriptionSide::Remote)?;

    let (codec, tx_payload_type) = match u8::try_from(local_pt) {
        Ok(pt) if pt < DYNAMIC_PAYLOAD_TYPE_MIN => {
            resolve_static_codec(local_media, pt, media_type, registry, options)?
        }
        _ => resolve_dynamic_codec(local_media, remote_media, local_pt, media_type)?,
    };

    let tx_dtmf_payload_type = find_telephone_event(local_media);
    let rx_dtmf_payload_type = find_telephone_event(remote_media);

    debug!(
        "Negotiated media {}: {} {} {}/{} pt={} tx_pt={} remote={} dtmf tx={:?} rx={:?}",
        index,
        media_type,
        direction,
        codec.encoding_name,
        codec.clock_rate,
        codec.payload_type,
        tx_payload_type,
        remote_addr,
        tx_dtmf_payload_type,
        rx_dtmf_payload_type
    );

    Ok(StreamInfo {
        media_type,
        direction,
        remote_addr,
        codec,
        tx_payload_type,
        tx_dtmf_payload_type,
        rx_dtmf_payload_type,
        transport: None,
        jitter_buffer: JitterBufferParams::default(),
        ssrc: 0,
    })
}

/// Direction as seen from the local side; the first matching rule wins
fn resolve_direction(
    local_media: &MediaDescription,
    local_conn: &ConnectionData,
    remote_conn: &ConnectionData,
) -> MediaDirection {
    if local_media.port == 0
        || local_conn.is_any_address()
        || remote_conn.is_any_address()
        || local_media.has_attribute(ATTR_INACTIVE)
    {
        MediaDirection::None
    } else if local_media.has_attribute(ATTR_SENDONLY) {
        MediaDirection::SendOnly
    } else if local_media.has_attribute(ATTR_RECVONLY) {
        MediaDirection::RecvOnly
    } else {
        MediaDirection::SendRecv
    }
}

fn resolve_remote_addr(
    remote_media: &MediaDescription,
    remote_conn: &ConnectionData,
) -> Result<SocketAddr, NegotiationError> {
    remote_conn
        .ip_addr()
        .map(|ip| SocketAddr::new(ip, remote_media.port))
        .ok_or_else(|| NegotiationError::InvalidAddress {
            address: remote_conn.connection_address.clone(),
        })
}

fn is_numeric_token(fmt: &str) -> bool {
    !fmt.is_empty() && fmt.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric payload type from a format token, if it is one in the 7-bit range
fn parse_payload_type(fmt: &str) -> Option<u8> {
    if !is_numeric_token(fmt) {
        return None;
    }
    fmt.parse::<u32>()
        .ok()
        .filter(|pt| *pt <= MAX_PAYLOAD_TYPE)
        .and_then(|pt| u8::try_from(pt).ok())
}

/// Value of the first format token, which must consist of decimal digits only.
/// The value is not range checked; digit strings beyond `u32` saturate.
fn first_payload_type(
    media: &MediaDescription,
    side: DescriptionSide,
) -> Result<u32, NegotiationError> {
    let fmt = media.formats.first().map(String::as_str).unwrap_or_default();
    if !is_numeric_token(fmt) {
        return Err(NegotiationError::InvalidPayloadType {
            side,
            format: fmt.to_string(),
        });
    }
    Ok(fmt.parse::<u32>().unwrap_or(u32::MAX))
}

fn codec_from_rtpmap(rtpmap: &RtpMapAttribute, media_type: MediaType) -> CodecInfo {
    let mut codec = CodecInfo::new(
        media_type,
        rtpmap.payload_type,
        rtpmap.encoding_name.clone(),
        rtpmap.clock_rate,
    );
    codec.channels = rtpmap.channels();
    codec
}

fn resolve_static_codec(
    local_media: &MediaDescription,
    local_pt: u8,
    media_type: MediaType,
    registry: &dyn CodecRegistry,
    options: &NegotiationOptions,
) -> Result<(CodecInfo, u8), NegotiationError> {
    let fmt = local_pt.to_string();
    let codec = match local_media.rtpmap_for(&fmt) {
        Some(Ok(rtpmap)) => codec_from_rtpmap(&rtpmap, media_type),
        Some(Err(e)) if options.strict_static_rtpmap => {
            return Err(NegotiationError::InvalidRtpmap {
                payload_type: local_pt,
                reason: e.to_string(),
            })
        }
        Some(Err(e)) => {
            debug!(
                "Ignoring malformed rtpmap for static payload type {}: {}",
                local_pt, e
            );
            registry.lookup_by_payload_type(local_pt)?
        }
        None => registry.lookup_by_payload_type(local_pt)?,
    };

    Ok((codec, local_pt))
}

fn resolve_dynamic_codec(
    local_media: &MediaDescription,
    remote_media: &MediaDescription,
    local_pt: u32,
    media_type: MediaType,
) -> Result<(CodecInfo, u8), NegotiationError> {
    let missing = NegotiationError::MissingRtpmap {
        payload_type: local_pt,
    };

    let local_rtpmap = match local_media.rtpmap_for(&local_pt.to_string()) {
        Some(Ok(rtpmap)) => rtpmap,
        _ => return Err(missing),
    };

    let tx_payload_type = remote_media
        .formats
        .iter()
        .filter_map(|fmt| {
            let pt = parse_payload_type(fmt).filter(|pt| *pt >= DYNAMIC_PAYLOAD_TYPE_MIN)?;
            let rtpmap = remote_media.rtpmap_for(fmt)?.ok()?;
            Some((pt, rtpmap))
        })
        .find(|(_, rtpmap)| rtpmap.same_encoding(&local_rtpmap))
        .map(|(pt, _)| pt)
        .ok_or(missing)?;

    Ok((codec_from_rtpmap(&local_rtpmap, media_type), tx_payload_type))
}

/// Payload type of the first parsable telephone-event rtpmap, in declaration order
fn find_telephone_event(media: &MediaDescription) -> Option<u8> {
    media
        .rtpmap_attributes()
        .filter_map(|attr| attr.as_rtpmap().ok())
        .find(|rtpmap| rtpmap.encoding_name.eq_ignore_ascii_case(TELEPHONE_EVENT))
        .map(|rtpmap| rtpmap.payload_type)
}
