//! Structured SDP session descriptions (RFC 8866).
//!
//! These types are the already-parsed form of an SDP body. Producing them from
//! text is the job of the description source; the offer/answer negotiation only
//! reads them.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::attributes::{RtpMapAttribute, ATTR_RTPMAP};
use crate::error::{Error, Result};

/// Network type of every connection line we understand
pub const NET_TYPE_IN: &str = "IN";
/// IPv4 address type
pub const ADDR_TYPE_IP4: &str = "IP4";
/// IPv6 address type
pub const ADDR_TYPE_IP6: &str = "IP6";

/// Represents the Connection Data (c=) field in an SDP message.
///
/// Format: `c=<nettype> <addrtype> <connection-address>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    /// Network type (typically "IN" for Internet)
    pub net_type: String,
    /// Address type ("IP4" or "IP6")
    pub addr_type: String,
    /// Connection address (IP address or FQDN)
    pub connection_address: String,
}

impl ConnectionData {
    /// Creates an `IN` connection line, picking the address type from the literal
    pub fn new(connection_address: impl Into<String>) -> Self {
        let connection_address = connection_address.into();
        let addr_type = if connection_address.contains(':') {
            ADDR_TYPE_IP6
        } else {
            ADDR_TYPE_IP4
        };
        Self {
            net_type: NET_TYPE_IN.to_string(),
            addr_type: addr_type.to_string(),
            connection_address,
        }
    }

    /// Connection address as an IP literal, if it is one
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.connection_address.trim().parse().ok()
    }

    /// True when the address is the unspecified ("any") address, e.g. `0.0.0.0`
    pub fn is_any_address(&self) -> bool {
        self.ip_addr().map(|ip| ip.is_unspecified()).unwrap_or(false)
    }
}

/// A media-level or session-level attribute (`a=<name>[:<value>]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpAttribute {
    /// Attribute name
    pub name: String,
    /// Attribute value, `None` for flag attributes such as `a=sendonly`
    pub value: Option<String>,
}

impl SdpAttribute {
    /// Creates a flag attribute
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Creates a valued attribute
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Creates an `a=rtpmap` attribute
    pub fn rtpmap(rtpmap: &RtpMapAttribute) -> Self {
        Self::value(ATTR_RTPMAP, rtpmap.to_string())
    }

    /// True if the value starts with the given format token, as in
    /// `a=rtpmap:97 opus/48000` for format `97`.
    ///
    /// Numeric formats compare by value, so `097` matches `a=rtpmap:97`.
    pub fn applies_to_format(&self, fmt: &str) -> bool {
        let leading = match self.value.as_deref().and_then(|v| v.split_whitespace().next()) {
            Some(token) => token,
            None => return false,
        };
        if is_decimal(leading) && is_decimal(fmt) {
            leading.trim_start_matches('0') == fmt.trim_start_matches('0')
        } else {
            leading == fmt
        }
    }

    /// Parses the value as an rtpmap
    pub fn as_rtpmap(&self) -> Result<RtpMapAttribute> {
        if self.name != ATTR_RTPMAP {
            return Err(Error::SdpParsingError(format!(
                "Attribute '{}' is not an rtpmap",
                self.name
            )));
        }
        match &self.value {
            Some(value) => value.parse(),
            None => Err(Error::SdpParsingError("rtpmap without value".to_string())),
        }
    }
}

/// Represents an SDP Media Description section (m=...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescription {
    /// Media type (e.g., "audio", "video", "application")
    pub media: String,
    /// Transport port number
    pub port: u16,
    /// Transport protocol (e.g., "RTP/AVP")
    pub protocol: String,
    /// Media format descriptions (payload types or format identifiers)
    pub formats: Vec<String>,
    /// Media-specific connection information (overrides session-level)
    pub connection_info: Option<ConnectionData>,
    /// Media-level attributes in declaration order
    pub attributes: Vec<SdpAttribute>,
}

impl MediaDescription {
    /// Creates a new MediaDescription.
    ///
    /// # Examples
    ///
    /// ```
    /// # use callmedia_sdp_core::MediaDescription;
    /// let audio = MediaDescription::new("audio", 49170, "RTP/AVP", vec!["0".to_string(), "8".to_string()]);
    /// assert_eq!(audio.to_string(), "m=audio 49170 RTP/AVP 0 8\r\n");
    /// ```
    pub fn new(
        media: impl Into<String>,
        port: u16,
        protocol: impl Into<String>,
        formats: Vec<String>,
    ) -> Self {
        Self {
            media: media.into(),
            port,
            protocol: protocol.into(),
            formats,
            connection_info: None,
            attributes: Vec::new(),
        }
    }

    /// Sets media-level connection data.
    pub fn with_connection_data(mut self, conn: ConnectionData) -> Self {
        self.connection_info = Some(conn);
        self
    }

    /// Adds a media-level attribute.
    pub fn with_attribute(mut self, attr: SdpAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Adds an `a=rtpmap` attribute.
    pub fn with_rtpmap(self, rtpmap: RtpMapAttribute) -> Self {
        self.with_attribute(SdpAttribute::rtpmap(&rtpmap))
    }

    /// Finds the first attribute with the given name, optionally restricted to
    /// attributes whose value starts with the format token `fmt`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use callmedia_sdp_core::{MediaDescription, SdpAttribute};
    /// let media = MediaDescription::new("audio", 49170, "RTP/AVP", vec!["97".to_string()])
    ///     .with_attribute(SdpAttribute::value("rtpmap", "97 opus/48000/2"));
    /// assert!(media.find_attribute("rtpmap", Some("97")).is_some());
    /// assert!(media.find_attribute("rtpmap", Some("9")).is_none());
    /// ```
    pub fn find_attribute(&self, name: &str, fmt: Option<&str>) -> Option<&SdpAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name == name && fmt.map_or(true, |f| a.applies_to_format(f)))
    }

    /// True if a flag or valued attribute with the given name exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attribute(name, None).is_some()
    }

    /// All `a=rtpmap` attributes in declaration order, parsed or not
    pub fn rtpmap_attributes(&self) -> impl Iterator<Item = &SdpAttribute> {
        self.attributes.iter().filter(|a| a.name == ATTR_RTPMAP)
    }

    /// The rtpmap bound to the format token `fmt`.
    ///
    /// `None` means no such attribute; `Some(Err(_))` means one exists but
    /// its value is malformed.
    pub fn rtpmap_for(&self, fmt: &str) -> Option<Result<RtpMapAttribute>> {
        self.find_attribute(ATTR_RTPMAP, Some(fmt)).map(SdpAttribute::as_rtpmap)
    }
}

/// Represents a complete SDP session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpSession {
    /// SDP protocol version (v=)
    pub version: String,
    /// Session name (s=)
    pub session_name: String,
    /// Optional session-level connection information (c=)
    pub connection_info: Option<ConnectionData>,
    /// Media descriptions (m=)
    pub media_descriptions: Vec<MediaDescription>,
    /// Session-level attributes (a=)
    pub attributes: Vec<SdpAttribute>,
}

impl SdpSession {
    /// Creates an empty session with version 0
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            version: "0".to_string(),
            session_name: session_name.into(),
            connection_info: None,
            media_descriptions: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Sets session-level connection data.
    pub fn with_connection_data(mut self, conn: ConnectionData) -> Self {
        self.connection_info = Some(conn);
        self
    }

    /// Adds a media description.
    pub fn with_media(mut self, media: MediaDescription) -> Self {
        self.media_descriptions.push(media);
        self
    }

    /// Adds a media description in place.
    pub fn add_media(&mut self, media: MediaDescription) {
        self.media_descriptions.push(media);
    }

    /// Number of media lines
    pub fn media_count(&self) -> usize {
        self.media_descriptions.len()
    }

    /// Connection data that applies to the media line at `index`: the
    /// media-level line if present, else the session-level one.
    pub fn effective_connection(&self, index: usize) -> Option<&ConnectionData> {
        let media = self.media_descriptions.get(index)?;
        media.connection_info.as_ref().or(self.connection_info.as_ref())
    }
}

impl fmt::Display for ConnectionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.net_type, self.addr_type, self.connection_address)
    }
}

impl fmt::Display for SdpAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "a={}:{}", self.name, value),
            None => write!(f, "a={}", self.name),
        }
    }
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m={} {} {} {}\r\n",
            self.media,
            self.port,
            self.protocol,
            self.formats.join(" ")
        )?;
        if let Some(conn) = &self.connection_info {
            write!(f, "c={}\r\n", conn)?;
        }
        for attr in &self.attributes {
            write!(f, "{}\r\n", attr)?;
        }
        Ok(())
    }
}

impl fmt::Display for SdpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={}\r\n", self.version)?;
        write!(f, "s={}\r\n", self.session_name)?;
        if let Some(conn) = &self.connection_info {
            write!(f, "c={}\r\n", conn)?;
        }
        for attr in &self.attributes {
            write!(f, "{}\r\n", attr)?;
        }
        for media in &self.media_descriptions {
            write!(f, "{}", media)?;
        }
        Ok(())
    }
}

fn is_decimal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
