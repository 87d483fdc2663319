//! SDP RTP Map Attribute Parser
//!
//! Implements the parser for rtpmap attribute values as defined in RFC 8866.
//! Format: a=rtpmap:<payload type> <encoding name>/<clock rate>[/<encoding parameters>]

use std::fmt;
use std::str::FromStr;

use crate::attributes::common::{positive_integer, to_result, token};
use crate::error::{Error, Result};
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space1},
    combinator::{map, map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

/// Highest payload type value an RTP header can carry
pub const MAX_PAYLOAD_TYPE: u32 = 127;

/// Represents an RTP Map attribute (a=rtpmap)
///
/// Maps RTP payload types to media encoding names, clock rates, and encoding parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpMapAttribute {
    /// RTP payload type (numeric)
    pub payload_type: u8,
    /// Encoding name (e.g., "PCMU", "opus", "telephone-event")
    pub encoding_name: String,
    /// Clock rate in Hertz
    pub clock_rate: u32,
    /// Optional encoding parameters (e.g., number of channels)
    pub encoding_params: Option<String>,
}

impl RtpMapAttribute {
    /// Creates an rtpmap without encoding parameters
    pub fn new(payload_type: u8, encoding_name: impl Into<String>, clock_rate: u32) -> Self {
        Self {
            payload_type,
            encoding_name: encoding_name.into(),
            clock_rate,
            encoding_params: None,
        }
    }

    /// Sets the encoding parameters
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.encoding_params = Some(params.into());
        self
    }

    /// Channel count carried in the encoding parameters, if any
    pub fn channels(&self) -> Option<u8> {
        self.encoding_params.as_deref().and_then(|p| p.parse().ok())
    }

    /// Case-insensitive comparison of encoding name and clock rate
    pub fn same_encoding(&self, other: &RtpMapAttribute) -> bool {
        self.encoding_name.eq_ignore_ascii_case(&other.encoding_name)
            && self.clock_rate == other.clock_rate
    }
}

/// Parser for encoding parameters (optional, positive integer for channels)
fn encoding_params(input: &str) -> IResult<&str, String> {
    map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| s.to_string())(input)
}

/// Parser for the encoding part: <encoding name>/<clock rate>[/<encoding parameters>]
fn encoding_parser(input: &str) -> IResult<&str, (String, u32, Option<String>)> {
    tuple((
        map(token, |s: &str| s.to_string()),
        preceded(char('/'), positive_integer),
        opt(preceded(char('/'), encoding_params)),
    ))(input)
}

/// Parser for the complete rtpmap value: <payload type> <encoding>
fn rtpmap_parser(input: &str) -> IResult<&str, RtpMapAttribute> {
    map(
        tuple((
            map_res(positive_integer, |pt| {
                if pt <= MAX_PAYLOAD_TYPE {
                    Ok(pt as u8)
                } else {
                    Err(())
                }
            }),
            preceded(space1, encoding_parser),
        )),
        |(payload_type, (encoding_name, clock_rate, encoding_params))| RtpMapAttribute {
            payload_type,
            encoding_name,
            clock_rate,
            encoding_params,
        },
    )(input)
}

/// Parses an rtpmap attribute value: <payload type> <encoding name>/<clock rate>[/<encoding parameters>]
pub fn parse_rtpmap(value: &str) -> Result<RtpMapAttribute> {
    to_result(
        rtpmap_parser(value.trim()),
        &format!("Invalid rtpmap format: {value}"),
    )
}

impl FromStr for RtpMapAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_rtpmap(s)
    }
}

impl fmt::Display for RtpMapAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.payload_type, self.encoding_name, self.clock_rate)?;
        if let Some(params) = &self.encoding_params {
            write!(f, "/{}", params)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtpmap_attribute_comprehensive() {
        // Valid cases
        assert!(parse_rtpmap("96 H264/90000").is_ok());
        assert!(parse_rtpmap("97 opus/48000/2").is_ok());
        assert!(parse_rtpmap("0 PCMU/8000").is_ok());
        assert!(parse_rtpmap("8 PCMA/8000/1").is_ok());
        assert!(parse_rtpmap("101 telephone-event/8000").is_ok());

        let rtpmap = parse_rtpmap("97 opus/48000/2").unwrap();
        assert_eq!(rtpmap.payload_type, 97);
        assert_eq!(rtpmap.encoding_name, "opus");
        assert_eq!(rtpmap.clock_rate, 48000);
        assert_eq!(rtpmap.encoding_params, Some("2".to_string()));
        assert_eq!(rtpmap.channels(), Some(2));

        // Maximum payload type (127)
        assert!(parse_rtpmap("127 opus/48000").is_ok());

        // Surrounding whitespace is tolerated
        assert!(parse_rtpmap("  0 PCMU/8000  ").is_ok());
    }

    #[test]
    fn test_rtpmap_rejects_malformed_values() {
        // Missing space
        assert!(parse_rtpmap("96H264/90000").is_err());
        // Missing clock rate
        assert!(parse_rtpmap("96 H264").is_err());
        // Missing payload type
        assert!(parse_rtpmap("H264/90000").is_err());
        // Payload type over 127
        assert!(parse_rtpmap("128 H264/90000").is_err());
        assert!(parse_rtpmap("256 H264/90000").is_err());
        // Non-numeric payload type
        assert!(parse_rtpmap("PT H264/90000").is_err());
        // Invalid encoding name character
        assert!(parse_rtpmap("96 H264@/90000").is_err());
        // Non-numeric clock rate
        assert!(parse_rtpmap("96 H264/clock").is_err());
        // Trailing garbage
        assert!(parse_rtpmap("96 H264/90000 extra").is_err());
        assert!(parse_rtpmap("").is_err());
    }

    #[test]
    fn test_encoding_parser() {
        let (_, (name, rate, params)) = encoding_parser("H264/90000").unwrap();
        assert_eq!(name, "H264");
        assert_eq!(rate, 90000);
        assert_eq!(params, None);

        assert!(encoding_parser("opus").is_err());
        assert!(encoding_parser("opus/").is_err());
        assert!(encoding_parser("opus/rate").is_err());
    }

    #[test]
    fn test_same_encoding_is_case_insensitive() {
        let a = RtpMapAttribute::new(97, "opus", 48000);
        let b = RtpMapAttribute::new(111, "OPUS", 48000);
        let c = RtpMapAttribute::new(98, "opus", 16000);
        assert!(a.same_encoding(&b));
        assert!(!a.same_encoding(&c));
    }

    #[test]
    fn test_display_round_trips() {
        let rtpmap = RtpMapAttribute::new(97, "opus", 48000).with_params("2");
        assert_eq!(rtpmap.to_string(), "97 opus/48000/2");
        assert_eq!(rtpmap.to_string().parse::<RtpMapAttribute>().unwrap(), rtpmap);
    }
}
