//! Common parsing utilities for SDP attributes
//!
//! Reusable nom parsers shared by the attribute parsers.

use crate::error::{Error, Result};
use nom::{
    bytes::complete::take_while1,
    character::complete::digit1,
    combinator::map_res,
    IResult,
};

/// Token characters as allowed in SDP encoding names and attribute names
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '.' | '!' | '%' | '*' | '_' | '+' | '`' | '\'' | '~')
}

/// Parses a token (RFC 8866 token characters)
pub fn token(input: &str) -> IResult<&str, &str> {
    take_while1(is_token_char)(input)
}

/// Parses a positive integer
pub fn positive_integer(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>())(input)
}

/// Converts a nom result into our `Result`, requiring the whole input to be consumed
pub fn to_result<'a, T>(res: IResult<&'a str, T>, err_msg: &str) -> Result<T> {
    match res {
        Ok((rest, value)) if rest.trim().is_empty() => Ok(value),
        Ok((rest, _)) => Err(Error::SdpParsingError(format!(
            "{err_msg}: unexpected trailing input '{rest}'"
        ))),
        Err(_) => Err(Error::SdpParsingError(err_msg.to_string())),
    }
}
