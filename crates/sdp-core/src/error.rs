use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interpreting session description values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An attribute or field value does not follow the SDP grammar
    #[error("SDP parsing error: {0}")]
    SdpParsingError(String),
}
