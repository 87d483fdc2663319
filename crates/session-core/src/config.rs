//! Session manager configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::negotiator::NegotiationOptions;

/// Default upper bound on the number of streams in one session
pub const DEFAULT_MAX_STREAMS: usize = 16;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration applied when creating a media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of streams a session may hold
    pub max_streams: usize,
    /// Stream negotiation options
    pub negotiation: NegotiationOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_streams: DEFAULT_MAX_STREAMS,
            negotiation: NegotiationOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Set the stream limit
    pub fn with_max_streams(mut self, max_streams: usize) -> Self {
        self.max_streams = max_streams;
        self
    }

    /// Reject malformed rtpmaps on static payload types
    pub fn with_strict_static_rtpmap(mut self, strict: bool) -> Self {
        self.negotiation.strict_static_rtpmap = strict;
        self
    }

    /// Check the configuration for values no session could be created with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_streams == 0 {
            return Err(ConfigError::Invalid("max_streams must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&contents)
    }
}
