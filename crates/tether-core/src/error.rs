//! Error types shared across Tether crates
//!
//! - [`SaveError`]: a draft persistence call failed
//! - [`ConfigError`]: configuration could not be loaded or is out of range
//!
//! A navigation attempt against a dirty draft is not an error. It is the
//! host's `Blocked` state and is resolved explicitly by the user.

/// Draft persistence failure
///
/// Recovered locally by the autosave engine: it is surfaced as an error
/// status and the draft stays dirty so a later attempt can succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// Request never produced a response (connect, timeout, TLS...)
    #[error("network error: {0}")]
    Transport(String),

    /// Server answered with a non-success HTTP status
    #[error("server returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        body: String,
    },

    /// Server answered but did not acknowledge the save
    #[error("save was not acknowledged: {0}")]
    Rejected(String),

    /// Draft could not be encoded
    #[error("failed to serialize draft: {0}")]
    Serialization(String),

    /// Endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SaveError {
    /// Whether the failure happened before the server saw the request
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into the configuration schema
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
