//! Error types shared by the menu sources and the cache.
//!
//! Nothing here is fatal to a digest: the aggregator downgrades every
//! [`MenuError`] raised by a source to "this source contributed nothing".
//! A missing section or an empty refresh are not errors at all; they show
//! up as an empty line list or `Ok(None)`.

use thiserror::Error;

/// Failure raised while producing one source's lines.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The upstream page or endpoint could not be fetched.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] reqwest::Error),

    /// A persisted or dropped JSON document failed to decode.
    #[error("malformed menu payload: {0}")]
    MalformedCache(#[from] serde_json::Error),

    /// Reading or writing a cache or inbox file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (bad YAML, regex, or URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// A CSS selector in the configuration does not parse.
    #[error("invalid selector `{0}`")]
    Selector(String),
}

impl From<serde_yaml::Error> for MenuError {
    fn from(e: serde_yaml::Error) -> Self {
        MenuError::Config(e.to_string())
    }
}

impl From<regex::Error> for MenuError {
    fn from(e: regex::Error) -> Self {
        MenuError::Config(e.to_string())
    }
}

impl From<url::ParseError> for MenuError {
    fn from(e: url::ParseError) -> Self {
        MenuError::Config(e.to_string())
    }
}
