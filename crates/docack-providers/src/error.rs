//! Provider client error types.

/// Errors from calls to the managed collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The provider returned a non-2xx status.
    #[error("provider {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// An endpoint URL could not be built from the configured base URL.
    #[error("invalid URL for {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
    /// The provider response was missing a field the contract requires.
    #[error("provider {endpoint} response missing {field}")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
