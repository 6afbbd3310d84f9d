use thiserror::Error;

/// Failure to obtain any HTTP response.
///
/// Non-2xx responses are not errors at this layer; they come back as `HttpResponse`.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Io(String),

    #[error("invalid url '{url}': {reason}")]
    Url { url: String, reason: String },

    #[error("response body unreadable: {0}")]
    Body(String),
}
