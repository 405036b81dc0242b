use thiserror::Error;

/// Errors returned by the upstream product service client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request, including all its retries, exceeded the per-call timeout.
    #[error("upstream request timed out after {attempts} attempt(s): {url}")]
    Timeout { url: String, attempts: u32 },

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The call was cancelled through its cancellation token. Callers treat
    /// this as silence; it is never surfaced to the shopper.
    #[error("request cancelled")]
    Cancelled,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid upstream base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
