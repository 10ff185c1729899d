use thiserror::Error;

/// Errors from talking to the Cristin API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The detail endpoint answered 404 for the requested project.
    #[error("project not found upstream")]
    NotFound,

    /// The response body could not be deserialized into the expected type.
    #[error("json decode error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be constructed. Should not happen for
    /// validated input; callers treat it as an internal error.
    #[error("failed to construct upstream url: {0}")]
    Url(String),
}
