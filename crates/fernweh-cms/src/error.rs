//! Error types for CMS access.

/// Error from content API operations.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// HTTP request failed (network error, timeout, malformed body).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },
}
