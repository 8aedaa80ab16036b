//! Maps web service error types.

/// Errors from the maps HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized: check MAPS_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by maps API")]
    RateLimited,

    /// API returned an error HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// API answered 200 but with a non-OK service status (e.g. `REQUEST_DENIED`)
    #[error("maps status {status}: {message}")]
    Status { status: String, message: String },

    /// No route between the requested points
    #[error("no route found")]
    NoRoute,

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response parsed but contained unusable data
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Strips the request URL, which carries the API key in its query string.
impl From<reqwest::Error> for MapsError {
    fn from(e: reqwest::Error) -> Self {
        MapsError::Http(e.without_url())
    }
}
