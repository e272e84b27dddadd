use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a GET against the VCSN API produced no JSON.
///
/// No variant is retried automatically; only [`TransportError::Timeout`] is
/// tagged as worth retrying by the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Failed to connect to {url}")]
    Connection {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Too many redirects for {url}")]
    Redirect { url: String },

    #[error("HTTP request failed for {url} with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed")]
    Other {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl TransportError {
    /// Error tag: `Some("timeout")` for timeouts, `None` for everything else.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            TransportError::Timeout { .. } => Some("timeout"),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, TransportError::Connection { .. })
    }
}
