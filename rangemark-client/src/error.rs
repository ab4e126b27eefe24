//! Error types for rangemark-client.
//!
//! The taxonomy separates fatal pre-flight and fetch-side failures from the
//! per-record patch failure, so callers can branch on the variant instead of
//! inspecting message strings. Only [`ClientError::Patch`] is recoverable:
//! the patch batch catches it, logs it, and moves on.

use std::path::PathBuf;

use thiserror::Error;

use rangemark_core::RecordId;

/// All errors that can arise from inventory API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Pre-flight failure: endpoint unreachable or credential rejected.
    #[error("cannot reach inventory API at {endpoint}: {detail}")]
    Connection { endpoint: String, detail: String },

    /// The configured TLS trust anchor could not be loaded.
    #[error("failed to load trust anchor {path}: {detail}")]
    TrustAnchor { path: PathBuf, detail: String },

    /// A page fetch failed on transport or authorization.
    #[error("failed to fetch IP ranges from {endpoint}: {detail}")]
    Fetch {
        endpoint: String,
        /// HTTP status when the server answered; `None` for transport errors.
        status: Option<u16>,
        detail: String,
    },

    /// The server answered a fetch with a payload of an unexpected shape.
    #[error("unexpected response payload from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },

    /// A single-record patch failed. Recoverable: the batch continues.
    #[error("failed to patch IP range {id}: {detail}")]
    Patch {
        id: RecordId,
        status: Option<u16>,
        detail: String,
    },
}

impl ClientError {
    /// Whether a retry could plausibly succeed: transport failures and
    /// server-side 5xx answers. Client-side 4xx answers are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Fetch { status, .. } | ClientError::Patch { status, .. } => {
                status.map_or(true, |code| code >= 500)
            }
            _ => false,
        }
    }
}

/// Split a `ureq` error into an optional HTTP status and a display string.
pub(crate) fn status_and_detail(err: ureq::Error) -> (Option<u16>, String) {
    match err {
        ureq::Error::Status(code, response) => {
            (Some(code), format!("HTTP {code} {}", response.status_text()))
        }
        ureq::Error::Transport(transport) => (None, transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_5xx_are_retryable() {
        let transport = ClientError::Fetch {
            endpoint: "http://x".into(),
            status: None,
            detail: "connection refused".into(),
        };
        let server = ClientError::Patch {
            id: RecordId(1),
            status: Some(503),
            detail: "HTTP 503".into(),
        };
        assert!(transport.is_retryable());
        assert!(server.is_retryable());
    }

    #[test]
    fn client_side_failures_are_final() {
        let forbidden = ClientError::Fetch {
            endpoint: "http://x".into(),
            status: Some(403),
            detail: "HTTP 403".into(),
        };
        let connection = ClientError::Connection {
            endpoint: "http://x".into(),
            detail: "refused".into(),
        };
        assert!(!forbidden.is_retryable());
        assert!(!connection.is_retryable());
    }
}
