use thiserror::Error;

/// Failures surfaced by the navigation and permission pipeline.
///
/// Values are `Clone` because a single coalesced request hands the same outcome
/// to every waiting caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Session expired ({status})")]
    TokenExpired { status: u16 },
    #[error("Server error ({status}): {message}")]
    ServerFault { status: u16, message: String },
    #[error("{0}")]
    Backend(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("No se encontró la sección {section} o subsección {subsection}")]
    LookupNotFound { section: String, subsection: String },
}

impl Error {
    /// HTTP status attached to the failure, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. }
            | Self::TokenExpired { status }
            | Self::ServerFault { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for transport and backend failures (as opposed to local lookup misses).
    #[must_use]
    pub const fn is_backend_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout(_)
                | Self::Http { .. }
                | Self::ServerFault { .. }
                | Self::TokenExpired { .. }
        )
    }
}
