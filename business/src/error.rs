use directory_states::Cancelled;
use thiserror::Error;

/// Coarse classification used by callers deciding how to present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-2xx response, transport failure or an unreadable body.
    Network,
    /// Malformed or non-positive user identifier.
    InvalidId,
    /// Path that no route matches.
    UnknownRoute,
    /// Request abandoned before completion.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("API returned status: {status}")]
    Status { status: u16 },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Invalid user id: {0:?}")]
    InvalidId(String),
    #[error("No route matches {0:?}")]
    UnknownRoute(String),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Status { .. } | Self::Transport(_) | Self::Decode(_) => ErrorKind::Network,
            Self::InvalidId(_) => ErrorKind::InvalidId,
            Self::UnknownRoute(_) => ErrorKind::UnknownRoute,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Whether another attempt at a single-user load could plausibly succeed.
    /// A 404 means the user does not exist.
    pub fn is_transient(&self) -> bool {
        self.is_network() && !self.is_not_found()
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
