//! Parse request failures

use super::protocol::RequestId;

/// Why a parse request did not produce a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The worker channel was never created or has been shut down
    ChannelUnavailable,
    /// The backend did not become ready within the wait window
    InitializationTimeout,
    /// The backend reported a failure while initializing
    InitializationFailed(String),
    /// The backend rejected the input
    Backend(String),
    /// The backend's output is not a valid serialized tree
    MalformedResult(String),
    /// A newer request replaced this one; expected during typing
    Superseded { request_id: RequestId },
}

impl ParseError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Failures that mean highlighting is unavailable altogether
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ChannelUnavailable | Self::InitializationTimeout | Self::InitializationFailed(_)
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelUnavailable => write!(f, "channel not available"),
            Self::InitializationTimeout => write!(f, "initialization timeout"),
            Self::InitializationFailed(e) => write!(f, "initialization failed: {}", e),
            Self::Backend(e) => write!(f, "parse error: {}", e),
            Self::MalformedResult(e) => write!(f, "malformed parse result: {}", e),
            Self::Superseded { request_id } => {
                write!(f, "request {} superseded by newer request", request_id)
            }
        }
    }
}

impl std::error::Error for ParseError {}
