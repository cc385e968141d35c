//! Failures inside the reporting client.
//!
//! None of these reach the host application: the notifier logs them and
//! reports the outcome through [`NotifyOutcome`](crate::NotifyOutcome) and
//! [`FlushOutcome`](crate::FlushOutcome) instead.

use thiserror::Error;

/// Errors raised while building or delivering a report.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no API key configured, couldn't notify")]
    MissingApiKey,

    #[error("no collector endpoint configured")]
    MissingEndpoint,

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("delivery to {endpoint} failed: {reason}")]
    Delivery { endpoint: String, reason: String },

    #[error("metadata callback failed: {0}")]
    Callback(String),
}

impl RelayError {
    pub(crate) fn delivery<E: ToString, R: core::fmt::Display>(endpoint: E, reason: R) -> Self {
        Self::Delivery {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for misconfiguration rather than runtime failure.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::MissingEndpoint)
    }
}

/// Result type of fallible reporting operations.
pub type RelayResult<T> = Result<T, RelayError>;
