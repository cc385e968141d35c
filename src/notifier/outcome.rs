use crate::error::RelayError;

/// Why a report was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The release stage is not in the notify allowlist.
    ReleaseStage,
    /// The severity is outside the reporting mask.
    Severity,
    /// No API key has been registered.
    MissingApiKey,
}

/// Result of one flush.
#[derive(Debug)]
pub enum FlushOutcome {
    /// Nothing was queued.
    Empty,
    /// The batch was handed to the transport.
    Delivered { events: usize },
    /// The batch was dropped.
    Failed { events: usize, error: RelayError },
}

impl FlushOutcome {
    /// Returns `true` when the batch reached the transport.
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Number of events that left the queue.
    #[inline]
    pub fn events(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Delivered { events } | Self::Failed { events, .. } => *events,
        }
    }
}

/// Result of one notify call.
#[derive(Debug)]
pub enum NotifyOutcome {
    /// Deliberately not reported.
    Skipped(SkipReason),
    /// Queued for the end-of-execution flush.
    Queued { pending: usize },
    /// Queued and flushed right away.
    Flushed(FlushOutcome),
}

impl NotifyOutcome {
    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Why the report was skipped, if it was.
    #[inline]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }
}
