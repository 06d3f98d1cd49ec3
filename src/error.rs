//! Error types for rs2-outcome
//!
//! The executors never raise errors of their own during normal operation.
//! Failures reported by a unit of work travel inside an [`Outcome`](crate::Outcome);
//! the types here cover the conduit surface and the cancellation context.

use std::fmt;

/// Opaque failure indicator used when the caller does not pick an error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Returned by [`Conduit::try_recv`](crate::Conduit::try_recv)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TryRecvError {
    /// No result is pending yet, but the producer may still send one
    #[error("no result pending")]
    Empty,
    /// The producer has closed the conduit and no results remain
    #[error("conduit closed")]
    Closed,
}

impl TryRecvError {
    pub fn is_closed(&self) -> bool {
        matches!(self, TryRecvError::Closed)
    }
}

/// Why a [`CancellationContext`](crate::CancellationContext) is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called on the context or one of its ancestors
    Cancelled,
    /// The context deadline passed
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

impl std::error::Error for CancelReason {}

impl From<tokio::time::error::Elapsed> for CancelReason {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        CancelReason::DeadlineExceeded
    }
}
