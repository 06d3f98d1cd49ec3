//! Cooperative cancellation context
//!
//! A `CancellationContext` is handed to every unit of work. The executors only
//! thread it through; honoring it is entirely up to the action or step.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Instant};

use crate::error::CancelReason;

/// Cloneable handle onto a cancellation scope.
///
/// Clones share the same scope. Derived contexts ([`child`](Self::child),
/// [`with_timeout`](Self::with_timeout), [`with_deadline`](Self::with_deadline))
/// are cancelled whenever their parent is, and can also be cancelled on their
/// own without affecting the parent.
#[derive(Clone)]
pub struct CancellationContext {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<CancellationContext>,
    // Already clamped to the parent's deadline.
    deadline: Option<Instant>,
    reason: OnceLock<CancelReason>,
    notify: Notify,
}

impl CancellationContext {
    /// Root context: never cancelled unless `cancel()` is called on it
    pub fn background() -> Self {
        Self::derive(None, None)
    }

    fn derive(parent: Option<CancellationContext>, deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                parent,
                deadline,
                reason: OnceLock::new(),
                notify: Notify::new(),
            }),
        }
    }

    pub fn child(&self) -> Self {
        Self::derive(Some(self.clone()), self.deadline())
    }

    /// Child context that expires at `deadline`, or at the parent's deadline if that is earlier
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let effective = match self.deadline() {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self::derive(Some(self.clone()), Some(effective))
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancel this context and everything derived from it. Idempotent.
    pub fn cancel(&self) {
        if self.reason().is_some() {
            return;
        }
        if self.inner.reason.set(CancelReason::Cancelled).is_ok() {
            log::trace!("cancellation context cancelled");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// `None` while the context is live
    pub fn reason(&self) -> Option<CancelReason> {
        if let Some(reason) = self.inner.reason.get() {
            return Some(*reason);
        }
        if let Some(reason) = self.inner.parent.as_ref().and_then(|p| p.reason()) {
            return Some(reason);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Resolves once this context, or any ancestor, is cancelled or expires
    pub fn cancelled(&self) -> BoxFuture<'_, CancelReason> {
        async move {
            loop {
                let notified = self.inner.notify.notified();
                tokio::pin!(notified);
                // Register before checking so a concurrent cancel() is not missed.
                notified.as_mut().enable();

                if let Some(reason) = self.reason() {
                    return reason;
                }

                let deadline = async {
                    match self.inner.deadline {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                };
                let parent = async {
                    match &self.inner.parent {
                        Some(parent) => {
                            parent.cancelled().await;
                        }
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    _ = notified => {},
                    _ = deadline => {},
                    _ = parent => {},
                }
            }
        }
        .boxed()
    }

    /// Run `fut` unless the context finishes first.
    ///
    /// Convenience for units of work that want to honor cancellation; the
    /// executors themselves never call this.
    pub async fn run_until_cancelled<F>(&self, fut: F) -> Result<F::Output, CancelReason>
    where
        F: Future,
    {
        if let Some(reason) = self.reason() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            reason = self.cancelled() => Err(reason),
            output = fut => Ok(output),
        }
    }
}

impl Default for CancellationContext {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for CancellationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationContext")
            .field("deadline", &self.inner.deadline)
            .field("reason", &self.reason())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}
