//! One-writer, one-reader handoff for outcomes
//!
//! A conduit is a tokio `mpsc` channel with a single slot. The producer side
//! does a rendezvous handoff: `deliver` only returns once the consumer has taken
//! the outcome out of the slot. A conduit nobody reads therefore parks its
//! producer task forever. That is the documented lifecycle, not a bug; read
//! every conduit you create, or drop it.

use std::fmt;
use std::future::Future;
use std::panic::resume_unwind;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::task::noop_waker_ref;
use futures_core::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{BoxError, TryRecvError};
use crate::outcome::Outcome;

/// Consumer end of a spawned unit of work.
///
/// Yields zero or more [`Outcome`]s followed by end-of-stream. Once closed, every
/// further read reports closed without blocking.
///
/// If the producing task panicked, the panic is resumed on the consumer at the
/// point where it would otherwise observe the end of the conduit. A panic is
/// never turned into an `Outcome`.
pub struct Conduit<T, E = BoxError> {
    receiver: mpsc::Receiver<Outcome<T, E>>,
    producer: Option<JoinHandle<()>>,
}

impl<T, E> Unpin for Conduit<T, E> {}

/// Producer end, owned by the spawned task. Dropping it closes the conduit.
pub(crate) struct Delivery<T, E> {
    sender: mpsc::Sender<Outcome<T, E>>,
}

/// The consumer dropped its conduit
#[derive(Debug)]
pub(crate) struct Abandoned;

impl<T, E> Delivery<T, E> {
    /// Hand `outcome` to the consumer, waiting until it has been taken
    pub(crate) async fn deliver(&self, outcome: Outcome<T, E>) -> Result<(), Abandoned> {
        self.sender.send(outcome).await.map_err(|_| Abandoned)?;
        // The slot frees up only when the consumer receives.
        self.sender.reserve().await.map(drop).map_err(|_| Abandoned)
    }
}

/// Spawn `produce` as its own task and return the consumer end.
///
/// # Panics
/// Panics when called outside a Tokio runtime.
pub(crate) fn spawn_producer<T, E, F, Fut>(produce: F) -> Conduit<T, E>
where
    F: FnOnce(Delivery<T, E>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(1);
    let producer = tokio::spawn(produce(Delivery { sender }));
    Conduit {
        receiver,
        producer: Some(producer),
    }
}

impl<T, E> Conduit<T, E> {
    /// Wait for the next outcome; `None` once the producer has closed the conduit
    pub async fn recv(&mut self) -> Option<Outcome<T, E>> {
        futures::future::poll_fn(|cx| self.poll_recv(cx)).await
    }

    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Outcome<T, E>>> {
        match ready!(self.receiver.poll_recv(cx)) {
            Some(outcome) => Poll::Ready(Some(outcome)),
            None => self.poll_producer_exit(cx).map(|()| None),
        }
    }

    /// Non-blocking read.
    ///
    /// Returns [`TryRecvError::Empty`] while the producer is still working and
    /// [`TryRecvError::Closed`] once it has closed the conduit.
    pub fn try_recv(&mut self) -> Result<Outcome<T, E>, TryRecvError> {
        match self.receiver.try_recv() {
            Ok(outcome) => Ok(outcome),
            Err(mpsc::error::TryRecvError::Empty) => Err(TryRecvError::Empty),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if self.producer.as_ref().is_some_and(|p| p.is_finished()) {
                    let mut cx = Context::from_waker(noop_waker_ref());
                    let _ = self.poll_producer_exit(&mut cx);
                }
                Err(TryRecvError::Closed)
            }
        }
    }

    /// Whether the producing task has ended, cleanly or not
    pub fn is_producer_finished(&self) -> bool {
        self.producer.as_ref().map_or(true, |p| p.is_finished())
    }

    fn poll_producer_exit(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        let Some(producer) = self.producer.as_mut() else {
            return Poll::Ready(());
        };
        let joined = ready!(Pin::new(producer).poll(cx));
        self.producer = None;
        match joined {
            Err(err) if err.is_panic() => resume_unwind(err.into_panic()),
            // Cancelled only happens on runtime shutdown; report a plain close.
            _ => Poll::Ready(()),
        }
    }
}

impl<T, E> Stream for Conduit<T, E> {
    type Item = Outcome<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_recv(cx)
    }
}

impl<T, E> fmt::Debug for Conduit<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conduit")
            .field("pending", &self.receiver.len())
            .field("producer_finished", &self.is_producer_finished())
            .finish()
    }
}
