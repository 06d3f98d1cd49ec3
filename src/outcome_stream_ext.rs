use async_stream::stream;
use futures::future::BoxFuture;
use futures_core::Stream;
use futures_util::pin_mut;
use futures_util::stream::{BoxStream, StreamExt};

use crate::outcome::Outcome;

/// A boxed, heap-allocated stream returned by the consumer-side helpers
pub type OutcomeStream<O> = BoxStream<'static, O>;

/// Extension trait for streams of [`Outcome`]s, including every [`Conduit`](crate::Conduit)
pub trait OutcomeStreamExt<T: Send + 'static, E: Send + 'static>:
    Stream<Item = Outcome<T, E>> + Sized + Unpin + Send + 'static
{
    /// Convert each outcome into a plain `Result`
    fn into_results(self) -> OutcomeStream<Result<T, E>> {
        self.map(Outcome::into_result).boxed()
    }

    /// Keep only the values of success-tagged outcomes
    fn successes(self) -> OutcomeStream<T> {
        let s = self;
        stream! {
            pin_mut!(s);
            while let Some(outcome) = s.next().await {
                if let Ok(v) = outcome.into_result() {
                    yield v;
                }
            }
        }
        .boxed()
    }

    /// Keep only the failure indicators
    fn failures(self) -> OutcomeStream<E> {
        let s = self;
        stream! {
            pin_mut!(s);
            while let Some(outcome) = s.next().await {
                if let Err(e) = outcome.into_result() {
                    yield e;
                }
            }
        }
        .boxed()
    }

    /// End the sequence right after the first failure-tagged outcome.
    ///
    /// Only the consumer stops reading. A conduit's producer still follows its
    /// step's `next` flag and reacts to the dropped conduit per its abandon policy.
    fn until_failure(self) -> OutcomeStream<Outcome<T, E>> {
        let s = self;
        stream! {
            pin_mut!(s);
            while let Some(outcome) = s.next().await {
                let failed = outcome.is_failure();
                yield outcome;
                if failed {
                    break;
                }
            }
        }
        .boxed()
    }

    /// Drain the stream and split it into successful values and failures, each in arrival order
    fn collect_outcomes(self) -> BoxFuture<'static, (Vec<T>, Vec<E>)> {
        let s = self;
        Box::pin(async move {
            let mut values = Vec::new();
            let mut errors = Vec::new();
            pin_mut!(s);
            while let Some(outcome) = s.next().await {
                match outcome.into_result() {
                    Ok(v) => values.push(v),
                    Err(e) => errors.push(e),
                }
            }
            (values, errors)
        })
    }
}

impl<T, E, S> OutcomeStreamExt<T, E> for S
where
    S: Stream<Item = Outcome<T, E>> + Sized + Unpin + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
}
