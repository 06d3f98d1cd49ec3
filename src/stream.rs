//! Repeated execution: call a step function in a loop, deliver one outcome per call

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::conduit::{spawn_producer, Conduit};
use crate::config::{AbandonPolicy, TaskConfig};
use crate::exec::run_blocking;
use crate::outcome::Outcome;

/// What one iteration of a streaming unit of work produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<T, E> {
    pub result: Result<T, E>,
    /// Run another iteration after this one
    pub next: bool,
}

impl<T, E> Step<T, E> {
    /// More iterations follow
    pub fn more(result: Result<T, E>) -> Self {
        Self { result, next: true }
    }

    /// Final iteration; its outcome is still delivered
    pub fn last(result: Result<T, E>) -> Self {
        Self {
            result,
            next: false,
        }
    }
}

impl<T, E> From<(Result<T, E>, bool)> for Step<T, E> {
    fn from((result, next): (Result<T, E>, bool)) -> Self {
        Self { result, next }
    }
}

/// Call `step` repeatedly on its own task, delivering each iteration's outcome in order.
///
/// Iterations are strictly sequential. Each one's outcome is handed to the
/// consumer before its `next` flag is looked at; when the flag is false the
/// conduit closes and `step` is never called again.
///
/// A failed iteration does not end the loop. Only `next` decides, so a step
/// that wants to stop on error must return `Step::last(Err(..))`. Consumers
/// that prefer to stop reading at the first failure can use
/// [`until_failure`](crate::OutcomeStreamExt::until_failure).
///
/// `ctx` is cloned into every call and never inspected here; cancellation is
/// the step's job, signalled through its own `next` flag. A conduit that is kept
/// but not read stalls the loop at the next delivery.
///
/// # Examples
/// ```
/// use futures_util::StreamExt;
/// use rs2_outcome::{spawn_stream, CancellationContext, Step};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut counter = 0;
/// let conduit = spawn_stream(CancellationContext::background(), move |_ctx| {
///     counter += 1;
///     let n = counter;
///     async move { Step::<_, std::io::Error>::from((Ok(n), n < 3)) }
/// });
/// let values: Vec<i32> = conduit.map(|o| o.into_value()).collect().await;
/// assert_eq!(values, vec![1, 2, 3]);
/// # }
/// ```
///
/// # Panics
/// Panics when called outside a Tokio runtime.
pub fn spawn_stream<C, T, E, F, Fut>(ctx: C, step: F) -> Conduit<T, E>
where
    C: Clone + Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnMut(C) -> Fut + Send + 'static,
    Fut: Future<Output = Step<T, E>> + Send + 'static,
{
    spawn_stream_with_config(TaskConfig::default(), ctx, step)
}

/// [`spawn_stream`] with a label and abandon policy from `config`
pub fn spawn_stream_with_config<C, T, E, F, Fut>(
    config: TaskConfig,
    ctx: C,
    mut step: F,
) -> Conduit<T, E>
where
    C: Clone + Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnMut(C) -> Fut + Send + 'static,
    Fut: Future<Output = Step<T, E>> + Send + 'static,
{
    let TaskConfig {
        label,
        abandon_policy,
    } = config;
    log::debug!("spawning streaming task '{}'", label);

    spawn_producer(move |delivery| async move {
        let mut iteration: u64 = 0;
        let mut abandoned = false;

        loop {
            iteration += 1;
            let Step { result, next } = step(ctx.clone()).await;

            if !abandoned {
                let outcome = Outcome::from(result);
                log::trace!(
                    "task '{}' iteration {} delivering {} outcome",
                    label,
                    iteration,
                    if outcome.is_success() { "success" } else { "failure" }
                );
                if delivery.deliver(outcome).await.is_err() {
                    abandoned = true;
                    match abandon_policy {
                        AbandonPolicy::Stop => {
                            log::warn!(
                                "task '{}': conduit dropped at iteration {}, stopping",
                                label,
                                iteration
                            );
                            break;
                        }
                        AbandonPolicy::Drain => log::warn!(
                            "task '{}': conduit dropped at iteration {}, draining",
                            label,
                            iteration
                        ),
                    }
                }
            }

            if !next {
                break;
            }
        }

        log::debug!("task '{}' closed after {} iterations", label, iteration);
    })
}

/// [`spawn_stream`] for a synchronous step, each call run on Tokio's blocking thread pool
pub fn spawn_stream_blocking<C, T, E, F>(ctx: C, step: F) -> Conduit<T, E>
where
    C: Clone + Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnMut(C) -> Step<T, E> + Send + 'static,
{
    let step = Arc::new(Mutex::new(step));
    spawn_stream(ctx, move |ctx| {
        let step = Arc::clone(&step);
        run_blocking(move || {
            let mut step = step.lock().unwrap_or_else(PoisonError::into_inner);
            (*step)(ctx)
        })
    })
}
