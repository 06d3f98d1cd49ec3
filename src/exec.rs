//! Single-shot execution: run one unit of work, deliver exactly one outcome

use std::future::Future;
use std::panic::resume_unwind;

use crate::conduit::{spawn_producer, Conduit};
use crate::config::TaskConfig;
use crate::outcome::Outcome;

/// Run `action` on its own task and return a conduit carrying its single outcome.
///
/// Returns immediately; `action` is never called on the caller's task. Once
/// `action` finishes its result is wrapped into one [`Outcome`], handed to the
/// consumer, and the conduit is closed.
///
/// `ctx` is passed through untouched. Nothing here watches it: an action that
/// ignores cancellation keeps its task alive until it returns on its own.
///
/// The handoff waits for the consumer. If the conduit is kept but never read,
/// the task never finishes.
///
/// # Examples
/// ```
/// use rs2_outcome::{spawn_do, CancellationContext};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut conduit = spawn_do(CancellationContext::background(), |_ctx| async {
///     Ok::<_, std::io::Error>("hi".to_string())
/// });
/// let outcome = conduit.recv().await.unwrap();
/// assert_eq!(outcome.value(), "hi");
/// assert!(conduit.recv().await.is_none());
/// # }
/// ```
///
/// # Panics
/// Panics when called outside a Tokio runtime.
pub fn spawn_do<C, T, E, F, Fut>(ctx: C, action: F) -> Conduit<T, E>
where
    C: Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnOnce(C) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    spawn_do_with_config(TaskConfig::default(), ctx, action)
}

/// [`spawn_do`] with a label and policies from `config`
pub fn spawn_do_with_config<C, T, E, F, Fut>(config: TaskConfig, ctx: C, action: F) -> Conduit<T, E>
where
    C: Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnOnce(C) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let label = config.label;
    log::debug!("spawning single-shot task '{}'", label);

    spawn_producer(move |delivery| async move {
        let outcome = Outcome::from(action(ctx).await);
        log::trace!(
            "task '{}' delivering {} outcome",
            label,
            if outcome.is_success() { "success" } else { "failure" }
        );
        if delivery.deliver(outcome).await.is_err() {
            log::debug!("task '{}': conduit dropped, outcome discarded", label);
        }
        log::debug!("task '{}' closed", label);
    })
}

/// [`spawn_do`] for a synchronous action, run on Tokio's blocking thread pool
pub fn spawn_do_blocking<C, T, E, F>(ctx: C, action: F) -> Conduit<T, E>
where
    C: Send + 'static,
    T: Default + Send + 'static,
    E: Send + 'static,
    F: FnOnce(C) -> Result<T, E> + Send + 'static,
{
    spawn_do(ctx, move |ctx| run_blocking(move || action(ctx)))
}

/// Run `f` on the blocking pool, resuming its panic on the calling task.
pub(crate) async fn run_blocking<R, F>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(output) => output,
        Err(err) if err.is_panic() => resume_unwind(err.into_panic()),
        // Runtime is shutting down and will drop this task.
        Err(_) => std::future::pending().await,
    }
}
