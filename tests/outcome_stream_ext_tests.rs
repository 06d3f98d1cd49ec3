use futures_util::stream::{self, StreamExt};
use rs2_outcome::{spawn_stream, CancellationContext, Outcome, OutcomeStreamExt, Step};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn mixed() -> impl futures_core::Stream<Item = Outcome<i32, &'static str>> + Unpin + Send + 'static {
    stream::iter(vec![
        Outcome::success(1),
        Outcome::failure("bad 2"),
        Outcome::success(3),
        Outcome::failure("bad 4"),
        Outcome::success(5),
    ])
}

#[tokio::test]
async fn test_into_results() {
    let results: Vec<_> = mixed().into_results().collect().await;
    assert_eq!(results, vec![Ok(1), Err("bad 2"), Ok(3), Err("bad 4"), Ok(5)]);
}

#[tokio::test]
async fn test_successes_and_failures() {
    let ok: Vec<i32> = mixed().successes().collect().await;
    let err: Vec<&str> = mixed().failures().collect().await;

    assert_eq!(ok, vec![1, 3, 5]);
    assert_eq!(err, vec!["bad 2", "bad 4"]);
}

#[tokio::test]
async fn test_collect_outcomes_keeps_arrival_order() {
    let (values, errors) = mixed().collect_outcomes().await;

    assert_eq!(values, vec![1, 3, 5]);
    assert_eq!(errors, vec!["bad 2", "bad 4"]);
}

#[tokio::test]
async fn test_until_failure_stops_reading_a_conduit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let conduit = spawn_stream(CancellationContext::background(), move |_ctx| {
        let n = c.fetch_add(1, Ordering::SeqCst) + 1;
        let result = if n == 2 { Err("iteration 2") } else { Ok(n) };
        futures::future::ready(Step::more(result))
    });

    let seen: Vec<Outcome<usize, &str>> = conduit.until_failure().collect().await;

    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_success());
    assert_eq!(seen[1].error(), Some(&"iteration 2"));
}

#[tokio::test]
async fn test_until_failure_passes_everything_without_failures() {
    let all: Vec<_> = stream::iter(vec![Outcome::<u8, String>::success(1), Outcome::success(2)])
        .until_failure()
        .map(Outcome::into_value)
        .collect()
        .await;

    assert_eq!(all, vec![1, 2]);
}
