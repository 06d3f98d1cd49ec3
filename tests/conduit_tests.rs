use futures_util::stream::StreamExt;
use rs2_outcome::{spawn_do, spawn_stream, BoxError, CancellationContext, Step, TryRecvError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn test_reads_after_close_never_block() {
    let mut conduit = spawn_do(CancellationContext::background(), |_ctx| async {
        Ok::<_, BoxError>(1)
    });
    assert!(conduit.recv().await.is_some());

    for _ in 0..3 {
        let next = timeout(Duration::from_millis(100), conduit.recv())
            .await
            .expect("closed conduit must not block");
        assert!(next.is_none());
        assert_eq!(conduit.try_recv().unwrap_err(), TryRecvError::Closed);
        assert!(conduit.next().await.is_none());
    }
    assert!(conduit.is_producer_finished());
}

#[tokio::test]
async fn test_try_recv_reports_empty_while_producer_works() {
    let (release_tx, release_rx) = oneshot::channel::<u32>();
    let mut conduit = spawn_do(CancellationContext::background(), move |_ctx| async move {
        release_rx.await.map_err(|e| BoxError::from(e.to_string()))
    });

    sleep(Duration::from_millis(10)).await;
    let err = conduit.try_recv().unwrap_err();
    assert_eq!(err, TryRecvError::Empty);
    assert!(!err.is_closed());

    release_tx.send(8).unwrap();
    assert_eq!(conduit.recv().await.unwrap().into_value(), 8);
}

#[tokio::test]
async fn test_try_recv_takes_pending_outcome_without_waiting() {
    let mut conduit = spawn_do(CancellationContext::background(), |_ctx| async {
        Ok::<_, BoxError>("ready")
    });

    let outcome = timeout(Duration::from_secs(1), async {
        loop {
            match conduit.try_recv() {
                Ok(outcome) => break outcome,
                Err(TryRecvError::Empty) => sleep(Duration::from_millis(1)).await,
                Err(TryRecvError::Closed) => panic!("closed before delivering"),
            }
        }
    })
    .await
    .expect("outcome arrives");
    assert_eq!(*outcome.value(), "ready");

    let closed = timeout(Duration::from_secs(1), async {
        loop {
            match conduit.try_recv() {
                Err(TryRecvError::Closed) => break,
                _ => sleep(Duration::from_millis(1)).await,
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}

#[tokio::test]
async fn test_conduit_is_a_stream() {
    let mut i = 0u32;
    let conduit = spawn_stream(CancellationContext::background(), move |_ctx| {
        i += 1;
        let n = i;
        async move { Step::<_, BoxError>::from((Ok(n * n), n < 4)) }
    });

    let squares: Vec<u32> = conduit
        .filter(|o| futures::future::ready(o.is_success()))
        .map(|o| o.into_value())
        .collect()
        .await;
    assert_eq!(squares, vec![1, 4, 9, 16]);
}

#[tokio::test]
async fn test_debug_output_names_conduit() {
    let mut conduit = spawn_do(CancellationContext::background(), |_ctx| async {
        Ok::<_, BoxError>(())
    });

    let rendered = format!("{:?}", conduit);
    assert!(rendered.starts_with("Conduit"));

    assert!(conduit.recv().await.is_some());
    assert!(conduit.recv().await.is_none());
    assert!(format!("{:?}", conduit).contains("producer_finished: true"));
}
