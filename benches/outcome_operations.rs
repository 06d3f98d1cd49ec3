use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::future::join_all;
use futures_util::stream::StreamExt;
use rs2_outcome::{spawn_do, spawn_stream, BoxError, CancellationContext, Step};
use tokio::runtime::Runtime;

fn bench_spawn_do(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("spawn_do");

    for count in [1, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("fan_out", count), count, |b, &count| {
            b.to_async(&rt).iter(|| async move {
                let conduits = (0..count).map(|i| {
                    spawn_do(CancellationContext::background(), move |_ctx| async move {
                        Ok::<_, BoxError>(black_box(i * 2))
                    })
                });
                let outcomes = join_all(conduits.map(|mut c| async move { c.recv().await })).await;
                black_box(outcomes)
            });
        });
    }

    group.finish();
}

fn bench_spawn_stream(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("spawn_stream");

    for size in [10, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("handoff", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let mut n = 0usize;
                let total: usize = spawn_stream(CancellationContext::background(), move |_ctx| {
                    n += 1;
                    futures::future::ready(Step::<_, BoxError>::from((Ok(n), n < size)))
                })
                .map(|o| o.into_value())
                .fold(0, |acc, x| async move { acc + x })
                .await;
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spawn_do, bench_spawn_stream);
criterion_main!(benches);
