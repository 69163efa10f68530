use std::sync::Arc;
use std::thread;
use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use robin_wrr::WeightedSelector;

/// Payload roughly the size of a small backend descriptor.
#[allow(dead_code)]
#[derive(Clone, Default)]
struct Backend {
    id: u64,
    host: String,
    zone: String,
    capacity: f64,
    healthy: bool,
}

fn populated(items: usize) -> WeightedSelector<Backend> {
    let mut rng = rand::thread_rng();
    let sel = WeightedSelector::new();
    sel.add_all((0..items).map(|i| {
        let backend = Backend { id: i as u64, ..Backend::default() };
        (backend, rng.gen_range(100..110))
    }))
    .expect("positive weights");
    sel
}

fn bench_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrr_next");
    group.throughput(Throughput::Elements(1));
    for items in [10usize, 100, 1000] {
        let sel = populated(items);
        group.bench_with_input(BenchmarkId::new("single_thread", items), &sel, |b, sel| {
            b.iter(|| black_box(sel.next()))
        });
    }
    group.finish();
}

fn bench_next_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrr_next_contended");
    let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
    let sel = Arc::new(populated(1000));
    group.bench_function(BenchmarkId::new("threads", threads), |b| {
        b.iter_custom(|iters| {
            let per_thread = iters / threads as u64 + 1;
            let start = Instant::now();
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let sel = Arc::clone(&sel);
                    thread::spawn(move || {
                        for _ in 0..per_thread {
                            black_box(sel.next());
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().expect("bench worker");
            }
            start.elapsed()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_next, bench_next_contended);
criterion_main!(benches);
