use std::convert::Infallible;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use lease_pool::Pool;

fn acquire_uncontended(pool: &Pool<usize>, count: usize) {
    for _ in 0..count {
        let lease = pool.acquire().unwrap();
        criterion::black_box(*lease);
    }
}

fn acquire_contended(pool: &Pool<usize>, threads: usize, count: usize) {
    let workers: Vec<_> = (0..threads)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || acquire_uncontended(&pool, count))
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}

fn bench_acquire(c: &mut Criterion) {
    let count = 1000;
    let pool = Pool::new(4, || Ok::<_, Infallible>(0usize)).unwrap();
    c.bench_with_input(BenchmarkId::new("uncontended", count), &count, |b, &s| {
        b.iter(|| acquire_uncontended(&pool, s));
    });
    for threads in [2, 8, 32].iter() {
        c.bench_with_input(
            BenchmarkId::new("contended", threads),
            threads,
            |b, &threads| {
                b.iter(|| acquire_contended(&pool, threads, count / threads));
            },
        );
    }
}

criterion_group!(benches, bench_acquire);
criterion_main!(benches);
