use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonectx::{buffer_pool, ContextOptions, Environment};

use crate::SAMPLE_RATES;

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/pool");
    let env = Environment::default();

    for &rate in SAMPLE_RATES {
        let ctx = env.new_context_with(ContextOptions::new().sample_rate(rate));
        let Some(pool) = buffer_pool(&ctx) else {
            continue;
        };
        // One idle buffer so every get is a reuse
        pool.store(pool.get());

        // Reset dominates: every tone and harmonic slot is zeroed on store
        group.bench_with_input(BenchmarkId::new("get_store", rate), &rate, |b, _| {
            b.iter(|| {
                let mut buffer = pool.get();
                buffer.tones_mut()[0].frequency = black_box(440.0);
                pool.store(buffer);
            })
        });

        group.bench_with_input(BenchmarkId::new("count", rate), &rate, |b, _| {
            b.iter(|| black_box(pool.count()))
        });
    }

    group.finish();
}
