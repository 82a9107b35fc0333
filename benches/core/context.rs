use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonectx::{ContextOptions, Environment};

use crate::SAMPLE_RATES;

pub fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/context");
    let env = Environment::default();

    group.bench_function("default", |b| b.iter(|| black_box(env.new_context())));

    for &rate in SAMPLE_RATES {
        // Warm the pool map so only the lookup path is measured
        let _ = env.new_context_with(ContextOptions::new().sample_rate(rate));

        group.bench_with_input(BenchmarkId::new("with_rate", rate), &rate, |b, &rate| {
            b.iter(|| {
                black_box(env.new_context_with(ContextOptions::new().sample_rate(black_box(rate))))
            })
        });
    }

    group.finish();
}
