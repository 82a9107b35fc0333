use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonectx::Time;

use crate::SAMPLE_RATES;

pub fn bench_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("core/time");

    for &rate in SAMPLE_RATES {
        let start = Time::epoch(rate).shift_by(i64::from(rate) * 60);

        group.bench_with_input(BenchmarkId::new("increment", rate), &rate, |b, _| {
            b.iter(|| black_box(start).increment())
        });

        // Several seconds backwards in one step
        group.bench_with_input(BenchmarkId::new("shift_back", rate), &rate, |b, _| {
            b.iter(|| black_box(start).shift_by(black_box(-i64::from(rate) * 7 - 13)))
        });

        let later = start.shift_by(12_345);
        group.bench_with_input(BenchmarkId::new("duration", rate), &rate, |b, _| {
            b.iter(|| black_box(start).duration(black_box(&later)))
        });
    }

    group.finish();
}
