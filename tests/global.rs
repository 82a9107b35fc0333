//! Exercises the crate-level functions backed by the shared environment.
//!
//! Kept to a single test so nothing else in this binary races on the shared
//! sample rate.

use tonectx::context::ContextKey;
use tonectx::tone::harmonic_count;
use tonectx::{buffer_pool, Context, ContextOptions, Time};

struct MinFrequency;

impl ContextKey for MinFrequency {
    type Value = f32;
}

#[test]
fn shared_environment_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(tonectx::sample_rate(), 44_100);
    let ctx = tonectx::new_context();
    assert_eq!(ctx.time().to_string(), "0 seconds, sample 1/44100");
    assert_eq!(ctx.nyquist_frequency(), 22_050.0);
    assert_eq!(harmonic_count(&ctx), 20);

    tonectx::set_sample_rate(0);
    assert_eq!(tonectx::sample_rate(), 44_100);
    tonectx::set_sample_rate(48_000);
    assert_eq!(tonectx::sample_rate(), 48_000);

    tonectx::add_decorator(|ctx: &mut Context| ctx.set_value::<MinFrequency>(22.22));

    let ctx = tonectx::new_context();
    assert_eq!(ctx.sample_rate(), 48_000);
    assert_eq!(ctx.value::<MinFrequency>(), Some(&22.22));

    let pool = buffer_pool(&ctx).expect("standard wiring attaches a pool");
    let mut buffer = pool.get();
    assert_eq!(buffer.len(), 48_000);
    buffer.tones_mut()[0].frequency = 440.0;
    buffer.tones_mut()[47_999].gain = 1.0;
    pool.store(buffer);
    assert_eq!(pool.count(), 1);

    let again = buffer_pool(&tonectx::new_context()).unwrap();
    assert!(again.same_pool(&pool));
    let buffer = again.get();
    assert_eq!(buffer.len(), 48_000);
    assert!(buffer.tones().iter().all(|tone| tone.is_silent()));

    let ctx = tonectx::new_context_with(
        ContextOptions::new()
            .time(Time::epoch(35_000).shift_by(400))
            .sample_rate(35_000),
    );
    assert_eq!(ctx.time().to_string(), "0 seconds, sample 401/35000");
    assert_eq!(buffer_pool(&ctx).unwrap().get().len(), 35_000);
}
