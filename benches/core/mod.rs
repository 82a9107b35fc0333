//! Benchmarks for the context and pooling primitives.

mod context;
mod pool;
mod time;

pub use context::bench_context;
pub use pool::bench_pool;
pub use time::bench_time;
