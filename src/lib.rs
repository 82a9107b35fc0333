pub mod buffer; // Pooled per-pass tone buffers
pub mod config;
pub mod context; // Timing, typed values and the decorator pipeline
pub mod environment;
pub mod error;
pub mod pool; // Keyed object pools
pub mod tone;

pub use buffer::{Buffer, BufferPool};
pub use config::Config;
pub use context::{decorator_fn, Context, ContextOptions, Decorator, Time};
pub use environment::Environment;
pub use error::{TimeError, WiringError};

/// Default sample rate of the shared environment
pub fn sample_rate() -> u32 {
    environment::global().sample_rate()
}

/// Change the shared default sample rate. Zero is ignored.
pub fn set_sample_rate(rate: u32) {
    environment::global().set_sample_rate(rate);
}

/// Context from the shared environment, at the epoch of the default sample rate
pub fn new_context() -> Context {
    environment::global().new_context()
}

/// Context from the shared environment, built from `options`
pub fn new_context_with(options: ContextOptions) -> Context {
    environment::global().new_context_with(options)
}

/// Register a decorator with the shared environment
pub fn add_decorator<D>(decorator: D)
where
    D: Decorator + 'static,
{
    environment::global().add_decorator(decorator);
}

/// Buffer pool attached to `ctx`, if it was built by an environment
pub fn buffer_pool(ctx: &Context) -> Option<BufferPool> {
    buffer::buffer_pool(ctx)
}
