// Purpose: Per-pass execution context, timing, and the decorator pipeline that builds it
// Everything a generation pass needs to know about "now" and "how" lives here

pub mod decorator;
pub mod key;
pub mod sample_rate;
pub mod time;

pub use decorator::{decorator_fn, Decorator, DecoratorRegistry, FnDecorator};
pub use key::{ContextKey, KeyId};
pub use sample_rate::{SampleRateRegistry, DEFAULT_SAMPLE_RATE};
pub use time::Time;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Execution context for one generation pass.
///
/// Carries the pass's timestamp, its sample rate, and whatever typed values the
/// registered decorators attached. Build one through
/// [`Environment::new_context`](crate::Environment::new_context) (or the crate
/// level [`new_context`](crate::new_context)) so the decorators run.
///
/// A `Default` context is the degenerate case: zero time, zero sample rate and no
/// values. Every accessor on it returns that zero state; none of them panic.
#[derive(Clone, Default)]
pub struct Context {
    time: Time,
    sample_rate: u32,
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Undecorated context at the epoch of `sample_rate`.
    ///
    /// # Panics
    /// Panics if `sample_rate == 0`
    pub fn new(sample_rate: u32) -> Self {
        Self {
            time: Time::epoch(sample_rate),
            sample_rate,
            values: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(time: Time, sample_rate: u32) -> Self {
        Self {
            time,
            sample_rate,
            values: HashMap::new(),
        }
    }

    #[inline]
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Change the pass's sample rate. Zero is ignored.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate == 0 {
            log::warn!("Ignoring context sample rate of 0Hz");
            return;
        }
        self.sample_rate = sample_rate;
    }

    /// Highest frequency representable at this sample rate
    #[inline]
    pub fn nyquist_frequency(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Value bound to `K`, or `None` if nothing set it
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        self.values
            .get(&TypeId::of::<K>())
            .and_then(|value| value.downcast_ref::<K::Value>())
    }

    /// Bind `value` to `K`, replacing any earlier binding
    pub fn set_value<K: ContextKey>(&mut self, value: K::Value) {
        self.values.insert(TypeId::of::<K>(), Arc::new(value));
    }

    pub fn contains<K: ContextKey>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<K>())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("time", &self.time)
            .field("sample_rate", &self.sample_rate)
            .field("values", &self.values.len())
            .finish()
    }
}

/// Explicit settings for a single context build.
///
/// Anything left unset falls back to the environment: the default sample rate,
/// and the epoch at that rate.
#[derive(Clone, Default)]
pub struct ContextOptions {
    pub time: Option<Time>,
    pub sample_rate: Option<u32>,
    /// Run after the registered decorators, in this order
    pub decorators: Vec<Arc<dyn Decorator>>,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, time: Time) -> Self {
        self.time = Some(time);
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn decorator<D>(mut self, decorator: D) -> Self
    where
        D: Decorator + 'static,
    {
        self.decorators.push(Arc::new(decorator));
        self
    }
}

impl fmt::Debug for ContextOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextOptions")
            .field("time", &self.time)
            .field("sample_rate", &self.sample_rate)
            .field("decorators", &self.decorators.len())
            .finish()
    }
}

/// Build a context from `options`, running `registry` and then the call's own decorators
pub(crate) fn assemble(
    options: ContextOptions,
    default_rate: u32,
    registry: &DecoratorRegistry,
) -> Context {
    let explicit_rate = options.sample_rate.filter(|&rate| rate > 0);
    let sample_rate = explicit_rate
        .or_else(|| options.time.map(|time| time.sample_rate()).filter(|&rate| rate > 0))
        .unwrap_or(default_rate);

    let time = match options.time {
        Some(time) => {
            if time.sample_rate() != sample_rate {
                log::warn!(
                    "Context time {time} does not match context sample rate {sample_rate}Hz"
                );
            }
            time
        }
        None => Time::epoch(sample_rate),
    };

    let mut ctx = Context::from_parts(time, sample_rate);
    registry.apply(&mut ctx);
    for decorator in &options.decorators {
        decorator.decorate(&mut ctx);
    }
    ctx
}
