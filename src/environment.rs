//! Process-scoped state behind context construction.
//!
//! An [`Environment`] owns the default sample rate, the harmonic count, the
//! decorator list and the buffer pools. The standard wiring registers the
//! harmonic-count decorator before the buffer-pool decorator, which reads it;
//! [`EnvironmentBuilder::build`] checks that ordering for any extra decorators.
//!
//! Most programs use the shared instance from [`global`], optionally replaced at
//! startup with [`install`]. The shared instance lives until the process exits;
//! environments created with [`Environment::new`] are torn down on drop.

use std::sync::{Arc, OnceLock};

use crate::buffer::{buffer_pools, BufferPoolDecorator, BufferPools};
use crate::config::Config;
use crate::context::{self, Context, ContextOptions, Decorator, DecoratorRegistry, SampleRateRegistry};
use crate::error::WiringError;
use crate::tone::{HarmonicCountDecorator, HarmonicsRegistry};

static GLOBAL: OnceLock<Environment> = OnceLock::new();

/// Shared environment, created with default settings on first use
pub fn global() -> &'static Environment {
    GLOBAL.get_or_init(Environment::default)
}

/// Make `env` the shared environment.
///
/// Must run before anything calls [`global`]; afterwards the environment is
/// handed back unchanged.
pub fn install(env: Environment) -> Result<(), Environment> {
    GLOBAL.set(env)
}

pub struct Environment {
    sample_rate: SampleRateRegistry,
    harmonics: Arc<HarmonicsRegistry>,
    decorators: DecoratorRegistry,
    buffer_pools: Arc<BufferPools>,
}

impl Environment {
    /// Environment with the standard decorators registered
    pub fn new(config: Config) -> Self {
        let env = Self::bare(config);
        env.register_standard();
        debug_assert!(env.decorators.validate().is_ok());
        env
    }

    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    fn bare(config: Config) -> Self {
        let config = config.validated();
        Self {
            sample_rate: SampleRateRegistry::new(config.sample_rate),
            harmonics: Arc::new(HarmonicsRegistry::new(config.harmonic_count)),
            decorators: DecoratorRegistry::new(),
            buffer_pools: Arc::new(buffer_pools()),
        }
    }

    fn register_standard(&self) {
        self.decorators
            .add(HarmonicCountDecorator::new(Arc::clone(&self.harmonics)));
        self.decorators
            .add(BufferPoolDecorator::new(Arc::clone(&self.buffer_pools)));
    }

    /// Default sample rate for new contexts
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.get()
    }

    /// Change the default sample rate. Zero is ignored.
    pub fn set_sample_rate(&self, rate: u32) {
        self.sample_rate.set(rate);
    }

    pub fn harmonic_count(&self) -> usize {
        self.harmonics.get()
    }

    /// Change the harmonic count for new contexts. Zero is ignored.
    pub fn set_harmonic_count(&self, count: usize) {
        self.harmonics.set(count);
    }

    /// Register a decorator for every context built from now on.
    ///
    /// Meant to be called while subsystems initialise, before contexts are built.
    pub fn add_decorator<D>(&self, decorator: D)
    where
        D: Decorator + 'static,
    {
        self.decorators.add(decorator);
    }

    /// Register a decorator only if the keys it requires are already provided
    pub fn try_add_decorator<D>(&self, decorator: D) -> Result<(), WiringError>
    where
        D: Decorator + 'static,
    {
        self.decorators.try_add(decorator)
    }

    pub fn decorators(&self) -> &DecoratorRegistry {
        &self.decorators
    }

    pub fn buffer_pools(&self) -> &BufferPools {
        &self.buffer_pools
    }

    /// Context at the epoch of the default sample rate, run through every decorator
    pub fn new_context(&self) -> Context {
        self.new_context_with(ContextOptions::default())
    }

    /// Context built from `options`: registered decorators run first, then the
    /// call's own decorators in the order given
    pub fn new_context_with(&self, options: ContextOptions) -> Context {
        context::assemble(options, self.sample_rate(), &self.decorators)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Builder for an [`Environment`] with extra decorators checked at build time
#[derive(Default)]
pub struct EnvironmentBuilder {
    config: Config,
    decorators: Vec<Arc<dyn Decorator>>,
}

impl EnvironmentBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.config.sample_rate = rate;
        self
    }

    pub fn harmonic_count(mut self, count: usize) -> Self {
        self.config.harmonic_count = count;
        self
    }

    /// Extra decorator, run after the standard ones in the order added
    pub fn decorator<D>(mut self, decorator: D) -> Self
    where
        D: Decorator + 'static,
    {
        self.decorators.push(Arc::new(decorator));
        self
    }

    /// Wire everything up, failing if a decorator reads a key nothing before it writes
    pub fn build(self) -> Result<Environment, WiringError> {
        let env = Environment::bare(self.config);
        env.register_standard();
        for decorator in self.decorators {
            env.decorators.add_shared(decorator);
        }
        env.decorators.validate()?;
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::buffer_pool;
    use crate::context::{decorator_fn, ContextKey, KeyId, Time};
    use crate::tone::{harmonic_count, HarmonicCount};

    struct Tempo;

    impl ContextKey for Tempo {
        type Value = f32;
    }

    struct NeedsTempo;

    impl Decorator for NeedsTempo {
        fn decorate(&self, _ctx: &mut Context) {}

        fn name(&self) -> &'static str {
            "needs-tempo"
        }

        fn requires(&self) -> Vec<KeyId> {
            vec![KeyId::of::<Tempo>()]
        }
    }

    #[test]
    fn test_standard_context() {
        let env = Environment::default();
        let ctx = env.new_context();
        assert_eq!(ctx.time(), Time::epoch(44_100));
        assert_eq!(ctx.sample_rate(), 44_100);
        assert_eq!(harmonic_count(&ctx), 20);
        assert!(buffer_pool(&ctx).is_some());
        assert_eq!(env.decorators().len(), 2);
    }

    #[test]
    fn test_settings_flow_into_contexts() {
        let env = Environment::new(Config {
            sample_rate: 1_000,
            harmonic_count: 4,
        });
        env.set_sample_rate(0);
        assert_eq!(env.sample_rate(), 1_000);

        env.set_harmonic_count(8);
        let ctx = env.new_context();
        assert_eq!(ctx.sample_rate(), 1_000);
        assert_eq!(harmonic_count(&ctx), 8);

        let buffer = buffer_pool(&ctx).unwrap().get();
        assert_eq!(buffer.len(), 1_000);
        assert_eq!(buffer.tones()[0].harmonic_gains.len(), 8);
    }

    #[test]
    fn test_call_decorators_can_reshape_the_pool() {
        let env = Environment::default();
        let ctx = env.new_context_with(
            ContextOptions::new()
                .decorator(|ctx: &mut Context| ctx.set_sample_rate(96_000))
                .decorator(|ctx: &mut Context| ctx.set_value::<HarmonicCount>(3)),
        );
        assert_eq!(ctx.sample_rate(), 96_000);

        let pool = buffer_pool(&ctx).unwrap();
        let buffer = pool.get();
        assert_eq!(buffer.len(), 96_000);
        assert_eq!(buffer.tones()[0].harmonic_gains.len(), 3);
        pool.store(buffer);
        assert_eq!(buffer_pool(&env.new_context()).unwrap().count(), 0);
        assert_eq!(buffer_pool(&ctx).unwrap().count(), 1);
    }

    #[test]
    fn test_builder_rejects_unsatisfied_decorator() {
        let err = Environment::builder().decorator(NeedsTempo).build().err();
        assert_eq!(
            err,
            Some(WiringError::MissingDependency {
                decorator: "needs-tempo",
                key: std::any::type_name::<Tempo>(),
            })
        );
    }

    #[test]
    fn test_builder_accepts_satisfied_decorator() {
        let env = Environment::builder()
            .sample_rate(2_000)
            .decorator(decorator_fn(|ctx| ctx.set_value::<Tempo>(120.0)).providing::<Tempo>())
            .decorator(NeedsTempo)
            .build()
            .unwrap();
        let ctx = env.new_context();
        assert_eq!(ctx.sample_rate(), 2_000);
        assert_eq!(ctx.value::<Tempo>(), Some(&120.0));
    }

    #[test]
    fn test_try_add_decorator_checks_wiring() {
        let env = Environment::default();
        assert!(env.try_add_decorator(NeedsTempo).is_err());
        env.add_decorator(|ctx: &mut Context| ctx.set_value::<Tempo>(90.0));
        assert!(env.try_add_decorator(NeedsTempo).is_err());

        env.add_decorator(decorator_fn(|ctx| ctx.set_value::<Tempo>(90.0)).providing::<Tempo>());
        assert!(env.try_add_decorator(NeedsTempo).is_ok());
        assert_eq!(env.decorators().len(), 5);
        assert_eq!(env.new_context().value::<Tempo>(), Some(&90.0));
    }
}
