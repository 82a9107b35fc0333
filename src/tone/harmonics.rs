use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::context::{Context, ContextKey, Decorator, KeyId};

/// Default number of harmonics above the fundamental tracked for each tone
pub const DEFAULT_HARMONIC_COUNT: usize = 20;

/// Context key holding the number of harmonic gains per tone
pub struct HarmonicCount;

impl ContextKey for HarmonicCount {
    type Value = usize;
}

/// Harmonic count for `ctx`, or 0 if nothing configured one
pub fn harmonic_count(ctx: &Context) -> usize {
    ctx.value::<HarmonicCount>().copied().unwrap_or(0)
}

/// Process-scoped harmonic count applied to every new context.
///
/// Read once per context without taking a lock.
#[derive(Debug)]
pub struct HarmonicsRegistry {
    count: AtomicUsize,
}

impl HarmonicsRegistry {
    pub fn new(count: usize) -> Self {
        let count = if count > 0 {
            count
        } else {
            log::warn!("Ignoring harmonic count of 0, using {DEFAULT_HARMONIC_COUNT}");
            DEFAULT_HARMONIC_COUNT
        };
        Self {
            count: AtomicUsize::new(count),
        }
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Replace the count used by contexts built from now on. Zero is ignored.
    pub fn set(&self, count: usize) {
        if count == 0 {
            log::warn!("Ignoring request to set harmonic count to 0");
            return;
        }
        self.count.store(count, Ordering::Release);
    }
}

impl Default for HarmonicsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HARMONIC_COUNT)
    }
}

/// Writes the registry's current harmonic count into each context
pub struct HarmonicCountDecorator {
    registry: Arc<HarmonicsRegistry>,
}

impl HarmonicCountDecorator {
    pub fn new(registry: Arc<HarmonicsRegistry>) -> Self {
        Self { registry }
    }
}

impl Decorator for HarmonicCountDecorator {
    fn decorate(&self, ctx: &mut Context) {
        ctx.set_value::<HarmonicCount>(self.registry.get());
    }

    fn name(&self) -> &'static str {
        "harmonic-count"
    }

    fn provides(&self) -> Vec<KeyId> {
        vec![KeyId::of::<HarmonicCount>()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ignores_zero() {
        let registry = HarmonicsRegistry::default();
        assert_eq!(registry.get(), 20);
        registry.set(0);
        assert_eq!(registry.get(), 20);
        registry.set(7);
        assert_eq!(registry.get(), 7);
        assert_eq!(HarmonicsRegistry::new(0).get(), 20);
    }

    #[test]
    fn test_registry_shared_across_threads() {
        let registry = HarmonicsRegistry::new(1);
        std::thread::scope(|s| {
            for count in 1..=8 {
                let registry = &registry;
                s.spawn(move || {
                    registry.set(count);
                    assert!((1..=8).contains(&registry.get()));
                });
            }
        });
        assert!((1..=8).contains(&registry.get()));
    }

    #[test]
    fn test_decorator_tracks_registry_changes() {
        let registry = Arc::new(HarmonicsRegistry::new(10));
        let decorator = HarmonicCountDecorator::new(Arc::clone(&registry));

        let mut ctx = Context::new(100);
        assert_eq!(harmonic_count(&ctx), 0);
        decorator.decorate(&mut ctx);
        assert_eq!(harmonic_count(&ctx), 10);

        registry.set(100);
        let mut ctx = Context::new(100);
        decorator.decorate(&mut ctx);
        assert_eq!(harmonic_count(&ctx), 100);
    }
}
