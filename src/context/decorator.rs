use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Context, ContextKey, KeyId};
use crate::error::WiringError;

/// A step that enriches a [`Context`] while it is being built.
///
/// Independent subsystems contribute decorators instead of registering their
/// data in a central table. A decorator that has nothing to add simply leaves
/// the context alone.
///
/// Decorators that read a key written by another decorator declare it in
/// [`requires`](Decorator::requires); the writer lists it in
/// [`provides`](Decorator::provides). [`DecoratorRegistry::validate`] uses both
/// to reject registrations that would read a key before anything wrote it.
pub trait Decorator: Send + Sync {
    fn decorate(&self, ctx: &mut Context);

    /// Name used in wiring errors and logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn provides(&self) -> Vec<KeyId> {
        Vec::new()
    }

    fn requires(&self) -> Vec<KeyId> {
        Vec::new()
    }
}

impl<F> Decorator for F
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn decorate(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Closure decorator that declares the keys it writes and reads.
///
/// A bare closure is a [`Decorator`] too, but it can't take part in wiring
/// checks. Wrap it with [`decorator_fn`] when a later decorator depends on what
/// it writes:
///
/// ```
/// use tonectx::context::{decorator_fn, ContextKey};
/// use tonectx::Environment;
///
/// struct Tempo;
///
/// impl ContextKey for Tempo {
///     type Value = f32;
/// }
///
/// let env = Environment::default();
/// env.add_decorator(decorator_fn(|ctx| ctx.set_value::<Tempo>(120.0)).providing::<Tempo>());
/// let beat = decorator_fn(|_| {}).named("beat").requiring::<Tempo>();
/// assert!(env.try_add_decorator(beat).is_ok());
/// ```
pub struct FnDecorator<F> {
    f: F,
    name: &'static str,
    provides: Vec<KeyId>,
    requires: Vec<KeyId>,
}

/// Wrap `f` so it can declare keys with [`providing`](FnDecorator::providing)
/// and [`requiring`](FnDecorator::requiring)
pub fn decorator_fn<F>(f: F) -> FnDecorator<F>
where
    F: Fn(&mut Context) + Send + Sync,
{
    FnDecorator {
        f,
        name: std::any::type_name::<F>(),
        provides: Vec::new(),
        requires: Vec::new(),
    }
}

impl<F> FnDecorator<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn providing<K: ContextKey>(mut self) -> Self {
        self.provides.push(KeyId::of::<K>());
        self
    }

    pub fn requiring<K: ContextKey>(mut self) -> Self {
        self.requires.push(KeyId::of::<K>());
        self
    }
}

impl<F> Decorator for FnDecorator<F>
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn decorate(&self, ctx: &mut Context) {
        (self.f)(ctx)
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn provides(&self) -> Vec<KeyId> {
        self.provides.clone()
    }

    fn requires(&self) -> Vec<KeyId> {
        self.requires.clone()
    }
}

/// Ordered, append-only list of decorators run on every new context.
///
/// Registration copies the list and swaps it in, so building a context only
/// clones an `Arc` and never runs decorators while holding the lock. That also
/// lets a decorator register another decorator without deadlocking.
#[derive(Default)]
pub struct DecoratorRegistry {
    decorators: RwLock<Arc<Vec<Arc<dyn Decorator>>>>,
}

impl DecoratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator.
    ///
    /// Sequential calls run in call order. Concurrent callers are all kept, in
    /// whatever order they acquire the lock.
    pub fn add<D>(&self, decorator: D)
    where
        D: Decorator + 'static,
    {
        self.add_shared(Arc::new(decorator));
    }

    pub fn add_shared(&self, decorator: Arc<dyn Decorator>) {
        log::trace!("Registering context decorator `{}`", decorator.name());
        let mut decorators = self.decorators.write();
        let mut next = Vec::with_capacity(decorators.len() + 1);
        next.extend(decorators.iter().cloned());
        next.push(decorator);
        *decorators = Arc::new(next);
    }

    /// Append a decorator only if its requirements are already provided.
    pub fn try_add<D>(&self, decorator: D) -> Result<(), WiringError>
    where
        D: Decorator + 'static,
    {
        let decorator: Arc<dyn Decorator> = Arc::new(decorator);
        let mut decorators = self.decorators.write();
        check(decorators.iter().chain(std::iter::once(&decorator)))?;

        log::trace!("Registering context decorator `{}`", decorator.name());
        let mut next = Vec::with_capacity(decorators.len() + 1);
        next.extend(decorators.iter().cloned());
        next.push(decorator);
        *decorators = Arc::new(next);
        Ok(())
    }

    /// Check that every decorator's required keys are provided by an earlier one
    pub fn validate(&self) -> Result<(), WiringError> {
        check(self.snapshot().iter())
    }

    pub fn len(&self) -> usize {
        self.decorators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<dyn Decorator>>> {
        Arc::clone(&self.decorators.read())
    }

    /// Run every registered decorator over `ctx`, in registration order
    pub fn apply(&self, ctx: &mut Context) {
        for decorator in self.snapshot().iter() {
            decorator.decorate(ctx);
        }
    }
}

fn check<'a>(
    decorators: impl Iterator<Item = &'a Arc<dyn Decorator>>,
) -> Result<(), WiringError> {
    let mut provided = HashSet::new();
    for decorator in decorators {
        if let Some(key) = decorator
            .requires()
            .into_iter()
            .find(|key| !provided.contains(key))
        {
            return Err(WiringError::MissingDependency {
                decorator: decorator.name(),
                key: key.name(),
            });
        }
        provided.extend(decorator.provides());
    }
    Ok(())
}
