use std::any::TypeId;
use std::fmt;

/// Typed slot in a [`Context`](super::Context).
///
/// Each key is its own marker type, so a lookup always yields the value type the
/// key was declared with and two subsystems can't collide by accident.
///
/// ```
/// use tonectx::context::{Context, ContextKey};
///
/// struct MinFrequency;
///
/// impl ContextKey for MinFrequency {
///     type Value = f32;
/// }
///
/// let mut ctx = Context::new(48_000);
/// ctx.set_value::<MinFrequency>(22.22);
/// assert_eq!(ctx.value::<MinFrequency>(), Some(&22.22));
/// ```
pub trait ContextKey: 'static {
    type Value: Send + Sync + 'static;
}

/// Runtime identity of a [`ContextKey`], used when checking decorator wiring
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId {
    id: TypeId,
    name: &'static str,
}

impl KeyId {
    pub fn of<K: ContextKey>() -> Self {
        Self {
            id: TypeId::of::<K>(),
            name: std::any::type_name::<K>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
