use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

pub(crate) type Factory<V> = Arc<dyn Fn() -> V + Send + Sync>;
pub(crate) type Reset<V> = Arc<dyn Fn(&mut V) + Send + Sync>;
pub(crate) type Accept<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Idle values for one pool key.
///
/// `get` hands out the most recently stored value (warm in cache) or makes a new
/// one; `store` resets a value and keeps it for the next `get`. The pool never
/// tracks values on loan: a value that is never stored again is simply dropped.
///
/// Storing the same value twice, or touching a value after storing it, is a
/// caller error that goes unchecked.
pub struct SubPool<V> {
    idle: Mutex<Vec<V>>,
    factory: Factory<V>,
    reset: Reset<V>,
    accept: Accept<V>,
}

impl<V: 'static> SubPool<V> {
    pub fn new<F, R>(factory: F, reset: R) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        R: Fn(&mut V) + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(factory), Arc::new(reset), Arc::new(|_: &V| true))
    }
}

impl<V> SubPool<V> {
    pub(crate) fn from_parts(factory: Factory<V>, reset: Reset<V>, accept: Accept<V>) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            factory,
            reset,
            accept,
        }
    }

    /// Take an idle value, or build a fresh one if none are idle.
    ///
    /// The factory runs outside the lock, and a panic in it reaches the caller.
    pub fn get(&self) -> V {
        let reused = self.idle.lock().pop();
        match reused {
            Some(value) => value,
            None => (self.factory)(),
        }
    }

    /// Reset `value` and keep it for a later [`get`](SubPool::get).
    ///
    /// Values this pool doesn't accept (wrong shape for its key) are dropped.
    pub fn store(&self, mut value: V) {
        if !(self.accept)(&value) {
            log::debug!("Dropping value that does not fit its pool");
            return;
        }
        (self.reset)(&mut value);
        self.idle.lock().push(value);
    }

    /// Number of idle values waiting to be reused
    pub fn count(&self) -> usize {
        self.idle.lock().len()
    }
}

impl<V> fmt::Debug for SubPool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubPool")
            .field("idle", &self.count())
            .finish()
    }
}
