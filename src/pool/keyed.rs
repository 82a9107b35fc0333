use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use super::sub_pool::{Accept, Reset, SubPool};

type KeyedFactory<K, V> = Arc<dyn Fn(&K) -> V + Send + Sync>;
type KeyedAccept<K, V> = Arc<dyn Fn(&K, &V) -> bool + Send + Sync>;

/// Object pool partitioned by a configuration key.
///
/// Each distinct key gets its own [`SubPool`], created on first use and kept for
/// the life of the pool. Values never cross keys: a value built for one key is
/// only ever handed back out for that key.
///
/// The key map sits behind one lock, taken for reading on the hot path and for
/// writing only when a new key shows up. Every sub-pool guards its own idle
/// list, so work on different keys that already exist never contends.
pub struct KeyedPool<K, V> {
    sub_pools: RwLock<HashMap<K, Arc<SubPool<V>>>>,
    factory: KeyedFactory<K, V>,
    reset: Reset<V>,
    accept: KeyedAccept<K, V>,
}

impl<K, V> KeyedPool<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    V: 'static,
{
    /// `factory` builds a fresh value for a key; `reset` runs on every stored value
    pub fn new<F, R>(factory: F, reset: R) -> Self
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
        R: Fn(&mut V) + Send + Sync + 'static,
    {
        Self {
            sub_pools: RwLock::new(HashMap::new()),
            factory: Arc::new(factory),
            reset: Arc::new(reset),
            accept: Arc::new(|_: &K, _: &V| true),
        }
    }

    /// Only pool stored values for which `accept(key, value)` holds; others are dropped
    pub fn with_acceptance<A>(mut self, accept: A) -> Self
    where
        A: Fn(&K, &V) -> bool + Send + Sync + 'static,
    {
        self.accept = Arc::new(accept);
        self
    }

    /// Sub-pool for `key`, created if this is the key's first use.
    ///
    /// Concurrent first uses of the same key all receive the same sub-pool.
    pub fn sub_pool(&self, key: &K) -> Arc<SubPool<V>> {
        if let Some(sub_pool) = self.sub_pools.read().get(key) {
            return Arc::clone(sub_pool);
        }

        let mut sub_pools = self.sub_pools.write();
        // Another thread may have created it between the two locks
        if let Some(sub_pool) = sub_pools.get(key) {
            return Arc::clone(sub_pool);
        }

        log::debug!("Creating sub-pool for {key:?}");
        let sub_pool = Arc::new(self.build_sub_pool(key));
        sub_pools.insert(key.clone(), Arc::clone(&sub_pool));
        sub_pool
    }

    fn build_sub_pool(&self, key: &K) -> SubPool<V> {
        let factory = {
            let factory = Arc::clone(&self.factory);
            let key = key.clone();
            Arc::new(move || factory(&key))
        };
        let accept: Accept<V> = {
            let accept = Arc::clone(&self.accept);
            let key = key.clone();
            Arc::new(move |value: &V| accept(&key, value))
        };
        SubPool::from_parts(factory, Arc::clone(&self.reset), accept)
    }

    pub fn get(&self, key: &K) -> V {
        self.sub_pool(key).get()
    }

    pub fn store(&self, key: &K, value: V) {
        self.sub_pool(key).store(value);
    }

    /// Idle values for `key`; zero for a key that was never used
    pub fn count(&self, key: &K) -> usize {
        self.sub_pools
            .read()
            .get(key)
            .map_or(0, |sub_pool| sub_pool.count())
    }

    /// Number of keys with a sub-pool
    pub fn len(&self) -> usize {
        self.sub_pools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<K> {
        self.sub_pools.read().keys().cloned().collect()
    }
}

impl<K: fmt::Debug, V> fmt::Debug for KeyedPool<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.sub_pools.read().iter())
            .finish()
    }
}
