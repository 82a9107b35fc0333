use std::fmt;
use std::sync::Arc;

use super::{Buffer, BufferKey, BufferPools};
use crate::context::{Context, ContextKey, Decorator, KeyId};
use crate::pool::SubPool;
use crate::tone::HarmonicCount;

/// Handle to the buffer sub-pool matching one context's shape.
///
/// Cloning the handle is cheap; every clone refers to the same idle list.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<SubPool<Buffer>>,
}

impl BufferPool {
    /// A zeroed buffer, reused if one is idle
    pub fn get(&self) -> Buffer {
        self.inner.get()
    }

    /// Hand `buffer` back for reuse. Don't touch it afterwards.
    pub fn store(&self, buffer: Buffer) {
        self.inner.store(buffer);
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Whether both handles refer to the same sub-pool
    pub fn same_pool(&self, other: &BufferPool) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BufferPool").field(&self.inner).finish()
    }
}

struct PoolSlot;

impl ContextKey for PoolSlot {
    type Value = Arc<BufferPools>;
}

/// Buffer pool for `ctx`'s current shape, or `None` if the context was built
/// without one.
///
/// The sub-pool is picked from the sample rate and harmonic count the context
/// holds at the time of the call, so later changes to either are honoured.
pub fn buffer_pool(ctx: &Context) -> Option<BufferPool> {
    let pools = ctx.value::<PoolSlot>()?;
    Some(BufferPool {
        inner: pools.sub_pool(&BufferKey::for_context(ctx)),
    })
}

/// Gives each context access to the environment's buffer pools.
///
/// The pool's shape comes from the harmonic count, so this must be registered
/// after whatever decorator provides [`HarmonicCount`].
pub struct BufferPoolDecorator {
    pools: Arc<BufferPools>,
}

impl BufferPoolDecorator {
    pub fn new(pools: Arc<BufferPools>) -> Self {
        Self { pools }
    }
}

impl Decorator for BufferPoolDecorator {
    fn decorate(&self, ctx: &mut Context) {
        ctx.set_value::<PoolSlot>(Arc::clone(&self.pools));
    }

    fn name(&self) -> &'static str {
        "buffer-pool"
    }

    fn provides(&self) -> Vec<KeyId> {
        vec![KeyId::of::<PoolSlot>()]
    }

    fn requires(&self) -> Vec<KeyId> {
        vec![KeyId::of::<HarmonicCount>()]
    }
}
