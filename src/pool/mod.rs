// Purpose: Concurrency-safe object reuse, partitioned by configuration key
// Sub-pools are created lazily and live as long as their parent pool

pub mod keyed;
pub mod sub_pool;

pub use keyed::KeyedPool;
pub use sub_pool::SubPool;
