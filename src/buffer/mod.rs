// Purpose: Reusable one-second tone buffers, pooled per (sample rate, harmonic count)
// Render code grabs a buffer from the context's pool and hands it back when the pass ends

pub mod decorator;

pub use decorator::{buffer_pool, BufferPool, BufferPoolDecorator};

use crate::context::Context;
use crate::pool::KeyedPool;
use crate::tone::{harmonic_count, Tone};

/// Shape shared by every buffer in one sub-pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferKey {
    pub sample_rate: u32,
    pub harmonic_count: usize,
}

impl BufferKey {
    pub fn for_context(ctx: &Context) -> Self {
        Self {
            sample_rate: ctx.sample_rate(),
            harmonic_count: harmonic_count(ctx),
        }
    }
}

/// One second of tones: one slot per sample at the owning pool's sample rate.
///
/// The length is fixed when the buffer is built. Reuse goes through
/// [`BufferPool`]; a buffer taken with `get` belongs to the caller until it is
/// stored again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    tones: Vec<Tone>,
}

impl Buffer {
    /// Buffer shaped for `ctx`: `ctx.sample_rate()` tones, each with the context's harmonic count
    pub fn new(ctx: &Context) -> Self {
        Self::with_shape(BufferKey::for_context(ctx))
    }

    pub fn with_shape(key: BufferKey) -> Self {
        Self {
            tones: (0..key.sample_rate)
                .map(|_| Tone::with_harmonics(key.harmonic_count))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn tones_mut(&mut self) -> &mut [Tone] {
        &mut self.tones
    }

    /// Zero every tone in place
    pub fn reset(&mut self) {
        for tone in &mut self.tones {
            tone.reset();
        }
    }

    /// Whether this buffer has the shape `key` describes
    pub fn fits(&self, key: &BufferKey) -> bool {
        self.tones.len() == key.sample_rate as usize
            && self
                .tones
                .iter()
                .all(|tone| tone.harmonic_gains.len() == key.harmonic_count)
    }
}

/// Pools of buffers keyed by shape
pub type BufferPools = KeyedPool<BufferKey, Buffer>;

/// Empty set of buffer pools; sub-pools appear as contexts ask for new shapes
pub fn buffer_pools() -> BufferPools {
    KeyedPool::new(|key: &BufferKey| Buffer::with_shape(*key), Buffer::reset)
        .with_acceptance(|key, buffer| buffer.fits(key))
}
