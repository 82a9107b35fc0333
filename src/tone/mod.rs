// Purpose: Tone records and the harmonic-count setting threaded through each context
// Tone math (frequencies, waveforms) lives with the generator; this is only the data shape

pub mod harmonics;

pub use harmonics::{
    harmonic_count, HarmonicCount, HarmonicCountDecorator, HarmonicsRegistry, DEFAULT_HARMONIC_COUNT,
};

use crate::context::Context;

/// One tone: a fundamental frequency plus gains for the harmonics above it.
///
/// `gain` scales the whole tone's amplitude (2.0 doubles it, 0.5 halves it).
/// `harmonic_gains[i]` is the amplitude of harmonic `i + 1` relative to the
/// fundamental.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub gain: f32,
    pub harmonic_gains: Vec<f32>,
}

impl Tone {
    /// Silent tone with one gain slot per harmonic configured for `ctx`
    pub fn new(ctx: &Context) -> Self {
        Self::with_harmonics(harmonic_count(ctx))
    }

    pub fn with_harmonics(count: usize) -> Self {
        Self {
            frequency: 0.0,
            gain: 0.0,
            harmonic_gains: vec![0.0; count],
        }
    }

    /// Zero every field without touching the harmonic storage's allocation
    #[inline]
    pub fn reset(&mut self) {
        self.frequency = 0.0;
        self.gain = 0.0;
        self.harmonic_gains.fill(0.0);
    }

    pub fn is_silent(&self) -> bool {
        self.frequency == 0.0 && self.gain == 0.0 && self.harmonic_gains.iter().all(|&g| g == 0.0)
    }
}
