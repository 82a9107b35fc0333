#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::DEFAULT_SAMPLE_RATE;
use crate::tone::DEFAULT_HARMONIC_COUNT;

/// Startup defaults for an [`Environment`](crate::Environment)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Samples per second (Hz) for contexts that don't set their own
    pub sample_rate: u32,
    /// Harmonic gains tracked per tone
    pub harmonic_count: usize,
}

impl Config {
    /// Copy of this config with zero fields replaced by their defaults
    pub fn validated(self) -> Self {
        let mut config = self;
        if config.sample_rate == 0 {
            log::warn!("Config sample rate of 0Hz replaced with {DEFAULT_SAMPLE_RATE}Hz");
            config.sample_rate = DEFAULT_SAMPLE_RATE;
        }
        if config.harmonic_count == 0 {
            log::warn!("Config harmonic count of 0 replaced with {DEFAULT_HARMONIC_COUNT}");
            config.harmonic_count = DEFAULT_HARMONIC_COUNT;
        }
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            harmonic_count: DEFAULT_HARMONIC_COUNT,
        }
    }
}
