use std::sync::atomic::{AtomicU32, Ordering};

/// Default number of samples output per second (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default sample rate used by contexts that don't ask for one explicitly.
///
/// Reads are lock-free so the render thread can query the rate every pass.
#[derive(Debug)]
pub struct SampleRateRegistry {
    rate: AtomicU32,
}

impl SampleRateRegistry {
    pub fn new(rate: u32) -> Self {
        let rate = if rate > 0 {
            rate
        } else {
            log::warn!("Ignoring sample rate of 0Hz, using {DEFAULT_SAMPLE_RATE}Hz");
            DEFAULT_SAMPLE_RATE
        };
        Self {
            rate: AtomicU32::new(rate),
        }
    }

    #[inline]
    pub fn get(&self) -> u32 {
        match self.rate.load(Ordering::Acquire) {
            0 => DEFAULT_SAMPLE_RATE,
            rate => rate,
        }
    }

    /// Replace the default rate. Zero is ignored.
    pub fn set(&self, rate: u32) {
        if rate == 0 {
            log::warn!("Ignoring request to set sample rate to 0Hz");
            return;
        }
        self.rate.store(rate, Ordering::Release);
    }
}

impl Default for SampleRateRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate() {
        assert_eq!(SampleRateRegistry::default().get(), 44_100);
        assert_eq!(SampleRateRegistry::new(0).get(), 44_100);
    }

    #[test]
    fn test_set_ignores_zero() {
        let registry = SampleRateRegistry::default();
        registry.set(48_000);
        assert_eq!(registry.get(), 48_000);
        registry.set(0);
        assert_eq!(registry.get(), 48_000);
    }

    #[test]
    fn test_concurrent_sets_land_on_a_written_value() {
        let registry = SampleRateRegistry::default();
        std::thread::scope(|s| {
            for rate in 1..=64 {
                let registry = &registry;
                s.spawn(move || registry.set(rate * 1_000));
            }
        });
        let rate = registry.get();
        assert!(rate % 1_000 == 0 && (1_000..=64_000).contains(&rate));
    }
}
