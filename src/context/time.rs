#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;

use crate::error::TimeError;

/// Timestamp of a single sample of audio, relative to a fixed sample rate.
///
/// `second` counts the complete seconds already elapsed and `sample` is the
/// 1-based sample inside the current second, so the 14th sample of the 4th
/// second is `(3, 14)`. The lowest value for any rate is the epoch `(0, 1)`.
///
/// Times are immutable: every operation hands back a new value.
///
/// Ordering is only defined between times that share a sample rate. Comparing
/// times with different rates yields `None` from [`PartialOrd::partial_cmp`],
/// which makes `<`, `>`, [`Time::before`] and [`Time::after`] all return `false`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Time {
    second: u64,
    sample: u32,
    sample_rate: u32,
}

impl Time {
    /// Epoch for the given sample rate.
    ///
    /// # Panics
    /// Panics if `sample_rate == 0`
    pub fn epoch(sample_rate: u32) -> Self {
        assert!(sample_rate > 0, "invalid time: sample rate must be positive");
        Self {
            second: 0,
            sample: 1,
            sample_rate,
        }
    }

    /// Epoch for the given sample rate, or an error if the rate is zero
    pub fn try_epoch(sample_rate: u32) -> Result<Self, TimeError> {
        Self::try_new(0, 1, sample_rate)
    }

    /// Timestamp from explicit fields.
    ///
    /// # Panics
    /// Panics if the fields break `1 <= sample <= sample_rate`
    pub fn new(second: u64, sample: u32, sample_rate: u32) -> Self {
        match Self::try_new(second, sample, sample_rate) {
            Ok(time) => time,
            Err(err) => panic!("invalid time: {err}"),
        }
    }

    pub fn try_new(second: u64, sample: u32, sample_rate: u32) -> Result<Self, TimeError> {
        if sample_rate == 0 {
            return Err(TimeError::InvalidSampleRate(sample_rate));
        }
        if sample == 0 || sample > sample_rate {
            return Err(TimeError::InvalidSample {
                sample,
                sample_rate,
            });
        }
        Ok(Self {
            second,
            sample,
            sample_rate,
        })
    }

    /// Complete seconds elapsed so far
    #[inline]
    pub fn second(&self) -> u64 {
        self.second
    }

    /// 1-based sample within the current second
    #[inline]
    pub fn sample(&self) -> u32 {
        self.sample
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether the fields satisfy `1 <= sample <= sample_rate`.
    ///
    /// Only a zero (`Default`) or deserialized value can be invalid.
    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0 && self.sample >= 1 && self.sample <= self.sample_rate
    }

    /// Move the timestamp forward (positive `n`) or backward (negative `n`) by `n` samples.
    ///
    /// Results below the epoch clamp to the epoch. Results past the last sample of
    /// `u64::MAX` seconds saturate there. A time with no sample rate has nothing to
    /// shift against and is returned unchanged.
    pub fn shift_by(&self, n: i64) -> Self {
        if self.sample_rate == 0 {
            return *self;
        }

        let rate = i128::from(self.sample_rate);
        // Zero-based sample index since the epoch
        let position = i128::from(self.second) * rate + i128::from(self.sample) - 1 + i128::from(n);
        if position <= 0 {
            return Self {
                second: 0,
                sample: 1,
                sample_rate: self.sample_rate,
            };
        }

        let second = position / rate;
        if second > i128::from(u64::MAX) {
            return Self {
                second: u64::MAX,
                sample: self.sample_rate,
                sample_rate: self.sample_rate,
            };
        }

        Self {
            second: second as u64,
            sample: (position % rate) as u32 + 1,
            sample_rate: self.sample_rate,
        }
    }

    /// One sample later
    #[inline]
    pub fn increment(&self) -> Self {
        self.shift_by(1)
    }

    /// One sample earlier, never below the epoch
    #[inline]
    pub fn decrement(&self) -> Self {
        self.shift_by(-1)
    }

    /// Absolute distance between two timestamps, rounded to the nearest microsecond.
    ///
    /// Times with different sample rates have no meaningful distance and yield zero.
    pub fn duration(&self, other: &Time) -> std::time::Duration {
        if self.sample_rate != other.sample_rate || self.sample_rate == 0 {
            return std::time::Duration::ZERO;
        }

        let rate = i128::from(self.sample_rate);
        let lhs = i128::from(self.second) * rate + i128::from(self.sample);
        let rhs = i128::from(other.second) * rate + i128::from(other.sample);
        let samples = (lhs - rhs).unsigned_abs();

        let rate = rate as u128;
        let micros = (samples * 1_000_000 + rate / 2) / rate;
        std::time::Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    /// Strictly earlier than `other`; `false` when the sample rates differ
    #[inline]
    pub fn before(&self, other: &Time) -> bool {
        self < other
    }

    /// Strictly later than `other`; `false` when the sample rates differ
    #[inline]
    pub fn after(&self, other: &Time) -> bool {
        self > other
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.sample_rate != other.sample_rate {
            return None;
        }
        Some(
            self.second
                .cmp(&other.second)
                .then(self.sample.cmp(&other.sample)),
        )
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            f.write_str("invalid time: ")?;
        }
        let unit = if self.second == 1 { "second" } else { "seconds" };
        write!(
            f,
            "{} {}, sample {}/{}",
            self.second, unit, self.sample, self.sample_rate
        )
    }
}
