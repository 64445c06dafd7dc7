use std::collections::VecDeque;
use crate::error::MonitorError;
use crate::types::Sample;
/// Rolling, time-ordered window of skin-signal samples.
///
/// Owned by exactly one session and written only by its sampler loop; the
/// filter and estimator stages read it through `&self`.
#[derive(Clone, Debug)]
pub struct SignalBuffer {
    samples: VecDeque<Sample>,
    sample_rate_hz: f64,
    capacity: usize,
}
impl SignalBuffer {
    /// Upper bound on retained samples (about 9.7 h at 30 Hz).
    pub const MAX_CAPACITY: usize = 1 << 20;
    /// Number of samples covering `history_seconds` at `sample_rate_hz`, at least 1.
    pub fn capacity_for(sample_rate_hz: f64, history_seconds: f64) -> usize {
        ((sample_rate_hz * history_seconds).ceil() as usize).max(1)
    }
    pub fn with_history_seconds(
        sample_rate_hz: f64,
        history_seconds: f64,
    ) -> Result<Self, MonitorError> {
        if !(history_seconds.is_finite() && history_seconds > 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "history window must be positive, got {history_seconds} s"
            )));
        }
        Self::with_capacity(sample_rate_hz, Self::capacity_for(sample_rate_hz, history_seconds))
    }
    pub fn with_capacity(sample_rate_hz: f64, capacity: usize) -> Result<Self, MonitorError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(MonitorError::InvalidSampleRate);
        }
        if capacity == 0 || capacity > Self::MAX_CAPACITY {
            return Err(MonitorError::InvalidConfig(format!(
                "buffer capacity {capacity} outside 1..={}",
                Self::MAX_CAPACITY
            )));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            sample_rate_hz,
            capacity,
        })
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }
    /// Append a sample, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, sample: Sample) -> Result<(), MonitorError> {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                return Err(MonitorError::NonMonotonicTimestamp {
                    last_ms: last.timestamp_ms(),
                    next_ms: sample.timestamp_ms(),
                });
            }
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        Ok(())
    }
    pub fn clear(&mut self) {
        self.samples.clear();
    }
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
    pub fn timestamps_ms(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::timestamp_ms).collect()
    }
}
