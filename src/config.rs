//! Session configuration.
//!
//! Loaded once when a monitoring session is created and shared read-only
//! (`Arc<MonitorConfig>`) for the rest of the session. Keys are camelCase so
//! the JSON matches the configuration surface used by the web front end:
//!
//! ```json
//! { "samplingRate": 30, "historyWindowSeconds": 10, "smoothingWindowSamples": 5,
//!   "thresholds": { "heartRate": { "min": 40, "max": 200, "normal": { "min": 60, "max": 100 } } } }
//! ```
use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::dsp::SignalBuffer;
use crate::error::MonitorError;
/// Inclusive numeric range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}
impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
/// Hard output bounds for one vital plus its optional normal band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalThreshold {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<Range>,
}
impl VitalThreshold {
    pub const fn new(min: f64, max: f64, normal: Option<Range>) -> Self {
        Self { min, max, normal }
    }
    /// Clamp a computed estimate into `[min, max]`.
    ///
    /// `0.0` is the insufficient-data sentinel and passes through untouched.
    pub fn clamp(&self, estimate: f64) -> f64 {
        if estimate == 0.0 || !estimate.is_finite() {
            return 0.0;
        }
        estimate.clamp(self.min, self.max)
    }
    fn validate(&self, name: &str) -> Result<(), MonitorError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(MonitorError::InvalidConfig(format!(
                "{name}: min {} must not exceed max {}",
                self.min, self.max
            )));
        }
        if let Some(normal) = self.normal {
            if normal.min > normal.max {
                return Err(MonitorError::InvalidConfig(format!(
                    "{name}: normal range is inverted"
                )));
            }
        }
        Ok(())
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    pub heart_rate: VitalThreshold,
    pub respiratory_rate: VitalThreshold,
    pub stress_level: VitalThreshold,
}
impl Default for Thresholds {
    fn default() -> Self {
        Self {
            heart_rate: VitalThreshold::new(40.0, 200.0, Some(Range::new(60.0, 100.0))),
            respiratory_rate: VitalThreshold::new(8.0, 30.0, Some(Range::new(12.0, 20.0))),
            stress_level: VitalThreshold::new(0.0, 100.0, None),
        }
    }
}
/// Which estimator supplies the heart rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum HeartRateMethod {
    /// Mean inter-peak interval of the bandpassed signal.
    #[default]
    PeakInterval,
    /// Dominant in-band frequency of the Hann-windowed spectrum.
    Spectral,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorConfig {
    /// Ticks per second; also the nominal rate of the buffered signal.
    pub sampling_rate: f64,
    pub history_window_seconds: f64,
    /// Number of snapshots averaged for the displayed (smoothed) value.
    pub smoothing_window_samples: usize,
    pub thresholds: Thresholds,
    /// Reference RMSSD (ms) that maps to zero stress.
    pub max_rmssd: f64,
    pub heart_band_hz: Range,
    pub detrend_window_seconds: f64,
    pub display_history_length: usize,
    pub heart_rate_method: HeartRateMethod,
    pub spectral_min_prominence: f64,
}
impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 30.0,
            history_window_seconds: 10.0,
            smoothing_window_samples: 5,
            thresholds: Thresholds::default(),
            max_rmssd: 100.0,
            heart_band_hz: Range::new(0.7, 4.0),
            detrend_window_seconds: 1.0,
            display_history_length: 60,
            heart_rate_method: HeartRateMethod::PeakInterval,
            spectral_min_prominence: 2.0,
        }
    }
}
impl MonitorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !(self.sampling_rate.is_finite() && self.sampling_rate > 0.0) {
            return Err(MonitorError::InvalidSampleRate);
        }
        if !(self.history_window_seconds.is_finite() && self.history_window_seconds > 0.0) {
            return Err(MonitorError::InvalidConfig(
                "historyWindowSeconds must be positive".into(),
            ));
        }
        if self.buffer_capacity() > SignalBuffer::MAX_CAPACITY {
            return Err(MonitorError::InvalidConfig(format!(
                "historyWindowSeconds {} at {} Hz exceeds {} buffered samples",
                self.history_window_seconds,
                self.sampling_rate,
                SignalBuffer::MAX_CAPACITY
            )));
        }
        if self.smoothing_window_samples == 0 || self.display_history_length == 0 {
            return Err(MonitorError::InvalidConfig(
                "smoothingWindowSamples and displayHistoryLength must be at least 1".into(),
            ));
        }
        if !(self.max_rmssd.is_finite() && self.max_rmssd > 0.0) {
            return Err(MonitorError::InvalidConfig("maxRmssd must be positive".into()));
        }
        if !(self.detrend_window_seconds.is_finite() && self.detrend_window_seconds > 0.0) {
            return Err(MonitorError::InvalidConfig(
                "detrendWindowSeconds must be positive".into(),
            ));
        }
        let band = self.heart_band_hz;
        if !(band.min > 0.0 && band.min < band.max) {
            return Err(MonitorError::InvalidConfig(format!(
                "heartBandHz must satisfy 0 < min < max, got {}..{}",
                band.min, band.max
            )));
        }
        if band.min >= self.sampling_rate / 2.0 {
            return Err(MonitorError::InvalidConfig(format!(
                "heart band starts at {} Hz, above Nyquist for {} Hz sampling",
                band.min, self.sampling_rate
            )));
        }
        self.thresholds.heart_rate.validate("heartRate")?;
        self.thresholds.respiratory_rate.validate("respiratoryRate")?;
        self.thresholds.stress_level.validate("stressLevel")?;
        Ok(())
    }
    /// Interval between sampler ticks (`1000 / samplingRate` ms).
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sampling_rate)
    }
    /// Rolling buffer capacity in samples.
    pub fn buffer_capacity(&self) -> usize {
        SignalBuffer::capacity_for(self.sampling_rate, self.history_window_seconds)
    }
    pub fn detrend_window_samples(&self) -> usize {
        ((self.sampling_rate * self.detrend_window_seconds).round() as usize).max(1)
    }
    /// Half-width of the moving average that isolates the breathing component.
    pub fn respiratory_smoothing_half_window(&self) -> usize {
        (self.sampling_rate / 2.0).floor() as usize
    }
    /// Minimum peak spacing implied by a maximum rate in events per minute.
    pub fn min_peak_distance(&self, max_per_minute: f64) -> usize {
        if max_per_minute <= 0.0 {
            return 0;
        }
        (self.sampling_rate * 60.0 / max_per_minute).floor() as usize
    }
}
