//! Vital-sign estimators.
//!
//! Heart rate and respiratory rate come from the mean spacing of peaks in
//! their respective conditioned signals; stress is an inverse HRV proxy
//! (RMSSD of successive peak intervals). The heart-rate source is a
//! [`HeartRateEstimator`] so the peak-interval and spectral methods can be
//! swapped per session.
use crate::config::{HeartRateMethod, MonitorConfig, Range, Thresholds};
use crate::dsp::{PeakDetector, SpectralAnalyzer};
use crate::types::VitalSigns;
/// Conditioned pulse signal handed to a heart-rate estimator.
#[derive(Clone, Copy, Debug)]
pub struct PulseInput<'a> {
    pub signal: &'a [f64],
    /// Same length as `signal`.
    pub timestamps_ms: &'a [f64],
    pub sample_rate_hz: f64,
}
/// Strategy producing a raw (unclamped) heart rate in bpm, or `0`.
pub trait HeartRateEstimator: Send {
    fn name(&self) -> &'static str;
    fn estimate(&self, input: &PulseInput<'_>) -> f64;
}
#[derive(Clone, Copy, Debug)]
pub struct PeakIntervalEstimator {
    peaks: PeakDetector,
}
impl PeakIntervalEstimator {
    pub fn new(peaks: PeakDetector) -> Self {
        Self { peaks }
    }
}
impl HeartRateEstimator for PeakIntervalEstimator {
    fn name(&self) -> &'static str {
        "peak-interval"
    }
    fn estimate(&self, input: &PulseInput<'_>) -> f64 {
        let peaks = self.peaks.find(input.signal);
        rate_per_minute(&peak_times(&peaks, input.timestamps_ms))
    }
}
#[derive(Clone, Copy, Debug)]
pub struct SpectralEstimator {
    band: Range,
    min_prominence: f64,
}
impl SpectralEstimator {
    pub fn new(band: Range, min_prominence: f64) -> Self {
        Self {
            band,
            min_prominence,
        }
    }
}
impl HeartRateEstimator for SpectralEstimator {
    fn name(&self) -> &'static str {
        "spectral"
    }
    fn estimate(&self, input: &PulseInput<'_>) -> f64 {
        SpectralAnalyzer::new(input.sample_rate_hz)
            .compute(input.signal)
            .dominant_in_band(self.band, self.min_prominence)
            .map(|hz| (hz * 60.0).round())
            .unwrap_or(0.0)
    }
}
pub fn peak_times(peaks: &[usize], timestamps_ms: &[f64]) -> Vec<f64> {
    peaks
        .iter()
        .filter_map(|&i| timestamps_ms.get(i).copied())
        .collect()
}
/// Successive differences of peak times (RR intervals, ms).
pub fn intervals(times_ms: &[f64]) -> Vec<f64> {
    times_ms.windows(2).map(|w| w[1] - w[0]).collect()
}
/// Events per minute from the mean inter-peak interval; `0` with fewer than two peaks.
pub fn rate_per_minute(times_ms: &[f64]) -> f64 {
    if times_ms.len() < 2 {
        return 0.0;
    }
    let mean = (times_ms[times_ms.len() - 1] - times_ms[0]) / (times_ms.len() - 1) as f64;
    if !(mean > 0.0) {
        return 0.0;
    }
    (60_000.0 / mean).round()
}
/// Root mean square of successive RR-interval differences.
pub fn rmssd(rr_ms: &[f64]) -> Option<f64> {
    if rr_ms.len() < 2 {
        return None;
    }
    let diffs = intervals(rr_ms);
    let mean_sq = diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64;
    Some(mean_sq.sqrt())
}
/// Stress score 0..=100; lower HRV reads as higher stress. `0` with fewer
/// than two RR intervals.
pub fn stress_from_intervals(rr_ms: &[f64], max_rmssd: f64) -> f64 {
    match rmssd(rr_ms) {
        Some(value) => (100.0 - value / max_rmssd * 100.0).clamp(0.0, 100.0).round(),
        None => 0.0,
    }
}
pub struct VitalEstimator {
    thresholds: Thresholds,
    max_rmssd: f64,
    heart_peaks: PeakDetector,
    breath_peaks: PeakDetector,
    heart_rate: Box<dyn HeartRateEstimator>,
}
impl VitalEstimator {
    pub fn from_config(config: &MonitorConfig) -> Self {
        let thresholds = config.thresholds;
        let heart_peaks =
            PeakDetector::with_min_distance(config.min_peak_distance(thresholds.heart_rate.max));
        let breath_peaks = PeakDetector::with_min_distance(
            config.min_peak_distance(thresholds.respiratory_rate.max),
        );
        let heart_rate: Box<dyn HeartRateEstimator> = match config.heart_rate_method {
            HeartRateMethod::PeakInterval => Box::new(PeakIntervalEstimator::new(heart_peaks)),
            HeartRateMethod::Spectral => Box::new(SpectralEstimator::new(
                config.heart_band_hz,
                config.spectral_min_prominence,
            )),
        };
        Self {
            thresholds,
            max_rmssd: config.max_rmssd,
            heart_peaks,
            breath_peaks,
            heart_rate,
        }
    }
    /// Replace the heart-rate strategy.
    pub fn with_heart_rate_estimator(mut self, estimator: Box<dyn HeartRateEstimator>) -> Self {
        self.heart_rate = estimator;
        self
    }
    pub fn heart_rate_method(&self) -> &'static str {
        self.heart_rate.name()
    }
    /// `pulse` and `respiration` are conditioned copies of the same buffer;
    /// all three slices share `timestamps_ms`.
    pub fn estimate(
        &self,
        pulse: &[f64],
        respiration: &[f64],
        timestamps_ms: &[f64],
        sample_rate_hz: f64,
    ) -> VitalSigns {
        let input = PulseInput {
            signal: pulse,
            timestamps_ms,
            sample_rate_hz,
        };
        let heart_rate = self.heart_rate.estimate(&input);
        let breath_times = peak_times(&self.breath_peaks.find(respiration), timestamps_ms);
        let respiratory_rate = rate_per_minute(&breath_times);
        let beat_times = peak_times(&self.heart_peaks.find(pulse), timestamps_ms);
        let stress_level = stress_from_intervals(&intervals(&beat_times), self.max_rmssd);
        VitalSigns {
            heart_rate: self.thresholds.heart_rate.clamp(heart_rate),
            respiratory_rate: self.thresholds.respiratory_rate.clamp(respiratory_rate),
            stress_level: self.thresholds.stress_level.clamp(stress_level),
        }
    }
}
