use std::f64::consts::{FRAC_1_SQRT_2, PI};
use crate::config::{MonitorConfig, Range};
use crate::dsp::SignalBuffer;
use crate::error::MonitorError;
/// Centered moving average; the window is clamped at the signal edges.
pub fn moving_average(signal: &[f64], half_window: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    // Prefix sums keep this linear in the signal length.
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in signal {
        prefix.push(prefix[prefix.len() - 1] + v);
    }
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half_window);
            let hi = (i + half_window + 1).min(n);
            (prefix[hi] - prefix[lo]) / (hi - lo) as f64
        })
        .collect()
}
/// Subtract the centered moving average over `window` samples from each sample.
pub fn detrend(signal: &[f64], window: usize) -> Vec<f64> {
    let trend = moving_average(signal, window / 2);
    signal.iter().zip(trend).map(|(v, t)| v - t).collect()
}
#[derive(Clone, Copy, Debug, PartialEq)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}
#[derive(Clone, Copy, Debug, Default)]
struct BiquadState {
    z1: f64,
    z2: f64,
}
impl BiquadState {
    fn process(&mut self, c: &BiquadCoeffs, input: f64) -> f64 {
        // Transposed direct form II
        let y = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * y + self.z2;
        self.z2 = c.b2 * input - c.a2 * y;
        y
    }
}
/// Fourth-order Butterworth band-pass (2nd-order high-pass at the low edge
/// cascaded with a 2nd-order low-pass at the high edge).
///
/// The design is tied to one sampling rate. `apply` starts from zero state on
/// every call, so nothing carries over between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Bandpass {
    sample_rate_hz: f64,
    low_hz: f64,
    high_hz: f64,
    sections: [BiquadCoeffs; 2],
}
impl Bandpass {
    pub fn design(sample_rate_hz: f64, band: Range) -> Result<Self, MonitorError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(MonitorError::InvalidSampleRate);
        }
        let nyquist = sample_rate_hz * 0.5;
        let low_hz = nyquist_clamp(band.min.min(band.max), nyquist);
        let high_hz = nyquist_clamp(band.min.max(band.max), nyquist);
        if low_hz >= high_hz {
            return Err(MonitorError::InvalidConfig(format!(
                "band {}..{} Hz collapses at {sample_rate_hz} Hz sampling",
                band.min, band.max
            )));
        }
        Ok(Self {
            sample_rate_hz,
            low_hz,
            high_hz,
            sections: [
                highpass(low_hz, sample_rate_hz, FRAC_1_SQRT_2),
                lowpass(high_hz, sample_rate_hz, FRAC_1_SQRT_2),
            ],
        })
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    pub fn band_hz(&self) -> (f64, f64) {
        (self.low_hz, self.high_hz)
    }
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        let mut states = [BiquadState::default(); 2];
        signal
            .iter()
            .map(|&x| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(x, |value, (coeffs, state)| state.process(coeffs, value))
            })
            .collect()
    }
}
/// Conditions the buffered signal for the estimators.
#[derive(Clone, Debug)]
pub struct FilterStage {
    detrend_window: usize,
    respiratory_half_window: usize,
    band: Range,
    bandpass: Bandpass,
}
impl FilterStage {
    pub fn new(config: &MonitorConfig) -> Result<Self, MonitorError> {
        Ok(Self {
            detrend_window: config.detrend_window_samples(),
            respiratory_half_window: config.respiratory_smoothing_half_window(),
            band: config.heart_band_hz,
            bandpass: Bandpass::design(config.sampling_rate, config.heart_band_hz)?,
        })
    }
    /// Band-pass design for `sample_rate_hz`, redesigned if the rate changed.
    pub fn bandpass_for(&mut self, sample_rate_hz: f64) -> Result<&Bandpass, MonitorError> {
        if self.bandpass.sample_rate_hz() != sample_rate_hz {
            log::debug!(
                "redesigning band-pass for {sample_rate_hz} Hz (was {} Hz)",
                self.bandpass.sample_rate_hz()
            );
            self.bandpass = Bandpass::design(sample_rate_hz, self.band)?;
        }
        Ok(&self.bandpass)
    }
    /// Detrended, band-passed copy of the buffer for pulse detection.
    pub fn pulse_signal(&mut self, buffer: &SignalBuffer) -> Result<Vec<f64>, MonitorError> {
        let detrended = detrend(&buffer.values(), self.detrend_window);
        let bandpass = self.bandpass_for(buffer.sample_rate_hz())?;
        Ok(bandpass.apply(&detrended))
    }
    /// Heavily smoothed copy of the buffer for breathing detection.
    pub fn respiratory_signal(&self, buffer: &SignalBuffer) -> Vec<f64> {
        moving_average(&buffer.values(), self.respiratory_half_window)
    }
}
fn nyquist_clamp(freq_hz: f64, nyquist: f64) -> f64 {
    freq_hz.clamp(0.01, nyquist - 0.01)
}
fn lowpass(freq_hz: f64, sample_rate_hz: f64, q: f64) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let b0 = (1.0 - cos_w0) * 0.5;
    let b1 = 1.0 - cos_w0;
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;
    normalize(b0, b1, b2, a0, a1, a2)
}
fn highpass(freq_hz: f64, sample_rate_hz: f64, q: f64) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let b0 = (1.0 + cos_w0) * 0.5;
    let b1 = -(1.0 + cos_w0);
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;
    normalize(b0, b1, b2, a0, a1, a2)
}
fn normalize(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> BiquadCoeffs {
    let a0_inv = 1.0 / a0;
    BiquadCoeffs {
        b0: b0 * a0_inv,
        b1: b1 * a0_inv,
        b2: b2 * a0_inv,
        a1: a1 * a0_inv,
        a2: a2 * a0_inv,
    }
}
