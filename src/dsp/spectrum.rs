use std::f64::consts::PI;
use ndarray::Array1;
use rustfft::{num_complex::Complex64, FftPlanner};
use crate::config::Range;
/// One-sided magnitude spectrum of a real signal.
#[derive(Clone, Debug)]
pub struct FrequencySpectrum {
    pub sample_rate_hz: f64,
    pub frequencies_hz: Vec<f64>,
    pub magnitudes: Vec<f64>,
}
impl FrequencySpectrum {
    pub fn bin_width_hz(&self) -> f64 {
        self.frequencies_hz.get(1).copied().unwrap_or(0.0)
    }
    /// Dominant frequency inside `band`, refined by parabolic interpolation.
    ///
    /// Returns `None` when the band holds no bins or the strongest bin is not
    /// at least `min_prominence` times the mean in-band magnitude.
    pub fn dominant_in_band(&self, band: Range, min_prominence: f64) -> Option<f64> {
        let in_band: Vec<usize> = self
            .frequencies_hz
            .iter()
            .enumerate()
            .filter(|(_, f)| band.contains(**f))
            .map(|(k, _)| k)
            .collect();
        let (&peak, &peak_mag) = in_band
            .iter()
            .map(|k| (k, &self.magnitudes[*k]))
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        let mean = in_band.iter().map(|k| self.magnitudes[*k]).sum::<f64>() / in_band.len() as f64;
        if !(peak_mag > 0.0 && peak_mag.is_finite()) || peak_mag < min_prominence * mean {
            return None;
        }
        let ties = in_band
            .iter()
            .filter(|k| **k != peak && self.magnitudes[**k] == peak_mag)
            .count();
        if ties > 0 {
            return None;
        }
        let offset = if peak > 0 && peak + 1 < self.magnitudes.len() {
            let (l, c, r) = (
                self.magnitudes[peak - 1],
                peak_mag,
                self.magnitudes[peak + 1],
            );
            let denom = l - 2.0 * c + r;
            if denom.abs() > f64::EPSILON {
                (0.5 * (l - r) / denom).clamp(-0.5, 0.5)
            } else {
                0.0
            }
        } else {
            0.0
        };
        Some((peak as f64 + offset) * self.bin_width_hz())
    }
}
/// Hann-windowed real FFT over the whole signal.
#[derive(Clone, Copy, Debug)]
pub struct SpectralAnalyzer {
    sample_rate_hz: f64,
}
impl SpectralAnalyzer {
    pub fn new(sample_rate_hz: f64) -> Self {
        Self { sample_rate_hz }
    }
    pub fn compute(&self, signal: &[f64]) -> FrequencySpectrum {
        let n = signal.len();
        if n < 2 {
            return FrequencySpectrum {
                sample_rate_hz: self.sample_rate_hz,
                frequencies_hz: Vec::new(),
                magnitudes: Vec::new(),
            };
        }
        let windowed = Array1::from(signal.to_vec()) * hann(n);
        let mut buffer: Vec<Complex64> = windowed.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(n).process(&mut buffer);
        let bins = n / 2 + 1;
        let frequencies_hz = (0..bins)
            .map(|k| k as f64 * self.sample_rate_hz / n as f64)
            .collect();
        let magnitudes = buffer.iter().take(bins).map(|c| c.norm()).collect();
        FrequencySpectrum {
            sample_rate_hz: self.sample_rate_hz,
            frequencies_hz,
            magnitudes,
        }
    }
}
fn hann(n: usize) -> Array1<f64> {
    let denom = (n - 1) as f64;
    Array1::from_iter((0..n).map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos())))
}
#[cfg(test)]
mod tests {
    use super::*;
    fn sine(freq_hz: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / rate).sin())
            .collect()
    }
    #[test]
    fn axis_follows_rate_and_length() {
        let spectrum = SpectralAnalyzer::new(30.0).compute(&vec![0.0; 300]);
        assert_eq!(spectrum.frequencies_hz.len(), 151);
        assert!((spectrum.bin_width_hz() - 0.1).abs() < 1e-12);
        assert!((spectrum.frequencies_hz[150] - 15.0).abs() < 1e-9);
    }
    #[test]
    fn finds_dominant_pulse_frequency() {
        let spectrum = SpectralAnalyzer::new(30.0).compute(&sine(1.2, 30.0, 300));
        let freq = spectrum
            .dominant_in_band(Range::new(0.7, 4.0), 2.0)
            .unwrap();
        assert!((freq - 1.2).abs() < 0.05, "got {freq}");
    }
    #[test]
    fn out_of_band_energy_is_ignored() {
        let signal: Vec<f64> = sine(0.3, 30.0, 300)
            .iter()
            .zip(sine(2.0, 30.0, 300))
            .map(|(slow, pulse)| 5.0 * slow + pulse)
            .collect();
        let spectrum = SpectralAnalyzer::new(30.0).compute(&signal);
        let freq = spectrum
            .dominant_in_band(Range::new(0.7, 4.0), 2.0)
            .unwrap();
        assert!((freq - 2.0).abs() < 0.05, "got {freq}");
    }
    #[test]
    fn flat_or_tiny_signal_has_no_peak() {
        let spectrum = SpectralAnalyzer::new(30.0).compute(&vec![0.0; 128]);
        assert_eq!(spectrum.dominant_in_band(Range::new(0.7, 4.0), 2.0), None);
        let empty = SpectralAnalyzer::new(30.0).compute(&[1.0]);
        assert_eq!(empty.dominant_in_band(Range::new(0.7, 4.0), 2.0), None);
    }
    #[test]
    fn broadband_signal_is_not_prominent() {
        // A centred impulse has a flat magnitude spectrum.
        let mut impulse = vec![0.0; 300];
        impulse[150] = 1.0;
        let spectrum = SpectralAnalyzer::new(30.0).compute(&impulse);
        assert!(spectrum.magnitudes.iter().all(|m| *m > 0.9));
        assert_eq!(spectrum.dominant_in_band(Range::new(0.7, 4.0), 2.0), None);
    }
    #[test]
    fn equal_peaks_are_ambiguous() {
        let frequencies_hz: Vec<f64> = (0..=40).map(|k| k as f64 * 0.1).collect();
        let mut magnitudes = vec![0.1; frequencies_hz.len()];
        magnitudes[10] = 5.0;
        magnitudes[20] = 5.0;
        let spectrum = FrequencySpectrum {
            sample_rate_hz: 8.0,
            frequencies_hz,
            magnitudes,
        };
        assert_eq!(spectrum.dominant_in_band(Range::new(0.7, 4.0), 2.0), None);
        let mut single = spectrum.clone();
        single.magnitudes[20] = 4.0;
        let freq = single.dominant_in_band(Range::new(0.7, 4.0), 2.0).unwrap();
        assert!((freq - 1.0).abs() < 1e-9, "got {freq}");
    }
}
