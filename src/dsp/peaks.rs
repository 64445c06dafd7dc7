/// Local-maximum detector with optional minimum-distance suppression.
///
/// Pure: the same input always yields the same indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeakDetector {
    min_distance: usize,
}
impl PeakDetector {
    /// Detector without distance suppression.
    pub fn new() -> Self {
        Self::default()
    }
    /// Peaks closer than `min_distance` samples to the previously accepted
    /// peak compete with it; only the larger one survives.
    pub fn with_min_distance(min_distance: usize) -> Self {
        Self { min_distance }
    }
    pub fn min_distance(&self) -> usize {
        self.min_distance
    }
    pub fn find(&self, signal: &[f64]) -> Vec<usize> {
        let mut peaks: Vec<usize> = Vec::new();
        if signal.len() < 3 {
            return peaks;
        }
        for i in 1..signal.len() - 1 {
            if !(signal[i] > signal[i - 1] && signal[i] > signal[i + 1]) {
                continue;
            }
            match peaks.last_mut() {
                Some(last) if i - *last < self.min_distance => {
                    if signal[i] > signal[*last] {
                        *last = i;
                    }
                }
                _ => peaks.push(i),
            }
        }
        peaks
    }
}
