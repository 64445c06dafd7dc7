// src/dsp/mod.rs
pub mod buffer;
pub mod filter;
pub mod peaks;
pub mod spectrum;
pub use buffer::SignalBuffer;
pub use filter::{detrend, moving_average, Bandpass, FilterStage};
pub use peaks::PeakDetector;
pub use spectrum::{FrequencySpectrum, SpectralAnalyzer};
