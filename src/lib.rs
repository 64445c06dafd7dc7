//! Contactless vital-sign estimation from face video.
//!
//! Each tick the [`FrameSampler`] captures a frame, crops it to the face box
//! supplied by an external [`Detector`], reduces the crop to one green-channel
//! [`Sample`], appends it to the session's [`SignalBuffer`] and re-estimates
//! heart rate, respiratory rate and a stress score over the buffered window.
pub mod config;
pub mod dsp;
pub mod error;
pub mod estimate;
pub mod history;
pub mod pipeline;
pub mod sampler;
pub mod source;
pub mod types;
pub mod vision;
pub use config::{HeartRateMethod, MonitorConfig, Range, Thresholds, VitalThreshold};
pub use dsp::{PeakDetector, SignalBuffer, SpectralAnalyzer};
pub use error::MonitorError;
pub use estimate::{
    HeartRateEstimator, PeakIntervalEstimator, PulseInput, SpectralEstimator, VitalEstimator,
};
pub use history::{ChannelSink, SessionEvent, SharedHistory, VitalHistory, VitalsSink};
pub use pipeline::VitalPipeline;
pub use sampler::{FrameSampler, SamplerState, TickStats};
pub use source::{FrameSource, ManualFrameSource};
pub use types::{BoundingBox, Keypoint, Keypoints, Sample, VitalReadout, VitalSigns, VitalStatus};
pub use vision::{Detector, Detectors, Frame, StaticDetector};
