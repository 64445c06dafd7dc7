use std::sync::Arc;
use std::time::Duration;
use log::debug;
use crate::config::MonitorConfig;
use crate::dsp::{FilterStage, SignalBuffer};
use crate::error::MonitorError;
use crate::estimate::{HeartRateEstimator, VitalEstimator};
use crate::types::{BoundingBox, Sample, VitalSigns};
use crate::vision::{extract_face_region, extract_green, Frame};
/// Per-session processing chain: crop, extract, buffer, filter, estimate.
pub struct VitalPipeline {
    config: Arc<MonitorConfig>,
    buffer: SignalBuffer,
    filters: FilterStage,
    estimator: VitalEstimator,
}
impl VitalPipeline {
    pub fn new(config: Arc<MonitorConfig>) -> Result<Self, MonitorError> {
        config.validate()?;
        let buffer = SignalBuffer::with_capacity(config.sampling_rate, config.buffer_capacity())?;
        let filters = FilterStage::new(&config)?;
        let estimator = VitalEstimator::from_config(&config);
        Ok(Self {
            config,
            buffer,
            filters,
            estimator,
        })
    }
    pub fn with_heart_rate_estimator(mut self, estimator: Box<dyn HeartRateEstimator>) -> Self {
        self.estimator = self.estimator.with_heart_rate_estimator(estimator);
        self
    }
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
    pub fn buffer(&self) -> &SignalBuffer {
        &self.buffer
    }
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
    /// Run one tick on a captured frame and the detector's face box.
    ///
    /// A missing face, a box that clamps to nothing, or a crop without usable
    /// pixels leaves the buffer untouched and yields the all-zero snapshot.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        face: Option<&BoundingBox>,
        timestamp: Duration,
    ) -> Result<VitalSigns, MonitorError> {
        let region = match extract_face_region(frame, face) {
            Ok(region) => region,
            Err(e) if e.is_degenerate() => {
                debug!("skipping frame at {timestamp:?}: {e}");
                return Ok(VitalSigns::unavailable());
            }
            Err(e) => return Err(e),
        };
        let reading = extract_green(&region, timestamp);
        if reading.is_degenerate() {
            debug!("no well-exposed skin pixels at {timestamp:?}");
            return Ok(VitalSigns::unavailable());
        }
        self.push_sample(reading.sample)
    }
    /// Append an already-extracted sample and re-estimate over the window.
    pub fn push_sample(&mut self, sample: Sample) -> Result<VitalSigns, MonitorError> {
        self.buffer.push(sample)?;
        self.estimate()
    }
    /// Estimate from the current window without modifying it.
    pub fn estimate(&mut self) -> Result<VitalSigns, MonitorError> {
        let pulse = self.filters.pulse_signal(&self.buffer)?;
        let respiration = self.filters.respiratory_signal(&self.buffer);
        let timestamps = self.buffer.timestamps_ms();
        Ok(self.estimator.estimate(
            &pulse,
            &respiration,
            &timestamps,
            self.buffer.sample_rate_hz(),
        ))
    }
}
