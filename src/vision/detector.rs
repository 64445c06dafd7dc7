use std::sync::Arc;
use once_cell::sync::OnceCell;
use crate::error::MonitorError;
use crate::types::{BoundingBox, Keypoints};
use crate::vision::Frame;
/// Capability interface over the external face and pose models.
///
/// Implementations are shared read-only across ticks and sessions.
pub trait Detector: Send + Sync {
    fn detect_face(&self, frame: &Frame) -> Option<BoundingBox>;
    fn detect_pose(&self, frame: &Frame) -> Option<Keypoints>;
}
/// Slot for the application's detector models.
///
/// Filled once, either directly or through a fallible loader. A failed load
/// leaves the slot empty; retrying is up to the caller.
#[derive(Default)]
pub struct Detectors {
    slot: OnceCell<Arc<dyn Detector>>,
}
impl Detectors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn ready(detector: Arc<dyn Detector>) -> Self {
        let detectors = Self::new();
        detectors.install(detector);
        detectors
    }
    /// Returns `false` if a detector was already installed.
    pub fn install(&self, detector: Arc<dyn Detector>) -> bool {
        self.slot.set(detector).is_ok()
    }
    pub fn load_with<F>(&self, load: F) -> Result<Arc<dyn Detector>, MonitorError>
    where
        F: FnOnce() -> anyhow::Result<Arc<dyn Detector>>,
    {
        self.slot
            .get_or_try_init(|| {
                let detector = load().map_err(|e| MonitorError::ModelLoad(format!("{e:#}")))?;
                log::info!("detector models loaded");
                Ok::<_, MonitorError>(detector)
            })
            .map(Arc::clone)
            .map_err(|e| {
                log::error!("{e}");
                e
            })
    }
    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }
    pub fn get(&self) -> Option<Arc<dyn Detector>> {
        self.slot.get().cloned()
    }
}
/// Detector that reports the same face box for every frame and no pose.
///
/// Useful for playback of pre-cropped footage and for tests.
#[derive(Clone, Copy, Debug)]
pub struct StaticDetector {
    face: Option<BoundingBox>,
}
impl StaticDetector {
    pub fn new(face: Option<BoundingBox>) -> Self {
        Self { face }
    }
}
impl Detector for StaticDetector {
    fn detect_face(&self, _frame: &Frame) -> Option<BoundingBox> {
        self.face
    }
    fn detect_pose(&self, _frame: &Frame) -> Option<Keypoints> {
        None
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    #[test]
    fn empty_slot_is_not_ready() {
        let detectors = Detectors::new();
        assert!(!detectors.is_ready());
        assert!(detectors.get().is_none());
    }
    #[test]
    fn failed_load_can_be_retried() {
        let detectors = Detectors::new();
        let err = detectors
            .load_with(|| Err(anyhow!("weights missing")))
            .err()
            .unwrap();
        assert!(matches!(err, MonitorError::ModelLoad(ref msg) if msg.contains("weights missing")));
        assert!(!detectors.is_ready());
        detectors
            .load_with(|| Ok(Arc::new(StaticDetector::new(None)) as Arc<dyn Detector>))
            .unwrap();
        assert!(detectors.is_ready());
    }
    #[test]
    fn install_only_once() {
        let face = BoundingBox::new(0.1, 0.1, 0.5, 0.5);
        let detectors = Detectors::ready(Arc::new(StaticDetector::new(Some(face))));
        assert!(!detectors.install(Arc::new(StaticDetector::new(None))));
        let frame = Frame::new(4, 4);
        let detector = detectors.get().unwrap();
        assert_eq!(detector.detect_face(&frame), Some(face));
        assert_eq!(detector.detect_pose(&frame), None);
    }
}
