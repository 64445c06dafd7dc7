// src/types.rs
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::config::{Thresholds, VitalThreshold};
/// One scalar reading of the skin signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Offset from the session's monotonic start.
    pub timestamp: Duration,
    pub value: f64,
}
impl Sample {
    pub fn new(timestamp: Duration, value: f64) -> Self {
        Self { timestamp, value }
    }
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp.as_secs_f64() * 1000.0
    }
}
/// Per-tick vital-sign estimate. `0` in any field means "not enough data".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub heart_rate: f64,
    pub respiratory_rate: f64,
    pub stress_level: f64,
}
impl VitalSigns {
    pub fn new(heart_rate: f64, respiratory_rate: f64, stress_level: f64) -> Self {
        Self {
            heart_rate,
            respiratory_rate,
            stress_level,
        }
    }
    /// All-zero snapshot emitted when the tick had no usable face signal.
    pub fn unavailable() -> Self {
        Self::default()
    }
    pub fn classify(&self, thresholds: &Thresholds) -> VitalReadout {
        VitalReadout {
            heart_rate: VitalStatus::of(self.heart_rate, &thresholds.heart_rate),
            respiratory_rate: VitalStatus::of(self.respiratory_rate, &thresholds.respiratory_rate),
            stress_level: VitalStatus::of(self.stress_level, &thresholds.stress_level),
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalStatus {
    Unavailable,
    Low,
    Normal,
    High,
}
impl VitalStatus {
    fn of(value: f64, threshold: &VitalThreshold) -> Self {
        if value == 0.0 {
            return VitalStatus::Unavailable;
        }
        match threshold.normal {
            Some(normal) if value < normal.min => VitalStatus::Low,
            Some(normal) if value > normal.max => VitalStatus::High,
            _ => VitalStatus::Normal,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalReadout {
    pub heart_rate: VitalStatus,
    pub respiratory_rate: VitalStatus,
    pub stress_level: VitalStatus,
}
/// Face location from the external detector, normalised to the frame size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub width: f64,
    pub height: f64,
}
impl BoundingBox {
    pub fn new(x_min: f64, y_min: f64, width: f64, height: f64) -> Self {
        Self {
            x_min,
            y_min,
            width,
            height,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub score: f64,
}
pub type Keypoints = Vec<Keypoint>;
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn classification_uses_normal_band() {
        let thresholds = Thresholds::default();
        let readout = VitalSigns::new(110.0, 14.0, 35.0).classify(&thresholds);
        assert_eq!(readout.heart_rate, VitalStatus::High);
        assert_eq!(readout.respiratory_rate, VitalStatus::Normal);
        assert_eq!(readout.stress_level, VitalStatus::Normal);
        let readout = VitalSigns::new(50.0, 0.0, 0.0).classify(&thresholds);
        assert_eq!(readout.heart_rate, VitalStatus::Low);
        assert_eq!(readout.respiratory_rate, VitalStatus::Unavailable);
        assert_eq!(readout.stress_level, VitalStatus::Unavailable);
    }
    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_string(&VitalSigns::new(72.0, 15.0, 40.0)).unwrap();
        assert_eq!(
            json,
            r#"{"heartRate":72.0,"respiratoryRate":15.0,"stressLevel":40.0}"#
        );
    }
}
