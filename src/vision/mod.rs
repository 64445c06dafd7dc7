// src/vision/mod.rs
pub mod detector;
pub mod extract;
pub mod region;
/// Raw RGB video frame as delivered by the capture collaborator.
pub type Frame = image::RgbImage;
pub use detector::{Detector, Detectors, StaticDetector};
pub use extract::{extract_green, GreenReading};
pub use region::{clamp_to_frame, extract_face_region, FaceRegion, PixelRect};
