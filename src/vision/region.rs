use image::{Rgb, RgbImage};
use crate::error::MonitorError;
use crate::types::BoundingBox;
/// Pixel rectangle inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
/// Borrowed view of the face crop; no pixel data is copied.
#[derive(Clone, Copy, Debug)]
pub struct FaceRegion<'a> {
    frame: &'a RgbImage,
    rect: PixelRect,
}
impl<'a> FaceRegion<'a> {
    pub fn rect(&self) -> PixelRect {
        self.rect
    }
    pub fn pixel_count(&self) -> usize {
        self.rect.width as usize * self.rect.height as usize
    }
    pub fn pixels(&self) -> impl Iterator<Item = &'a Rgb<u8>> {
        let frame = self.frame;
        let PixelRect {
            x,
            y,
            width,
            height,
        } = self.rect;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| frame.get_pixel(col, row)))
    }
    /// Owned copy of the crop.
    pub fn to_image(&self) -> RgbImage {
        image::imageops::crop_imm(
            self.frame,
            self.rect.x,
            self.rect.y,
            self.rect.width,
            self.rect.height,
        )
        .to_image()
    }
}
/// Crop a frame to the detector's normalised bounding box.
pub fn extract_face_region<'a>(
    frame: &'a RgbImage,
    face: Option<&BoundingBox>,
) -> Result<FaceRegion<'a>, MonitorError> {
    let face = face.ok_or(MonitorError::NoFace)?;
    let rect = clamp_to_frame(face, frame.width(), frame.height())?;
    Ok(FaceRegion { frame, rect })
}
/// Scale a normalised box to pixels and intersect it with the frame.
pub fn clamp_to_frame(
    face: &BoundingBox,
    frame_width: u32,
    frame_height: u32,
) -> Result<PixelRect, MonitorError> {
    let (w, h) = (frame_width as f64, frame_height as f64);
    let degenerate = |x0: f64, x1: f64, y0: f64, y1: f64| MonitorError::DegenerateRegion {
        width: to_pixels(x1 - x0),
        height: to_pixels(y1 - y0),
    };
    // f64::min/max swallow NaN, so reject non-finite boxes before scaling.
    if ![face.x_min, face.y_min, face.width, face.height]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(degenerate(0.0, 0.0, 0.0, 0.0));
    }
    let x0 = (face.x_min * w).max(0.0);
    let y0 = (face.y_min * h).max(0.0);
    let x1 = ((face.x_min + face.width) * w).min(w);
    let y1 = ((face.y_min + face.height) * h).min(h);
    let x = x0.floor();
    let y = y0.floor();
    let width = (x1 - x).floor();
    let height = (y1 - y).floor();
    if width < 1.0 || height < 1.0 || x >= w || y >= h {
        return Err(degenerate(x, x + width, y, y + height));
    }
    Ok(PixelRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}
fn to_pixels(v: f64) -> i64 {
    if v.is_finite() {
        v.floor() as i64
    } else {
        0
    }
}
