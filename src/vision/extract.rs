use std::time::Duration;
use crate::types::Sample;
use crate::vision::FaceRegion;
/// Green-channel reading of one face crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreenReading {
    pub sample: Sample,
    /// Pixels that passed the exposure gate; `0` means the sample is degenerate.
    pub qualifying_pixels: usize,
}
impl GreenReading {
    pub fn is_degenerate(&self) -> bool {
        self.qualifying_pixels == 0
    }
}
/// Mean green value over well-exposed skin pixels.
///
/// A pixel counts when `20 < g < 230`, `r > 10` and `b > 10`; saturated and
/// underexposed pixels only add noise to the pulse signal.
pub fn extract_green(region: &FaceRegion<'_>, timestamp: Duration) -> GreenReading {
    let (sum, count) = region
        .pixels()
        .filter(|p| {
            let [r, g, b] = p.0;
            g > 20 && g < 230 && r > 10 && b > 10
        })
        .fold((0u64, 0usize), |(sum, count), p| (sum + p.0[1] as u64, count + 1));
    let value = if count > 0 {
        sum as f64 / count as f64
    } else {
        0.0
    };
    GreenReading {
        sample: Sample::new(timestamp, value),
        qualifying_pixels: count,
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use crate::vision::extract_face_region;
    use image::{Rgb, RgbImage};
    #[test]
    fn averages_qualifying_pixels_only() {
        let mut frame = RgbImage::from_pixel(4, 1, Rgb([100, 120, 90]));
        frame.put_pixel(1, 0, Rgb([100, 80, 90]));
        // Rejected: saturated green, dark red, dark blue.
        frame.put_pixel(2, 0, Rgb([100, 240, 90]));
        frame.put_pixel(3, 0, Rgb([5, 200, 90]));
        let region = extract_face_region(&frame, Some(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap();
        let reading = extract_green(&region, Duration::from_millis(40));
        assert_eq!(reading.qualifying_pixels, 2);
        assert_eq!(reading.sample.value, 100.0);
        assert_eq!(reading.sample.timestamp, Duration::from_millis(40));
    }
    #[test]
    fn no_qualifying_pixels_reads_zero() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let region = extract_face_region(&frame, Some(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap();
        let reading = extract_green(&region, Duration::ZERO);
        assert!(reading.is_degenerate());
        assert_eq!(reading.sample.value, 0.0);
    }
    #[test]
    fn only_reads_inside_the_crop() {
        let mut frame = RgbImage::from_pixel(10, 10, Rgb([50, 50, 50]));
        for x in 0..5 {
            for y in 0..5 {
                frame.put_pixel(x, y, Rgb([50, 150, 50]));
            }
        }
        let region = extract_face_region(&frame, Some(&BoundingBox::new(0.0, 0.0, 0.5, 0.5)))
            .unwrap();
        assert_eq!(extract_green(&region, Duration::ZERO).sample.value, 150.0);
    }
}
