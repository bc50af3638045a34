//! Pixel statistics under a handle

use crate::domain::{ImagePoint, PixelSample, PixelStats};
use crate::imaging::{ProbeImage, calculate_suv};

/// Sample the image at the pixel nearest to `position`.
///
/// Returns `None` when the rounded position lies outside the image or the
/// position is not a finite number.
pub fn compute_stats(image: &dyn ProbeImage, position: ImagePoint) -> Option<PixelStats> {
    if !position.is_finite() {
        log::warn!("cannot sample non-finite position {:?}", position);
        return None;
    }
    let (x, y) = position.to_pixel();
    if !image.bounds().contains_point(x, y) {
        return None;
    }
    let (x, y) = (x as u32, y as u32);

    let sample = if image.is_color() {
        let Some(rgb) = image.rgb_pixels(x, y, 1, 1).first().copied() else {
            log::warn!("image returned no RGB sample at ({}, {})", x, y);
            return None;
        };
        PixelSample::Color { rgb }
    } else {
        let Some(stored) = image.stored_pixels(x, y, 1, 1).first().copied() else {
            log::warn!("image returned no stored pixel at ({}, {})", x, y);
            return None;
        };
        let modality = image.rescale().apply(stored);
        PixelSample::Grayscale {
            stored,
            modality,
            suv: calculate_suv(modality, image.modality(), image.pet_calibration()),
        }
    };

    Some(PixelStats { x, y, sample })
}
