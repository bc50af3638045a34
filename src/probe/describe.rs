//! Label text for a measurement

use crate::domain::{AnnotatedPoint, ImagePoint, PixelSample, PixelStats};
use crate::imaging::ProbeImage;

/// Label lines drawn next to an in-bounds handle
#[derive(Clone, Debug, PartialEq)]
pub struct LabelText {
    /// `"{x}, {y}"`
    pub coordinates: String,
    /// Sampled values, see [`format_value`]
    pub value: String,
    /// Free text, possibly empty
    pub annotation: String,
    /// Image-space anchor of the label, next to the handle
    pub anchor: ImagePoint,
}

/// What the host draws for one measurement
#[derive(Clone, Debug, PartialEq)]
pub struct RenderDescription {
    /// Handle position in image space, drawn even without a label
    pub handle: ImagePoint,
    /// `None` when the handle is outside the image
    pub label: Option<LabelText>,
}

/// `R: r G: g B: b` for color samples, `SP: raw MO: modality[ SUV: suv]` for
/// grayscale ones
pub fn format_value(sample: &PixelSample) -> String {
    match sample {
        PixelSample::Color { rgb: [r, g, b] } => format!("R: {r} G: {g} B: {b}"),
        PixelSample::Grayscale {
            stored,
            modality,
            suv,
        } => {
            let mut text = format!("SP: {stored} MO: {modality:.3}");
            if let Some(suv) = suv {
                text.push_str(&format!(" SUV: {suv:.3}"));
            }
            text
        }
    }
}

/// Describe `point` from its cached stats without touching the cache
pub fn describe(image: &dyn ProbeImage, point: &AnnotatedPoint, text_offset: f64) -> RenderDescription {
    let label = point
        .stats()
        .filter(|stats| in_bounds(image, stats))
        .map(|stats| LabelText {
            coordinates: format!("{}, {}", stats.x, stats.y),
            value: format_value(&stats.sample),
            annotation: point.annotation.clone(),
            anchor: point.position.translate(text_offset, -text_offset),
        });

    RenderDescription {
        handle: point.position,
        label,
    }
}

// Stats may predate an image swap
fn in_bounds(image: &dyn ProbeImage, stats: &PixelStats) -> bool {
    image
        .bounds()
        .contains_point(stats.x as i64, stats.y as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ViewerImage;
    use std::time::Instant;

    #[test]
    fn test_format_grayscale() {
        let sample = PixelSample::Grayscale {
            stored: 50.0,
            modality: -974.0,
            suv: None,
        };
        assert_eq!(format_value(&sample), "SP: 50 MO: -974.000");

        let sample = PixelSample::Grayscale {
            stored: 812.0,
            modality: 1624.25,
            suv: Some(2.34567),
        };
        assert_eq!(format_value(&sample), "SP: 812 MO: 1624.250 SUV: 2.346");
    }

    #[test]
    fn test_format_color() {
        let sample = PixelSample::Color { rgb: [12, 34, 56] };
        assert_eq!(format_value(&sample), "R: 12 G: 34 B: 56");
    }

    #[test]
    fn test_describe_uses_cached_stats() {
        let image = ViewerImage::grayscale_u16(16, 16, vec![7; 256]).unwrap();
        let mut point = AnnotatedPoint::new(ImagePoint::new(4.0, 5.0));
        assert_eq!(describe(&image, &point, 3.0).label, None);

        point.cache.store(
            Some(PixelStats {
                x: 4,
                y: 5,
                sample: PixelSample::Grayscale {
                    stored: 7.0,
                    modality: 7.0,
                    suv: None,
                },
            }),
            Instant::now(),
        );
        let label = describe(&image, &point, 3.0).label.unwrap();
        assert_eq!(label.coordinates, "4, 5");
        assert_eq!(label.value, "SP: 7 MO: 7.000");
        assert_eq!(label.annotation, "");
        assert_eq!(label.anchor, ImagePoint::new(7.0, 2.0));
    }

    #[test]
    fn test_stale_stats_outside_new_image_are_hidden() {
        let small = ViewerImage::grayscale_u16(2, 2, vec![0; 4]).unwrap();
        let mut point = AnnotatedPoint::new(ImagePoint::new(9.0, 9.0));
        point.cache.store(
            Some(PixelStats {
                x: 9,
                y: 9,
                sample: PixelSample::Color { rgb: [0, 0, 0] },
            }),
            Instant::now(),
        );
        let description = describe(&small, &point, 3.0);
        assert_eq!(description.label, None);
        assert_eq!(description.handle, ImagePoint::new(9.0, 9.0));
    }
}
