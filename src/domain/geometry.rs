//! Geometric types for image and canvas coordinates

/// Position in image pixel space (column, row), sub-pixel precision
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

/// Position on the display surface the image is drawn onto
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Translate the point by the given offset
    pub fn translate(&self, dx: f64, dy: f64) -> ImagePoint {
        ImagePoint {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Nearest integer pixel, rounding halves up (`-0.5` becomes `0`)
    pub fn to_pixel(self) -> (i64, i64) {
        (round_half_up(self.x) as i64, round_half_up(self.y) as i64)
    }
}

// `f64::round` takes halves away from zero; negative halves go up instead.
// Adding 0.5 before flooring would round the largest double below 0.5 to 1.
fn round_half_up(v: f64) -> f64 {
    let rounded = v.round();
    if v - v.trunc() == -0.5 { rounded + 1.0 } else { rounded }
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another canvas point
    pub fn distance_to(&self, other: &CanvasPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Integer pixel rectangle, right and bottom exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering a whole image
    pub fn from_size(columns: u32, rows: u32) -> Self {
        Self::new(0, 0, columns as i64, rows as i64)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, x: i64, y: i64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Conversion between image space and canvas space for one display surface
pub trait CanvasTransform {
    fn image_to_canvas(&self, point: ImagePoint) -> CanvasPoint;
    fn canvas_to_image(&self, point: CanvasPoint) -> ImagePoint;
}

/// Zoom and pan: `canvas = image * scale + offset`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }
}

impl CanvasTransform for Viewport {
    fn image_to_canvas(&self, point: ImagePoint) -> CanvasPoint {
        CanvasPoint {
            x: point.x * self.scale + self.offset_x,
            y: point.y * self.scale + self.offset_y,
        }
    }

    fn canvas_to_image(&self, point: CanvasPoint) -> ImagePoint {
        ImagePoint {
            x: (point.x - self.offset_x) / self.scale,
            y: (point.y - self.offset_y) / self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_rounds_half_up() {
        assert_eq!(ImagePoint::new(10.4, 10.5).to_pixel(), (10, 11));
        assert_eq!(ImagePoint::new(-0.5, -0.4).to_pixel(), (0, 0));
        assert_eq!(ImagePoint::new(-0.6, 511.6).to_pixel(), (-1, 512));
        assert_eq!(ImagePoint::new(-2.5, 2.5).to_pixel(), (-2, 3));
    }

    #[test]
    fn test_to_pixel_just_below_half_rounds_down() {
        let below_half = 0.49999999999999994;
        assert_eq!(ImagePoint::new(below_half, -below_half).to_pixel(), (0, 0));
        assert_eq!(ImagePoint::new(4503599627370495.5, 0.0).to_pixel().0, 4503599627370496);
    }

    #[test]
    fn test_rect_contains_point_is_right_exclusive() {
        let rect = Rect::from_size(512, 256);
        assert!(rect.contains_point(0, 0));
        assert!(rect.contains_point(511, 255));
        assert!(!rect.contains_point(512, 0));
        assert!(!rect.contains_point(0, 256));
        assert!(!rect.contains_point(-1, 3));
    }

    #[test]
    fn test_rect_intersect() {
        let image = Rect::from_size(4, 4);
        assert_eq!(
            image.intersect(Rect::new(3, 3, 6, 6)),
            Some(Rect::new(3, 3, 4, 4))
        );
        assert_eq!(image.intersect(Rect::new(4, 0, 5, 1)), None);
    }

    #[test]
    fn test_viewport_round_trip() {
        let viewport = Viewport::new(2.5, -40.0, 12.0);
        let image = ImagePoint::new(100.0, 37.25);
        let canvas = viewport.image_to_canvas(image);
        assert_eq!(canvas, CanvasPoint::new(210.0, 105.125));
        assert_eq!(viewport.canvas_to_image(canvas), image);
    }

    #[test]
    fn test_distance() {
        let a = CanvasPoint::new(0.0, 0.0);
        let b = CanvasPoint::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
