//! Pointer geometry reported by the host.

use serde::{Deserialize, Serialize};

/// A pointer position in host pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounding box in host pixels, as reported by the host for the element
/// under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Position of `point` as percentages of this box, clamped to 0..=100.
    /// A degenerate axis maps to its center.
    pub fn to_percent(&self, point: Point) -> (f64, f64) {
        (
            axis_percent(point.x - self.left, self.width),
            axis_percent(point.y - self.top, self.height),
        )
    }
}

fn axis_percent(offset: f64, extent: f64) -> f64 {
    if extent <= 0.0 || !extent.is_finite() || !offset.is_finite() {
        return 50.0;
    }
    (offset / extent * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_percent() {
        let rect = Rect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(rect.to_percent(Point::new(200.0, 100.0)), (25.0, 25.0));
        assert_eq!(rect.to_percent(Point::new(700.0, 0.0)), (100.0, 0.0));
    }

    #[test]
    fn test_degenerate_rect_maps_to_center() {
        let rect = Rect::new(0.0, 0.0, 0.0, 100.0);
        assert_eq!(rect.to_percent(Point::new(10.0, 10.0)), (50.0, 10.0));
    }
}
