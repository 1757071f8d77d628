//! Pixel-space geometry used when projecting rows onto the screen.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl CellMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(&self, origin: PixelPoint) -> Self {
        Self::new(self.x + origin.x, self.y + origin.y)
    }
}

/// Screen rectangle in device pixels, laid out the way accessibility
/// clients consume bounding rectangles: left, top, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Flatten into the `[left, top, width, height]` quadruple layout.
    pub fn to_array(self) -> [f64; 4] {
        [self.left, self.top, self.width, self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_flattens_in_client_order() {
        let r = PixelRect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn point_offsets_by_origin() {
        let p = PixelPoint::new(10.0, 20.0).offset_by(PixelPoint::new(100.0, 200.0));
        assert_eq!(p, PixelPoint::new(110.0, 220.0));
    }
}
