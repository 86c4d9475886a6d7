//! Coordinate spaces and conversion
//!
//! Platform touch input arrives in pixel space: origin at the top-left
//! corner, y growing downward, units in device pixels. Engine events use
//! window space: the window spans `[-1, 1]` on both axes with y growing
//! upward, so the same gesture maps to the same window-space path on any
//! resolution.

/// A point in either coordinate space
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate (always 0 for touch input)
    pub z: f32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Size of a window in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct WindowSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WindowSize {
    /// Create a new window size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Convert a pixel-space point to window space for a window of `size`
///
/// A zero dimension is treated as one pixel so the result stays finite.
pub fn pixel_to_window(point: Point, size: WindowSize) -> Point {
    let width = size.width.max(1) as f32;
    let height = size.height.max(1) as f32;
    Point {
        x: 2.0 * point.x / width - 1.0,
        y: 1.0 - 2.0 * point.y / height,
        z: point.z,
    }
}

/// Convert a window-space point back to pixel space for a window of `size`
pub fn window_to_pixel(point: Point, size: WindowSize) -> Point {
    let width = size.width.max(1) as f32;
    let height = size.height.max(1) as f32;
    Point {
        x: (point.x + 1.0) * width / 2.0,
        y: (1.0 - point.y) * height / 2.0,
        z: point.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_and_center() {
        let size = WindowSize::new(800, 600);
        assert_eq!(
            pixel_to_window(Point::new(0.0, 0.0, 0.0), size),
            Point::new(-1.0, 1.0, 0.0)
        );
        assert_eq!(
            pixel_to_window(Point::new(800.0, 600.0, 0.0), size),
            Point::new(1.0, -1.0, 0.0)
        );
        assert_eq!(
            pixel_to_window(Point::new(400.0, 300.0, 0.0), size),
            Point::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let size = WindowSize::new(1080, 1920);
        let p = Point::new(100.0, 200.0, 0.0);
        let first = pixel_to_window(p, size);
        let _other = pixel_to_window(Point::new(5.0, 5.0, 0.0), size);
        assert_eq!(pixel_to_window(p, size), first);
    }

    #[test]
    fn test_resolution_independent() {
        let small = pixel_to_window(Point::new(50.0, 25.0, 0.0), WindowSize::new(100, 100));
        let large = pixel_to_window(Point::new(500.0, 250.0, 0.0), WindowSize::new(1000, 1000));
        assert_eq!(small, large);
    }

    #[test]
    fn test_zero_size_stays_finite() {
        let p = pixel_to_window(Point::new(3.0, 4.0, 0.0), WindowSize::new(0, 0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_window_to_pixel_inverts() {
        let size = WindowSize::new(640, 480);
        let p = Point::new(160.0, 120.0, 0.0);
        assert_eq!(window_to_pixel(pixel_to_window(p, size), size), p);
    }
}
