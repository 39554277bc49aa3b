//! Geometric primitives shared by the transform and the renderer.
//!
//! [`Point`] lives in the function domain, [`PixelPoint`] addresses integer
//! viewport pixels, and [`ScreenPoint`] carries the float coordinates handed
//! to drawing surfaces.

/// A point in function-domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in domain units.
    pub x: f64,
    /// Y value in domain units.
    pub y: f64,
}

impl Point {
    /// Create a new domain point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An integer pixel position inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A point in screen space as consumed by drawing surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<PixelPoint> for ScreenPoint {
    fn from(point: PixelPoint) -> Self {
        Self::new(point.x as f32, point.y as f32)
    }
}
