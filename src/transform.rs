//! Coordinate transform between viewport pixels and the function domain.

use tracing::debug;

use crate::error::{Axis, PlotError, Result};
use crate::geom::{PixelPoint, Point};

/// Default scale in pixels per domain unit.
pub const DEFAULT_UNIT: f64 = 50.0;

/// Smallest unit a zoom step may produce.
pub const MIN_ZOOM_UNIT: f64 = 1e-6;

/// Largest unit a zoom step may produce.
pub const MAX_ZOOM_UNIT: f64 = 1e9;

/// Which axes a zoom step rescales.
///
/// Exactly one mode is active per step; modifiers never combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomAxes {
    /// Scale both axes.
    #[default]
    Both,
    /// Scale only the X axis.
    XOnly,
    /// Scale only the Y axis.
    YOnly,
}

impl ZoomAxes {
    fn scales_x(self) -> bool {
        matches!(self, Self::Both | Self::XOnly)
    }

    fn scales_y(self) -> bool {
        matches!(self, Self::Both | Self::YOnly)
    }
}

/// Direction of a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Magnify: more pixels per unit.
    In,
    /// Shrink: fewer pixels per unit.
    Out,
}

impl ZoomDirection {
    /// Multiplicative factor applied to a unit for one step.
    pub fn factor(self) -> f64 {
        match self {
            Self::In => std::f64::consts::SQRT_2,
            Self::Out => std::f64::consts::FRAC_1_SQRT_2,
        }
    }
}

/// Affine map between pixel and domain space.
///
/// The domain origin sits at pixel `(x_offset, y_offset)`, and one domain
/// unit spans `x_unit` / `y_unit` pixels. Screen Y grows downwards while
/// domain Y grows upwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    x_unit: f64,
    y_unit: f64,
    x_offset: i32,
    y_offset: i32,
    width: i32,
    height: i32,
}

impl ViewTransform {
    /// Create a transform for a viewport with the origin at its center.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            x_unit: DEFAULT_UNIT,
            y_unit: DEFAULT_UNIT,
            x_offset: width / 2,
            y_offset: height / 2,
            width,
            height,
        }
    }

    /// Create a centered transform with a custom initial unit on both axes.
    pub fn with_unit(width: i32, height: i32, unit: f64) -> Result<Self> {
        let mut transform = Self::new(width, height);
        transform.set_units(unit, unit)?;
        Ok(transform)
    }

    /// Pixels per domain unit along X.
    pub fn x_unit(&self) -> f64 {
        self.x_unit
    }

    /// Pixels per domain unit along Y.
    pub fn y_unit(&self) -> f64 {
        self.y_unit
    }

    /// Pixel column of the domain origin.
    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    /// Pixel row of the domain origin.
    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Pixel position of the domain origin.
    pub fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.to_x_pixel(0.0), self.to_y_pixel(0.0))
    }

    /// Replace both units, rejecting non-positive or non-finite values.
    ///
    /// On error the transform is left untouched.
    pub fn set_units(&mut self, x_unit: f64, y_unit: f64) -> Result<()> {
        validate_unit(Axis::X, x_unit)?;
        validate_unit(Axis::Y, y_unit)?;
        self.x_unit = x_unit;
        self.y_unit = y_unit;
        Ok(())
    }

    /// Map a domain X value to the nearest pixel column.
    pub fn to_x_pixel(&self, x: f64) -> i32 {
        round_to_pixel(self.x_unit * x).saturating_add(self.x_offset)
    }

    /// Map a pixel column to its exact domain X value.
    pub fn from_x_pixel(&self, px: i32) -> f64 {
        (f64::from(px) - f64::from(self.x_offset)) / self.x_unit
    }

    /// Map a domain Y value to the nearest pixel row.
    pub fn to_y_pixel(&self, y: f64) -> i32 {
        round_to_pixel(self.y_unit * -y + f64::from(self.y_offset))
    }

    /// Map a pixel row to its exact domain Y value.
    pub fn from_y_pixel(&self, py: i32) -> f64 {
        (f64::from(self.y_offset) - f64::from(py)) / self.y_unit
    }

    /// Map a pixel position to domain coordinates.
    pub fn to_domain(&self, pixel: PixelPoint) -> Point {
        Point::new(self.from_x_pixel(pixel.x), self.from_y_pixel(pixel.y))
    }

    /// Map a domain point to the nearest pixel position.
    pub fn to_pixel(&self, point: Point) -> PixelPoint {
        PixelPoint::new(self.to_x_pixel(point.x), self.to_y_pixel(point.y))
    }

    /// Shift the origin by a pixel delta. The view is never clamped.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.x_offset = self.x_offset.saturating_add(dx);
        self.y_offset = self.y_offset.saturating_add(dy);
    }

    /// Zoom one step about a cursor pixel.
    ///
    /// The domain point under `(cursor_x, cursor_y)` stays under the cursor,
    /// up to integer rounding of the offsets. A step that would move a
    /// rescaled unit outside `[MIN_ZOOM_UNIT, MAX_ZOOM_UNIT]` is ignored and
    /// returns `false`.
    pub fn zoom(
        &mut self,
        direction: ZoomDirection,
        axes: ZoomAxes,
        cursor_x: i32,
        cursor_y: i32,
    ) -> bool {
        let step = direction.factor();
        let x_scale = if axes.scales_x() { step } else { 1.0 };
        let y_scale = if axes.scales_y() { step } else { 1.0 };

        let x_unit = self.x_unit * x_scale;
        let y_unit = self.y_unit * y_scale;
        let in_range = |unit: f64| (MIN_ZOOM_UNIT..=MAX_ZOOM_UNIT).contains(&unit);
        if (axes.scales_x() && !in_range(x_unit)) || (axes.scales_y() && !in_range(y_unit)) {
            debug!(
                ?direction,
                ?axes,
                x_unit = self.x_unit,
                y_unit = self.y_unit,
                "zoom limit reached"
            );
            return false;
        }

        self.x_unit = x_unit;
        self.y_unit = y_unit;

        self.x_offset = fix_point_offset(cursor_x, self.x_offset, x_scale);
        self.y_offset = fix_point_offset(cursor_y, self.y_offset, y_scale);

        debug!(
            ?direction,
            ?axes,
            x_unit = self.x_unit,
            y_unit = self.y_unit,
            x_offset = self.x_offset,
            y_offset = self.y_offset,
            "zoomed view"
        );
        true
    }

    /// Adopt a new viewport size, keeping the origin anchored relative to
    /// the viewport center.
    pub fn resize(&mut self, width: i32, height: i32) {
        let dx = (f64::from(width) - f64::from(self.width)) / 2.0;
        let dy = (f64::from(height) - f64::from(self.height)) / 2.0;
        self.x_offset = (f64::from(self.x_offset) + dx) as i32;
        self.y_offset = (f64::from(self.y_offset) + dy) as i32;
        self.width = width;
        self.height = height;
        debug!(
            width,
            height,
            x_offset = self.x_offset,
            y_offset = self.y_offset,
            "resized view"
        );
    }

    /// Move the origin back to the viewport center. Units are kept.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.x_offset = width / 2;
        self.y_offset = height / 2;
        debug!(x_offset = self.x_offset, y_offset = self.y_offset, "reset view");
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

fn validate_unit(axis: Axis, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlotError::invalid_unit(axis, value))
    }
}

/// Round half up, so `-2.5` lands on `-2`.
pub(crate) fn round_to_pixel(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn fix_point_offset(cursor: i32, offset: i32, scale: f64) -> i32 {
    let cursor = f64::from(cursor);
    round_to_pixel(cursor - scale * (cursor - f64::from(offset)))
}
