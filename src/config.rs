//! Plotter configuration.

/// Configuration for a [`Plotter`](crate::plotter::Plotter).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    /// Initial viewport width in pixels.
    pub width: i32,
    /// Initial viewport height in pixels.
    pub height: i32,
    /// Initial scale in pixels per domain unit, on both axes.
    pub unit: f64,
    /// Radius of annotation markers in pixels.
    pub marker_radius: i32,
    /// Half length of axis tick marks in pixels.
    pub tick_half_length: i32,
    /// Sample every Nth pixel column when drawing curves.
    pub sample_stride: i32,
    /// Draw the transform/cursor diagnostics in the top-left corner.
    pub show_diagnostics: bool,
    /// Left edge of the diagnostics block.
    pub text_left: i32,
    /// Baseline distance between diagnostic lines.
    pub line_height: i32,
    /// Diagnostic font size in pixels.
    pub font_size: f32,
}

impl PlotterConfig {
    /// Effective sampling stride, at least one column.
    pub fn stride(&self) -> i32 {
        self.sample_stride.max(1)
    }
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            unit: crate::transform::DEFAULT_UNIT,
            marker_radius: 3,
            tick_half_length: 4,
            sample_stride: 1,
            show_diagnostics: true,
            text_left: 12,
            line_height: 16,
            font_size: 12.0,
        }
    }
}
