//! Rendering primitives and the drawing-surface seam.
//!
//! Frames are described as a [`RenderList`] of backend-agnostic commands.
//! Backends (such as the GPUI backend) implement [`Surface`] and replay the
//! list with [`RenderList::paint`].

mod frame;

pub use frame::build_frame;

use crate::function::MarkerKind;
use crate::geom::ScreenPoint;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl LineStyle {
    /// A one pixel stroke in the given color.
    pub fn hairline(color: Color) -> Self {
        Self { color, width: 1.0 }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::hairline(Color::BLACK)
    }
}

/// Text styling. Text is always drawn in a monospaced face.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
        }
    }
}

/// A single drawing step.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Set the antialiasing preference for the rest of the frame.
    Antialias(bool),
    /// Draw a straight line segment.
    Line {
        /// Segment start.
        start: ScreenPoint,
        /// Segment end.
        end: ScreenPoint,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Draw a connected polyline, optionally filled.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<ScreenPoint>,
        /// Stroke (or fill) styling.
        style: LineStyle,
        /// Fill the closed shape instead of stroking it.
        filled: bool,
    },
    /// Draw a circle marker.
    Circle {
        /// Circle center.
        center: ScreenPoint,
        /// Radius in pixels.
        radius: f32,
        /// Marker color.
        color: Color,
        /// Filled or outlined.
        kind: MarkerKind,
    },
    /// Draw monospaced text with its baseline starting at `position`.
    Text {
        /// Baseline origin.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Styling.
        style: TextStyle,
    },
}

/// Drawing primitives a backend must provide.
pub trait Surface {
    /// Request (or drop) antialiased drawing.
    fn set_antialias(&mut self, enabled: bool);
    /// Stroke a straight segment.
    fn line(&mut self, start: ScreenPoint, end: ScreenPoint, style: LineStyle);
    /// Draw a filled or outlined circle.
    fn circle(&mut self, center: ScreenPoint, radius: f32, color: Color, kind: MarkerKind);
    /// Stroke or fill a polyline.
    fn polyline(&mut self, points: &[ScreenPoint], style: LineStyle, filled: bool);
    /// Draw monospaced text with its baseline at `position`.
    fn text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle);
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Whether no commands were recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replay the commands onto a surface.
    ///
    /// A missing surface (not yet created by the host) is a no-op.
    pub fn paint<S: Surface + ?Sized>(&self, surface: Option<&mut S>) {
        let Some(surface) = surface else {
            return;
        };
        for command in &self.commands {
            match command {
                RenderCommand::Antialias(enabled) => surface.set_antialias(*enabled),
                RenderCommand::Line { start, end, style } => surface.line(*start, *end, *style),
                RenderCommand::Polyline {
                    points,
                    style,
                    filled,
                } => surface.polyline(points, *style, *filled),
                RenderCommand::Circle {
                    center,
                    radius,
                    color,
                    kind,
                } => surface.circle(*center, *radius, *color, *kind),
                RenderCommand::Text {
                    position,
                    text,
                    style,
                } => surface.text(*position, text, style),
            }
        }
    }
}
