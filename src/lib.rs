//! funcplot is an interactive function plotter core with an optional GPUI
//! backend.
//!
//! A [`Plotter`] keeps a pannable, zoomable [`ViewTransform`] between pixel
//! space and the function domain, samples every plotted [`PlotFunction`]
//! once per pixel column, and lets functions annotate their own curves
//! through an [`AnnotationProvider`]. [`SmoothNoise`] is a memoizing noise
//! function that marks the control points it has generated.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod function;
pub mod geom;
pub mod interaction;
pub mod noise;
pub mod plot;
pub mod plotter;
pub mod render;
pub mod transform;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use config::PlotterConfig;
pub use error::{Axis, PlotError, Result};
pub use function::{
    Annotation, AnnotationProvider, FnFunction, MarkerKind, PlotFunction, from_fn, smoothstep,
};
pub use geom::{PixelPoint, Point, ScreenPoint};
pub use interaction::{InteractionController, Modifiers, PointerButton, Repaint};
pub use noise::{NoiseConfig, NoiseScale, SmoothNoise};
pub use plot::{PALETTE, PlotCommand, PlotEntry, PlotQueue, PlotSet, Readout};
pub use plotter::Plotter;
pub use render::{Color, LineStyle, RenderCommand, RenderList, Surface, TextStyle, build_frame};
pub use transform::{ViewTransform, ZoomAxes, ZoomDirection};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiPlotterView, PlotterHandle};
