//! GPUI integration for funcplot.
//!
//! This module provides a GPUI view that hosts a [`Plotter`](crate::plotter::Plotter),
//! forwards pointer, wheel, and resize events into it, and paints the
//! resulting render list.

mod paint;
mod view;

pub use view::{GpuiPlotterView, PlotterHandle};
