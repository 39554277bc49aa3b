//! Error types for the plotter core.

use thiserror::Error;

/// Result type alias for plotter operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Axis selector used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors that can occur while driving a plotter.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A unit (pixels per domain unit) was not a positive finite number.
    #[error("{axis} unit must be positive and finite, got {value}")]
    InvalidUnit {
        /// Axis the unit belongs to.
        axis: Axis,
        /// Rejected value.
        value: f64,
    },

    /// A noise control range was empty, inverted, or not finite.
    #[error("invalid noise control range [{low}, {high}]")]
    InvalidNoiseRange {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// Writing a click readout failed.
    #[error("failed to write readout: {0}")]
    Readout(#[from] std::io::Error),
}

impl PlotError {
    /// Create an `InvalidUnit` error.
    pub fn invalid_unit(axis: Axis, value: f64) -> Self {
        Self::InvalidUnit { axis, value }
    }

    /// Create an `InvalidNoiseRange` error.
    pub fn invalid_noise_range(low: f64, high: f64) -> Self {
        Self::InvalidNoiseRange { low, high }
    }
}
