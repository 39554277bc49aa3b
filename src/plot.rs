//! Plotted functions and the hand-off queue for adding them off-thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::function::PlotFunction;
use crate::render::Color;

/// Colors assigned round-robin to plots added without an explicit color.
pub const PALETTE: [Color; 4] = [
    Color::rgb8(0, 0, 255),
    Color::rgb8(206, 140, 101),
    Color::rgb8(255, 0, 0),
    Color::rgb8(64, 128, 64),
];

/// A function drawn by the plotter.
#[derive(Clone)]
pub struct PlotEntry {
    function: Arc<dyn PlotFunction>,
    name: String,
    color: Color,
}

impl PlotEntry {
    /// Create an entry.
    pub fn new(function: Arc<dyn PlotFunction>, name: impl Into<String>, color: Color) -> Self {
        Self {
            function,
            name: name.into(),
            color,
        }
    }

    /// The plotted function.
    pub fn function(&self) -> &dyn PlotFunction {
        self.function.as_ref()
    }

    /// Display name used in readouts.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Curve and marker color.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl std::fmt::Debug for PlotEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlotEntry")
            .field("name", &self.name)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Value of one plot at a domain X, as reported by a click.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// Plot name.
    pub name: String,
    /// Domain input.
    pub x: f64,
    /// Function value.
    pub y: f64,
}

impl std::fmt::Display for Readout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:.2}) = {:.2}", self.name, self.x, self.y)
    }
}

/// Ordered set of plots. Insertion order is draw order.
#[derive(Debug, Clone, Default)]
pub struct PlotSet {
    entries: Vec<PlotEntry>,
}

impl PlotSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function with the next palette color and a `f<n>` name.
    pub fn add(&mut self, function: Arc<dyn PlotFunction>) {
        let color = self.next_color();
        self.add_with_color(function, color);
    }

    /// Add a function with an explicit color and a `f<n>` name.
    pub fn add_with_color(&mut self, function: Arc<dyn PlotFunction>, color: Color) {
        let name = format!("f{}", self.entries.len() + 1);
        self.add_named(function, color, name);
    }

    /// Add a function with an explicit color and name.
    pub fn add_named(
        &mut self,
        function: Arc<dyn PlotFunction>,
        color: Color,
        name: impl Into<String>,
    ) {
        let entry = PlotEntry::new(function, name, color);
        debug!(
            name = entry.name(),
            index = self.entries.len(),
            "added plot"
        );
        self.entries.push(entry);
    }

    /// Remove every plot.
    pub fn clear(&mut self) {
        debug!(removed = self.entries.len(), "cleared plots");
        self.entries.clear();
    }

    /// Access all plots in draw order.
    pub fn entries(&self) -> &[PlotEntry] {
        &self.entries
    }

    /// Number of plots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every plot at `x`.
    pub fn readouts(&self, x: f64) -> Vec<Readout> {
        self.entries
            .iter()
            .map(|entry| Readout {
                name: entry.name.clone(),
                x,
                y: entry.function.evaluate(x),
            })
            .collect()
    }

    fn next_color(&self) -> Color {
        PALETTE[self.entries.len() % PALETTE.len()]
    }
}

/// A mutation waiting to be applied to a [`PlotSet`] on the UI thread.
#[derive(Clone)]
pub enum PlotCommand {
    /// Add with the palette color and default name.
    Add(Arc<dyn PlotFunction>),
    /// Add with an explicit color and name.
    AddNamed {
        /// Function to plot.
        function: Arc<dyn PlotFunction>,
        /// Curve color.
        color: Color,
        /// Display name.
        name: String,
    },
    /// Remove every plot.
    Clear,
}

impl std::fmt::Debug for PlotCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add(_) => f.write_str("Add"),
            Self::AddNamed { name, color, .. } => f
                .debug_struct("AddNamed")
                .field("name", name)
                .field("color", color)
                .finish_non_exhaustive(),
            Self::Clear => f.write_str("Clear"),
        }
    }
}

/// Cloneable handle for queuing plot changes from any thread.
///
/// Commands are applied in order at the start of the next frame, on the
/// thread that owns the [`PlotSet`].
#[derive(Debug, Clone, Default)]
pub struct PlotQueue {
    pending: Arc<Mutex<Vec<PlotCommand>>>,
}

impl PlotQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command.
    pub fn push(&self, command: PlotCommand) {
        self.lock().push(command);
    }

    /// Queue a function with default color and name.
    pub fn add(&self, function: Arc<dyn PlotFunction>) {
        self.push(PlotCommand::Add(function));
    }

    /// Queue removal of every plot.
    pub fn clear(&self) {
        self.push(PlotCommand::Clear);
    }

    /// Whether commands are waiting.
    pub fn has_pending(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Apply all pending commands to `plots`. Returns how many were applied.
    pub fn drain_into(&self, plots: &mut PlotSet) -> usize {
        let commands = std::mem::take(&mut *self.lock());
        let applied = commands.len();
        for command in commands {
            match command {
                PlotCommand::Add(function) => plots.add(function),
                PlotCommand::AddNamed {
                    function,
                    color,
                    name,
                } => plots.add_named(function, color, name),
                PlotCommand::Clear => plots.clear(),
            }
        }
        if applied > 0 {
            debug!(applied, "applied queued plot commands");
        }
        applied
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PlotCommand>> {
        // Commands are pushed whole, so a poisoned list is still valid.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
