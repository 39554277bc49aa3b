//! Backend-agnostic plotter: the object a host window talks to.

use std::io::Write;
use std::sync::Arc;

use crate::config::PlotterConfig;
use crate::error::Result;
use crate::function::PlotFunction;
use crate::geom::PixelPoint;
use crate::interaction::{InteractionController, Modifiers, PointerButton, Repaint};
use crate::plot::{PlotQueue, PlotSet};
use crate::render::{Color, RenderList, build_frame};
use crate::transform::ViewTransform;

/// Plot panel state: view, cursor, plots, and pending plot changes.
///
/// A `Plotter` belongs to the UI thread. Other threads add plots through
/// [`Plotter::queue`]; queued changes land at the start of the next frame.
#[derive(Debug)]
pub struct Plotter {
    controller: InteractionController,
    plots: PlotSet,
    queue: PlotQueue,
    config: PlotterConfig,
}

impl Plotter {
    /// Create a plotter with the default configuration.
    pub fn new() -> Self {
        let config = PlotterConfig::default();
        Self::from_parts(ViewTransform::new(config.width, config.height), config)
    }

    /// Create a plotter with a custom configuration.
    ///
    /// Fails if `config.unit` is not a positive finite number.
    pub fn with_config(config: PlotterConfig) -> Result<Self> {
        let transform = ViewTransform::with_unit(config.width, config.height, config.unit)?;
        Ok(Self::from_parts(transform, config))
    }

    fn from_parts(transform: ViewTransform, config: PlotterConfig) -> Self {
        Self {
            controller: InteractionController::new(transform),
            plots: PlotSet::new(),
            queue: PlotQueue::new(),
            config,
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    /// Access the view transform.
    pub fn transform(&self) -> &ViewTransform {
        self.controller.transform()
    }

    /// Access the interaction controller.
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Access the interaction controller mutably.
    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Access the plots.
    pub fn plots(&self) -> &PlotSet {
        &self.plots
    }

    /// Access the plots mutably.
    pub fn plots_mut(&mut self) -> &mut PlotSet {
        &mut self.plots
    }

    /// Handle for queuing plot changes from any thread.
    pub fn queue(&self) -> PlotQueue {
        self.queue.clone()
    }

    /// Report whether queued plot changes are waiting for a frame.
    ///
    /// Hosts poll this to repaint after other threads queue changes.
    pub fn poll_queue(&self) -> Repaint {
        if self.queue.has_pending() {
            Repaint::Needed
        } else {
            Repaint::Skip
        }
    }

    /// Add a function with the next palette color.
    pub fn plot(&mut self, function: Arc<dyn PlotFunction>) -> Repaint {
        self.plots.add(function);
        Repaint::Needed
    }

    /// Add a function with an explicit color and name.
    pub fn plot_named(
        &mut self,
        function: Arc<dyn PlotFunction>,
        color: Color,
        name: impl Into<String>,
    ) -> Repaint {
        self.plots.add_named(function, color, name);
        Repaint::Needed
    }

    /// Remove every plot.
    pub fn clear_plots(&mut self) -> Repaint {
        self.plots.clear();
        Repaint::Needed
    }

    /// Forward a button press.
    pub fn pointer_pressed(&mut self, position: PixelPoint) -> Repaint {
        self.controller.pointer_pressed(position)
    }

    /// Forward a drag.
    pub fn pointer_dragged(&mut self, position: PixelPoint) -> Repaint {
        self.controller.pointer_dragged(position)
    }

    /// Forward a plain pointer move.
    pub fn pointer_moved(&mut self, position: PixelPoint) -> Repaint {
        self.controller.pointer_moved(position)
    }

    /// Forward a button release; click readouts go to `sink`.
    pub fn pointer_released<W: Write + ?Sized>(
        &mut self,
        button: PointerButton,
        click_count: usize,
        sink: &mut W,
    ) -> Result<Repaint> {
        self.controller
            .pointer_released(button, click_count, &self.plots, sink)
    }

    /// Forward a wheel step.
    pub fn wheel(&mut self, position: PixelPoint, rotation: f64, modifiers: Modifiers) -> Repaint {
        self.controller.wheel(position, rotation, modifiers)
    }

    /// Forward a viewport size change.
    pub fn resized(&mut self, width: i32, height: i32) -> Repaint {
        self.controller.resized(width, height)
    }

    /// Apply queued plot changes, then describe the current frame.
    pub fn build_frame(&mut self) -> RenderList {
        self.queue.drain_into(&mut self.plots);
        build_frame(
            self.controller.transform(),
            &self.plots,
            self.controller.cursor(),
            &self.config,
        )
    }
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;
    use crate::function::{from_fn, smoothstep};
    use crate::noise::SmoothNoise;
    use crate::render::RenderCommand;

    fn curve_count(render: &RenderList) -> usize {
        render
            .commands()
            .iter()
            .filter(|command| matches!(command, RenderCommand::Polyline { .. }))
            .count()
    }

    #[test]
    fn rejects_invalid_unit() {
        let config = PlotterConfig {
            unit: 0.0,
            ..PlotterConfig::default()
        };
        assert!(matches!(
            Plotter::with_config(config),
            Err(PlotError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn custom_unit_and_size() {
        let config = PlotterConfig {
            width: 300,
            height: 200,
            unit: 25.0,
            ..PlotterConfig::default()
        };
        let plotter = Plotter::with_config(config).expect("valid config");
        assert_eq!(plotter.transform().origin(), PixelPoint::new(150, 100));
        assert_eq!(plotter.transform().x_unit(), 25.0);
    }

    #[test]
    fn queued_plots_appear_next_frame() {
        let mut plotter = Plotter::new();
        let queue = plotter.queue();
        queue.add(Arc::new(SmoothNoise::seeded(3)));
        assert!(plotter.plots().is_empty());

        let render = plotter.build_frame();
        assert_eq!(plotter.plots().len(), 1);
        assert_eq!(curve_count(&render), 1);

        queue.clear();
        let render = plotter.build_frame();
        assert!(plotter.plots().is_empty());
        assert_eq!(curve_count(&render), 0);
    }

    #[test]
    fn queued_plot_from_worker_requests_repaint() {
        let mut plotter = Plotter::new();
        assert!(!plotter.poll_queue().is_needed());

        let queue = plotter.queue();
        std::thread::spawn(move || queue.add(Arc::new(SmoothNoise::seeded(9))))
            .join()
            .expect("worker finished");
        assert!(plotter.poll_queue().is_needed());

        let _ = plotter.build_frame();
        assert_eq!(plotter.plots().len(), 1);
        assert!(!plotter.poll_queue().is_needed());
    }

    #[test]
    fn session_scenario() {
        let mut plotter = Plotter::new();
        let ramp = from_fn(|x| 0.75 + smoothstep(x) * (0.25 - 0.75));
        let _ = plotter.plot(Arc::new(ramp));
        let _ = plotter.plot(Arc::new(SmoothNoise::seeded(42)));

        let _ = plotter.pointer_pressed(PixelPoint::new(400, 400));
        let _ = plotter.pointer_dragged(PixelPoint::new(500, 350));
        let mut out = Vec::new();
        let _ = plotter
            .pointer_released(PointerButton::Primary, 1, &mut out)
            .expect("write to vec");
        assert!(out.is_empty());
        assert_eq!(plotter.transform().origin(), PixelPoint::new(500, 350));

        let before_x = plotter.transform().from_x_pixel(500);
        let before_y = plotter.transform().from_y_pixel(350);
        let fix = PixelPoint::new(500, 350);
        assert!(plotter.wheel(fix, -1.0, Modifiers::default()).is_needed());
        assert!((plotter.transform().x_unit() - 70.71).abs() < 0.01);
        assert_eq!(plotter.transform().from_x_pixel(500), before_x);
        assert_eq!(plotter.transform().from_y_pixel(350), before_y);

        let render = plotter.build_frame();
        assert_eq!(curve_count(&render), 2);

        let _ = plotter.pointer_pressed(PixelPoint::new(500, 350));
        let mut out = Vec::new();
        let _ = plotter
            .pointer_released(PointerButton::Primary, 1, &mut out)
            .expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("f1(0.00) = 0.75\nf2(0.00) = "));

        let _ = plotter.clear_plots();
        assert!(plotter.plots().is_empty());
    }
}
