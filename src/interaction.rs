//! Pointer, wheel, and resize handling.
//!
//! The controller owns the [`ViewTransform`] and the tracked cursor. Hosts
//! forward raw events and repaint whenever a handler returns
//! [`Repaint::Needed`].

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::geom::PixelPoint;
use crate::plot::PlotSet;
use crate::transform::{ViewTransform, ZoomAxes, ZoomDirection};

/// Whether the host should schedule a repaint after an event.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    /// Visible state changed.
    Needed,
    /// Nothing visible changed.
    Skip,
}

impl Repaint {
    /// Check whether a repaint was requested.
    pub fn is_needed(self) -> bool {
        self == Self::Needed
    }
}

/// Pointer buttons the controller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left / primary button.
    Primary,
    /// Right / secondary button.
    Secondary,
    /// Middle or any other button.
    Other,
}

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key.
    pub control: bool,
    /// Shift key.
    pub shift: bool,
}

impl Modifiers {
    /// Axis mode selected by the modifiers: control wins over shift.
    pub fn zoom_axes(self) -> ZoomAxes {
        if self.control {
            ZoomAxes::XOnly
        } else if self.shift {
            ZoomAxes::YOnly
        } else {
            ZoomAxes::Both
        }
    }
}

/// Interaction state machine for one plot panel.
#[derive(Debug, Clone)]
pub struct InteractionController {
    transform: ViewTransform,
    cursor: PixelPoint,
    dragged: bool,
}

impl InteractionController {
    /// Create a controller around a transform, with the cursor at the
    /// domain origin.
    pub fn new(transform: ViewTransform) -> Self {
        let cursor = PixelPoint::new(transform.x_offset(), transform.y_offset());
        Self {
            transform,
            cursor,
            dragged: false,
        }
    }

    /// Access the view transform.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Access the view transform mutably.
    pub fn transform_mut(&mut self) -> &mut ViewTransform {
        &mut self.transform
    }

    /// Last known pointer position.
    pub fn cursor(&self) -> PixelPoint {
        self.cursor
    }

    /// A button went down: remember where.
    pub fn pointer_pressed(&mut self, position: PixelPoint) -> Repaint {
        self.cursor = position;
        self.dragged = false;
        Repaint::Skip
    }

    /// The pointer moved with a button held: pan by the delta.
    pub fn pointer_dragged(&mut self, position: PixelPoint) -> Repaint {
        let dx = position.x.saturating_sub(self.cursor.x);
        let dy = position.y.saturating_sub(self.cursor.y);
        self.cursor = position;
        self.dragged = true;
        self.transform.pan(dx, dy);
        Repaint::Needed
    }

    /// The pointer moved without a button: refresh the readout.
    pub fn pointer_moved(&mut self, position: PixelPoint) -> Repaint {
        self.cursor = position;
        Repaint::Needed
    }

    /// A button was released.
    ///
    /// Releases that end a drag do nothing. Otherwise a primary double click
    /// resets the view, and any other click writes one readout line per plot
    /// to `sink`.
    pub fn pointer_released<W: Write + ?Sized>(
        &mut self,
        button: PointerButton,
        click_count: usize,
        plots: &PlotSet,
        sink: &mut W,
    ) -> Result<Repaint> {
        if std::mem::take(&mut self.dragged) {
            return Ok(Repaint::Skip);
        }

        if click_count == 2 && button == PointerButton::Primary {
            let (width, height) = (self.transform.width(), self.transform.height());
            self.transform.reset(width, height);
            return Ok(Repaint::Needed);
        }

        self.write_readouts(plots, sink)?;
        Ok(Repaint::Skip)
    }

    /// Write `name(x) = y` for every plot at the cursor's domain X.
    pub fn write_readouts<W: Write + ?Sized>(&self, plots: &PlotSet, sink: &mut W) -> Result<()> {
        let x = self.transform.from_x_pixel(self.cursor.x);
        for readout in plots.readouts(x) {
            writeln!(sink, "{readout}")?;
        }
        Ok(())
    }

    /// The wheel turned at `position`.
    ///
    /// Only the sign of `rotation` matters: negative (away from the user)
    /// zooms in, positive zooms out, zero is ignored.
    pub fn wheel(&mut self, position: PixelPoint, rotation: f64, modifiers: Modifiers) -> Repaint {
        self.cursor = position;
        let direction = if rotation < 0.0 {
            ZoomDirection::In
        } else if rotation > 0.0 {
            ZoomDirection::Out
        } else {
            return Repaint::Skip;
        };
        // The cursor moved even when the zoom limit rejects the step.
        let axes = modifiers.zoom_axes();
        let _ = self.transform.zoom(direction, axes, position.x, position.y);
        Repaint::Needed
    }

    /// The viewport changed size.
    pub fn resized(&mut self, width: i32, height: i32) -> Repaint {
        if width == self.transform.width() && height == self.transform.height() {
            return Repaint::Skip;
        }
        self.transform.resize(width, height);
        Repaint::Needed
    }

    /// Recenter the view, as a primary double click does.
    pub fn reset(&mut self) -> Repaint {
        let (width, height) = (self.transform.width(), self.transform.height());
        self.transform.reset(width, height);
        debug!("view reset requested");
        Repaint::Needed
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ViewTransform::default())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;
    use std::sync::Arc;

    use super::*;
    use crate::function::from_fn;
    use crate::render::Color;

    fn square_plots() -> PlotSet {
        let mut plots = PlotSet::new();
        plots.add(Arc::new(from_fn(|x| x * x)));
        plots.add_named(Arc::new(from_fn(|x| -x)), Color::BLACK, "neg");
        plots
    }

    fn release(
        controller: &mut InteractionController,
        button: PointerButton,
        clicks: usize,
        plots: &PlotSet,
    ) -> (Repaint, String) {
        let mut out = Vec::new();
        let repaint = controller
            .pointer_released(button, clicks, plots, &mut out)
            .expect("write to vec");
        (repaint, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn press_records_without_repaint() {
        let mut controller = InteractionController::default();
        assert_eq!(controller.cursor(), PixelPoint::new(400, 400));
        let repaint = controller.pointer_pressed(PixelPoint::new(10, 20));
        assert_eq!(repaint, Repaint::Skip);
        assert_eq!(controller.cursor(), PixelPoint::new(10, 20));
        assert_eq!(controller.transform().origin(), PixelPoint::new(400, 400));
    }

    #[test]
    fn drag_pans_by_delta() {
        let mut controller = InteractionController::default();
        let _ = controller.pointer_pressed(PixelPoint::new(100, 100));
        let first = controller.pointer_dragged(PixelPoint::new(130, 90));
        let second = controller.pointer_dragged(PixelPoint::new(140, 95));
        assert!(first.is_needed() && second.is_needed());
        assert_eq!(controller.transform().origin(), PixelPoint::new(440, 395));
        assert_eq!(controller.cursor(), PixelPoint::new(140, 95));
    }

    #[test]
    fn move_updates_cursor_only() {
        let mut controller = InteractionController::default();
        let repaint = controller.pointer_moved(PixelPoint::new(5, 6));
        assert!(repaint.is_needed());
        assert_eq!(controller.cursor(), PixelPoint::new(5, 6));
        assert_eq!(controller.transform().origin(), PixelPoint::new(400, 400));
    }

    #[test]
    fn click_writes_readouts() {
        let mut controller = InteractionController::default();
        let plots = square_plots();
        let _ = controller.pointer_pressed(PixelPoint::new(475, 10));
        let (repaint, text) = release(&mut controller, PointerButton::Primary, 1, &plots);
        assert_eq!(repaint, Repaint::Skip);
        assert_eq!(text, "f1(1.50) = 2.25\nneg(1.50) = -1.50\n");
    }

    #[test]
    fn release_after_drag_is_not_a_click() {
        let mut controller = InteractionController::default();
        let plots = square_plots();
        let _ = controller.pointer_pressed(PixelPoint::new(0, 0));
        let _ = controller.pointer_dragged(PixelPoint::new(3, 3));
        let (repaint, text) = release(&mut controller, PointerButton::Primary, 1, &plots);
        assert_eq!(repaint, Repaint::Skip);
        assert!(text.is_empty());
    }

    #[test]
    fn primary_double_click_resets() {
        let mut controller = InteractionController::default();
        let plots = square_plots();
        let _ = controller.pointer_pressed(PixelPoint::new(0, 0));
        let _ = controller.pointer_dragged(PixelPoint::new(50, -20));
        let _ = release(&mut controller, PointerButton::Primary, 1, &plots);

        let _ = controller.pointer_pressed(PixelPoint::new(50, -20));
        let (repaint, text) = release(&mut controller, PointerButton::Primary, 2, &plots);
        assert!(repaint.is_needed());
        assert!(text.is_empty());
        assert_eq!(controller.transform().origin(), PixelPoint::new(400, 400));
    }

    #[test]
    fn secondary_double_click_prints() {
        let mut controller = InteractionController::default();
        let plots = square_plots();
        let _ = controller.pointer_pressed(PixelPoint::new(400, 0));
        let (repaint, text) = release(&mut controller, PointerButton::Secondary, 2, &plots);
        assert_eq!(repaint, Repaint::Skip);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn wheel_sign_selects_direction() {
        let mut controller = InteractionController::default();
        let center = PixelPoint::new(400, 400);
        let plain = Modifiers::default();

        assert!(controller.wheel(center, -3.0, plain).is_needed());
        let x_unit = controller.transform().x_unit();
        assert!((x_unit - 50.0 * SQRT_2).abs() < 1e-9);

        let _ = controller.wheel(center, 127.0, plain);
        assert!((controller.transform().x_unit() - 50.0).abs() < 1e-9);

        let corner = PixelPoint::new(1, 1);
        assert_eq!(controller.wheel(corner, 0.0, plain), Repaint::Skip);
        assert_eq!(controller.cursor(), corner);
    }

    #[test]
    fn wheel_at_zoom_limit_still_tracks_cursor() {
        let mut controller = InteractionController::default();
        let plain = Modifiers::default();
        for _ in 0..200 {
            let _ = controller.wheel(PixelPoint::new(400, 400), 1.0, plain);
        }
        let x_unit = controller.transform().x_unit();
        assert!(x_unit.is_finite() && x_unit > 0.0);

        let corner = PixelPoint::new(20, 30);
        assert!(controller.wheel(corner, 1.0, plain).is_needed());
        assert_eq!(controller.cursor(), corner);
        assert_eq!(controller.transform().x_unit(), x_unit);
    }

    #[test]
    fn modifiers_are_mutually_exclusive() {
        let both = Modifiers {
            control: true,
            shift: true,
        };
        let shift = Modifiers {
            control: false,
            shift: true,
        };
        assert_eq!(both.zoom_axes(), ZoomAxes::XOnly);
        assert_eq!(shift.zoom_axes(), ZoomAxes::YOnly);
        assert_eq!(Modifiers::default().zoom_axes(), ZoomAxes::Both);

        let mut controller = InteractionController::default();
        let _ = controller.wheel(PixelPoint::new(100, 100), -1.0, both);
        assert_eq!(controller.transform().y_unit(), 50.0);
        assert!(controller.transform().x_unit() > 50.0);
    }

    #[test]
    fn wheel_keeps_point_under_cursor() {
        let mut controller = InteractionController::default();
        let cursor = PixelPoint::new(613, 187);
        let before = controller.transform().to_domain(cursor);
        let _ = controller.wheel(cursor, -1.0, Modifiers::default());
        let after = controller.transform().to_domain(cursor);
        let tolerance = 0.5 / controller.transform().x_unit();
        assert!((after.x - before.x).abs() <= tolerance);
        assert!((after.y - before.y).abs() <= tolerance);
    }

    #[test]
    fn resize_repaints_only_on_change() {
        let mut controller = InteractionController::default();
        assert_eq!(controller.resized(800, 800), Repaint::Skip);
        assert!(controller.resized(900, 700).is_needed());
        assert_eq!(controller.transform().origin(), PixelPoint::new(450, 350));
    }

    #[test]
    fn failed_sink_surfaces_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let controller = InteractionController::default();
        let result = controller.write_readouts(&square_plots(), &mut Broken);
        assert!(matches!(result, Err(crate::error::PlotError::Readout(_))));
    }
}
