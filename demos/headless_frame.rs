//! Drives a plotter without a window and prints the drawing calls.

use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use funcplot::{
    Color, LineStyle, MarkerKind, Modifiers, PixelPoint, Plotter, PointerButton, ScreenPoint,
    SmoothNoise, Surface, TextStyle, from_fn, smoothstep,
};

/// Prints a one-line summary per drawing call.
struct PrintingSurface<W: Write> {
    out: W,
}

impl<W: Write> Surface for PrintingSurface<W> {
    fn set_antialias(&mut self, enabled: bool) {
        let _ = writeln!(self.out, "antialias {enabled}");
    }

    fn line(&mut self, start: ScreenPoint, end: ScreenPoint, _style: LineStyle) {
        let _ = writeln!(
            self.out,
            "line ({}, {}) -> ({}, {})",
            start.x, start.y, end.x, end.y
        );
    }

    fn circle(&mut self, center: ScreenPoint, radius: f32, _color: Color, kind: MarkerKind) {
        let _ = writeln!(
            self.out,
            "circle {kind:?} at ({}, {}) r={radius}",
            center.x, center.y
        );
    }

    fn polyline(&mut self, points: &[ScreenPoint], style: LineStyle, _filled: bool) {
        let _ = writeln!(
            self.out,
            "polyline of {} points in {:?}",
            points.len(),
            style.color
        );
    }

    fn text(&mut self, position: ScreenPoint, text: &str, _style: &TextStyle) {
        let _ = writeln!(self.out, "text at ({}, {}): {text}", position.x, position.y);
    }
}

fn main() -> funcplot::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut plotter = Plotter::new();
    let ramp = from_fn(|x| 0.75 + smoothstep(x) * (0.25 - 0.75));
    let _ = plotter.plot(Arc::new(ramp));
    plotter.queue().add(Arc::new(SmoothNoise::seeded(7)));

    let _ = plotter.pointer_pressed(PixelPoint::new(400, 400));
    let _ = plotter.pointer_dragged(PixelPoint::new(460, 380));
    let mut discard = std::io::sink();
    let _ = plotter.pointer_released(PointerButton::Primary, 1, &mut discard)?;
    let _ = plotter.wheel(PixelPoint::new(460, 380), -1.0, Modifiers::default());

    let render = plotter.build_frame();
    let stdout = std::io::stdout();
    let mut surface = PrintingSurface { out: stdout.lock() };
    render.paint(Some(&mut surface));

    let _ = plotter.pointer_moved(PixelPoint::new(500, 380));
    let _ = plotter.pointer_pressed(PixelPoint::new(500, 380));
    let out = &mut surface.out;
    let _ = plotter.pointer_released(PointerButton::Primary, 1, out)?;
    Ok(())
}
