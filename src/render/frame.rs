use tracing::trace;

use crate::config::PlotterConfig;
use crate::geom::{PixelPoint, ScreenPoint};
use crate::plot::{PlotEntry, PlotSet};
use crate::transform::{ViewTransform, round_to_pixel};

use super::{Color, LineStyle, RenderCommand, RenderList, TextStyle};

/// Tick marks are skipped when units are denser than this many pixels.
const MIN_TICK_SPACING: f64 = 1.0;

/// Build the draw sequence for one frame.
///
/// Order: diagnostics, X axis and ticks, Y axis and ticks, then every plot
/// in insertion order with its annotation markers drawn over its curve.
/// A viewport without area produces an empty list.
pub fn build_frame(
    transform: &ViewTransform,
    plots: &PlotSet,
    cursor: PixelPoint,
    config: &PlotterConfig,
) -> RenderList {
    let mut render = RenderList::new();
    if transform.width() <= 0 || transform.height() <= 0 {
        return render;
    }

    render.push(RenderCommand::Antialias(true));

    if config.show_diagnostics {
        build_diagnostics(&mut render, transform, cursor, config);
    }
    build_axes(&mut render, transform, config);

    for entry in plots.entries() {
        build_curve(&mut render, transform, entry, config);
        build_annotations(&mut render, transform, entry, config);
    }

    trace!(
        commands = render.commands().len(),
        plots = plots.len(),
        "built frame"
    );
    render
}

fn build_diagnostics(
    render: &mut RenderList,
    transform: &ViewTransform,
    cursor: PixelPoint,
    config: &PlotterConfig,
) {
    let origin = transform.origin();
    let lines = [
        format!("xUnit: {:.2} px", transform.x_unit()),
        format!("yUnit: {:.2} px", transform.y_unit()),
        format!("xOffset: {} px", transform.x_offset()),
        format!("yOffset: {} px", transform.y_offset()),
        format!("Origin: ({}, {}) px", origin.x, origin.y),
        format!(
            "MouseX: {:4} px -> {:6.2}",
            cursor.x,
            transform.from_x_pixel(cursor.x)
        ),
        format!(
            "MouseY: {:4} px -> {:6.2}",
            cursor.y,
            transform.from_y_pixel(cursor.y)
        ),
    ];

    let style = TextStyle {
        color: Color::BLACK,
        size: config.font_size,
    };
    let mut baseline = 0;
    for text in lines {
        baseline += config.line_height;
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(config.text_left as f32, baseline as f32),
            text,
            style: style.clone(),
        });
    }
}

fn build_axes(render: &mut RenderList, transform: &ViewTransform, config: &PlotterConfig) {
    let style = LineStyle::default();
    let origin = transform.origin();
    let (x0, y0) = (origin.x as f32, origin.y as f32);
    let tick = config.tick_half_length as f32;

    render.push(line(0.0, y0, transform.width() as f32, y0, style));
    for tx in tick_positions(origin.x, transform.x_unit(), transform.width()) {
        render.push(line(tx, y0 - tick, tx, y0 + tick, style));
    }

    render.push(line(x0, 0.0, x0, transform.height() as f32, style));
    for ty in tick_positions(origin.y, transform.y_unit(), transform.height()) {
        render.push(line(x0 - tick, ty, x0 + tick, ty, style));
    }
}

/// Tick coordinates along one axis, phase-aligned with the origin.
fn tick_positions(origin: i32, unit: f64, extent: i32) -> impl Iterator<Item = f32> {
    let phase = f64::from(origin) % unit;
    let last = if unit >= MIN_TICK_SPACING {
        (f64::from(extent) / unit + 1.0).floor() as i64
    } else {
        -1
    };
    (0..=last).map(move |i| round_to_pixel(phase + i as f64 * unit) as f32)
}

fn build_curve(
    render: &mut RenderList,
    transform: &ViewTransform,
    entry: &PlotEntry,
    config: &PlotterConfig,
) {
    let style = LineStyle::hairline(entry.color());
    let function = entry.function();
    let width = transform.width();
    let columns = (0..width)
        .step_by(config.stride() as usize)
        .chain(std::iter::once(width));

    let mut points = Vec::new();
    for px in columns {
        let value = function.evaluate(transform.from_x_pixel(px));
        if value.is_finite() {
            points.push(ScreenPoint::new(
                px as f32,
                transform.to_y_pixel(value) as f32,
            ));
        } else {
            flush_polyline(render, &mut points, style);
        }
    }
    flush_polyline(render, &mut points, style);
}

fn flush_polyline(render: &mut RenderList, points: &mut Vec<ScreenPoint>, style: LineStyle) {
    if points.len() >= 2 {
        render.push(RenderCommand::Polyline {
            points: std::mem::take(points),
            style,
            filled: false,
        });
    } else {
        points.clear();
    }
}

fn build_annotations(
    render: &mut RenderList,
    transform: &ViewTransform,
    entry: &PlotEntry,
    config: &PlotterConfig,
) {
    let function = entry.function();
    let Some(provider) = function.annotation_provider() else {
        return;
    };

    let radius = config.marker_radius;
    let min_x = transform.from_x_pixel(-radius);
    let max_x = transform.from_x_pixel(transform.width() - 1 + radius);

    for annotation in provider.annotations(min_x, max_x) {
        let y = function.evaluate(annotation.x);
        if !y.is_finite() {
            continue;
        }
        render.push(RenderCommand::Circle {
            center: ScreenPoint::new(
                transform.to_x_pixel(annotation.x) as f32,
                transform.to_y_pixel(y) as f32,
            ),
            radius: radius as f32,
            color: entry.color(),
            kind: annotation.kind,
        });
    }
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32, style: LineStyle) -> RenderCommand {
    RenderCommand::Line {
        start: ScreenPoint::new(x1, y1),
        end: ScreenPoint::new(x2, y2),
        style,
    }
}
