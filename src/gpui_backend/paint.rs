use gpui::{
    App, BorderStyle, Bounds, Corners, Edges, PathBuilder, TextRun, Window, font, point, px, quad,
};

use crate::function::MarkerKind;
use crate::geom::ScreenPoint;
use crate::render::{Color, LineStyle, RenderList, Surface, TextStyle};

const MONOSPACE_FONT: &str = "monospace";

/// A render list positioned inside the window.
#[derive(Debug, Clone)]
pub(crate) struct PlotterFrame {
    pub(crate) render: RenderList,
    pub(crate) origin: ScreenPoint,
}

pub(crate) fn paint_frame(frame: &PlotterFrame, window: &mut Window, cx: &mut App) {
    let mut surface = GpuiSurface {
        window,
        cx,
        origin: frame.origin,
    };
    frame.render.paint(Some(&mut surface));
}

/// Paints render commands into a GPUI window, offset to the canvas origin.
struct GpuiSurface<'a> {
    window: &'a mut Window,
    cx: &'a mut App,
    origin: ScreenPoint,
}

impl GpuiSurface<'_> {
    fn at(&self, p: ScreenPoint) -> gpui::Point<gpui::Pixels> {
        point(px(self.origin.x + p.x), px(self.origin.y + p.y))
    }
}

impl Surface for GpuiSurface<'_> {
    // GPUI always antialiases paths.
    fn set_antialias(&mut self, _enabled: bool) {}

    fn line(&mut self, start: ScreenPoint, end: ScreenPoint, style: LineStyle) {
        let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
        builder.move_to(self.at(start));
        builder.line_to(self.at(end));
        if let Ok(path) = builder.build() {
            self.window.paint_path(path, to_rgba(style.color));
        }
    }

    fn circle(&mut self, center: ScreenPoint, radius: f32, color: Color, kind: MarkerKind) {
        let bounds = Bounds::from_corners(
            self.at(ScreenPoint::new(center.x - radius, center.y - radius)),
            self.at(ScreenPoint::new(center.x + radius, center.y + radius)),
        );
        let (fill, border) = match kind {
            MarkerKind::Filled => (color, 0.0),
            MarkerKind::Outlined => (Color::new(0.0, 0.0, 0.0, 0.0), 1.0),
        };
        self.window.paint_quad(quad(
            bounds,
            Corners::all(px(radius)),
            to_rgba(fill),
            Edges::all(px(border)),
            to_rgba(color),
            BorderStyle::default(),
        ));
    }

    fn polyline(&mut self, points: &[ScreenPoint], style: LineStyle, filled: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut builder = if filled {
            PathBuilder::fill()
        } else {
            PathBuilder::stroke(px(style.width.max(0.5)))
        };
        builder.move_to(self.at(*first));
        for p in rest {
            builder.line_to(self.at(*p));
        }
        if filled {
            builder.close();
        }
        if let Ok(path) = builder.build() {
            self.window.paint_path(path, to_rgba(style.color));
        }
    }

    fn text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            len: text.len(),
            font: font(MONOSPACE_FONT),
            color: to_hsla(style.color),
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let line: gpui::SharedString = text.to_string().into();
        let font_size = px(style.size);
        let text_system = self.window.text_system();
        let shaped = text_system.shape_line(line, font_size, &[run], None);
        let line_height = shaped.ascent + shaped.descent;
        // Commands carry the baseline; GPUI paints from the top of the line.
        let top = ScreenPoint::new(position.x, position.y - f32::from(shaped.ascent));
        let origin = self.at(top);
        if let Err(err) = shaped.paint(origin, line_height, self.window, self.cx) {
            tracing::warn!(%err, "failed to paint plot text");
        }
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}
