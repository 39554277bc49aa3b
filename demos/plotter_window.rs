use std::sync::Arc;

use gpui::prelude::*;
use gpui::{
    AppContext, Application, Bounds, ClickEvent, Entity, Stateful, WindowBounds, WindowOptions,
    div, px, rgb, size,
};
use tracing_subscriber::EnvFilter;

use funcplot::{GpuiPlotterView, Plotter, SmoothNoise, from_fn, smoothstep};

struct DemoWindow {
    plotter: Entity<GpuiPlotterView>,
}

impl gpui::Render for DemoWindow {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        let on_clear = cx.listener(|this, _: &ClickEvent, _, cx| {
            this.plotter.update(cx, |view, cx| view.clear_plots(cx));
        });
        let on_add = cx.listener(|this, _: &ClickEvent, _, cx| {
            this.plotter.update(cx, |view, cx| {
                view.add_plot(Arc::new(SmoothNoise::new()), cx);
            });
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap_2()
                    .p_2()
                    .bg(rgb(0xececec))
                    .child(button("clear-plots", "Clear Plots").on_click(on_clear))
                    .child(button("add-noise", "Add Noise Function").on_click(on_add)),
            )
            .child(div().flex_1().child(self.plotter.clone()))
    }
}

fn button(id: &'static str, label: &'static str) -> Stateful<gpui::Div> {
    div()
        .id(id)
        .px_3()
        .py_1()
        .border_1()
        .border_color(rgb(0x9a9a9a))
        .bg(rgb(0xfafafa))
        .text_sm()
        .cursor_pointer()
        .child(label)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    Application::new().run(|cx| {
        let bounds = Bounds::centered(None, size(px(800.0), px(840.0)), cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        };

        let opened = cx.open_window(options, |_window, cx| {
            let mut plotter = Plotter::new();
            let ramp = from_fn(|x| 0.75 + smoothstep(x) * (0.25 - 0.75));
            let _ = plotter.plot(Arc::new(ramp));
            let view = cx.new(|_| GpuiPlotterView::new(plotter));
            cx.new(|_| DemoWindow { plotter: view })
        });
        if let Err(err) = opened {
            tracing::error!(%err, "failed to open plotter window");
            cx.quit();
        }
    });
}
