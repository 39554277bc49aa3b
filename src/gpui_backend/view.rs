use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use gpui::prelude::*;
use gpui::{
    AsyncApp, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point,
    ScrollWheelEvent, Timer, WeakEntity, Window, canvas, div, px,
};
use tracing::warn;

use crate::function::PlotFunction;
use crate::geom::{PixelPoint, ScreenPoint};
use crate::interaction::{Modifiers, PointerButton, Repaint};
use crate::plot::PlotQueue;
use crate::plotter::Plotter;
use crate::render::Color;

use super::paint::{PlotterFrame, paint_frame, to_hsla};

/// Height of one wheel "line" when GPUI reports line deltas.
const SCROLL_LINE_HEIGHT: f32 = 16.0;

/// How often the view checks for plots queued from other threads.
const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Where the canvas sits inside the window, captured at prepaint.
#[derive(Debug, Clone, Copy, Default)]
struct CanvasPlacement {
    origin: ScreenPoint,
}

/// A GPUI view that hosts a [`Plotter`].
///
/// Dragging pans, the wheel zooms about the pointer (control: X only,
/// shift: Y only), a primary double click recenters, and single clicks print
/// every plot's value under the pointer to standard output.
#[derive(Clone)]
pub struct GpuiPlotterView {
    plotter: Arc<RwLock<Plotter>>,
    placement: Arc<RwLock<CanvasPlacement>>,
    watching_queue: bool,
}

impl GpuiPlotterView {
    /// Create a view around a plotter.
    pub fn new(plotter: Plotter) -> Self {
        Self {
            plotter: Arc::new(RwLock::new(plotter)),
            placement: Arc::new(RwLock::new(CanvasPlacement::default())),
            watching_queue: false,
        }
    }

    /// Get a handle for inspecting or mutating the plotter.
    pub fn plotter_handle(&self) -> PlotterHandle {
        PlotterHandle {
            plotter: Arc::clone(&self.plotter),
        }
    }

    /// Add a function and repaint.
    pub fn add_plot(&mut self, function: Arc<dyn PlotFunction>, cx: &mut Context<Self>) {
        let repaint = write(&self.plotter).plot(function);
        notify_if(repaint, cx);
    }

    /// Remove every plot and repaint.
    pub fn clear_plots(&mut self, cx: &mut Context<Self>) {
        let repaint = write(&self.plotter).clear_plots();
        notify_if(repaint, cx);
    }

    /// Repaint whenever another thread queues plot changes.
    fn watch_queue(&mut self, cx: &mut Context<Self>) {
        if self.watching_queue {
            return;
        }
        self.watching_queue = true;
        cx.spawn(move |this: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut cx = cx.clone();
            async move {
                loop {
                    Timer::after(QUEUE_POLL_INTERVAL).await;
                    let polled = this.update(&mut cx, |view, cx| {
                        let repaint = read(&view.plotter).poll_queue();
                        notify_if(repaint, cx);
                    });
                    if polled.is_err() {
                        break;
                    }
                }
            }
        })
        .detach();
    }

    fn local_point(&self, position: Point<Pixels>) -> PixelPoint {
        let origin = read(&self.placement).origin;
        PixelPoint::new(
            (f32::from(position.x) - origin.x).round() as i32,
            (f32::from(position.y) - origin.y).round() as i32,
        )
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let pos = self.local_point(ev.position);
        let repaint = write(&self.plotter).pointer_pressed(pos);
        notify_if(repaint, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = self.local_point(ev.position);
        let mut plotter = write(&self.plotter);
        let repaint = if ev.pressed_button.is_some() {
            plotter.pointer_dragged(pos)
        } else {
            plotter.pointer_moved(pos)
        };
        drop(plotter);
        notify_if(repaint, cx);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let button = match ev.button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            _ => PointerButton::Other,
        };
        let clicks = ev.click_count;
        let mut stdout = std::io::stdout().lock();
        let mut plotter = write(&self.plotter);
        let result = plotter.pointer_released(button, clicks, &mut stdout);
        drop(plotter);
        match result {
            Ok(repaint) => notify_if(repaint, cx),
            Err(err) => warn!(%err, "click readout failed"),
        }
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let pos = self.local_point(ev.position);
        let delta = ev.delta.pixel_delta(px(SCROLL_LINE_HEIGHT));
        // GPUI reports scrolling away from the user as positive Y.
        let rotation = -f64::from(f32::from(delta.y));
        let modifiers = Modifiers {
            control: ev.modifiers.control,
            shift: ev.modifiers.shift,
        };
        let repaint = write(&self.plotter).wheel(pos, rotation, modifiers);
        notify_if(repaint, cx);
    }
}

impl Render for GpuiPlotterView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.watch_queue(cx);
        let plotter = Arc::clone(&self.plotter);
        let placement = Arc::clone(&self.placement);

        div()
            .size_full()
            .bg(to_hsla(Color::WHITE))
            .child(
                canvas(
                    move |bounds, _window, _cx| {
                        let origin = ScreenPoint::new(
                            f32::from(bounds.origin.x),
                            f32::from(bounds.origin.y),
                        );
                        write(&placement).origin = origin;

                        let mut plotter = write(&plotter);
                        let width = f32::from(bounds.size.width).round() as i32;
                        let height = f32::from(bounds.size.height).round() as i32;
                        // Already painting this frame; the repaint hint is moot.
                        let _ = plotter.resized(width, height);
                        PlotterFrame {
                            render: plotter.build_frame(),
                            origin,
                        }
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_down(
                MouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_down(
                MouseButton::Middle,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Middle,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
    }
}

/// A handle for a [`Plotter`] held inside a `GpuiPlotterView`.
///
/// The handle clones cheaply. Direct access is for the UI thread; other
/// threads should go through [`PlotterHandle::queue`]. The view picks up
/// queued changes and repaints on its own.
#[derive(Clone)]
pub struct PlotterHandle {
    plotter: Arc<RwLock<Plotter>>,
}

impl PlotterHandle {
    /// Read the plotter state.
    ///
    /// The plotter is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Plotter) -> R) -> R {
        f(&read(&self.plotter))
    }

    /// Mutate the plotter state.
    ///
    /// The plotter is locked for the duration of the callback. Call
    /// `notify` on the owning view afterwards to repaint.
    pub fn write<R>(&self, f: impl FnOnce(&mut Plotter) -> R) -> R {
        f(&mut write(&self.plotter))
    }

    /// Queue for adding plots from background threads.
    pub fn queue(&self) -> PlotQueue {
        read(&self.plotter).queue()
    }
}

fn notify_if(repaint: Repaint, cx: &mut Context<GpuiPlotterView>) {
    if repaint.is_needed() {
        cx.notify();
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
