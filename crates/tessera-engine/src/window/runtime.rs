use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Settings for the window opened by [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Requests an app can make while handling a frame.
///
/// They take effect once `App::on_frame` returns.
#[derive(Default)]
pub struct RuntimeCtx {
    stops: Vec<Stop>,
}

impl RuntimeCtx {
    /// Ends the loop after the current frame.
    pub fn exit(&mut self) {
        self.stops.push(Stop::Exit);
    }

    /// Ends the loop after the current frame; [`Runtime::run`] returns `err`.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.stops.push(Stop::Fail(err));
    }
}

enum Stop {
    Exit,
    Fail(anyhow::Error),
}

/// Single-window event loop driving an [`App`].
pub struct Runtime;

impl Runtime {
    /// Opens a window and redraws it continuously until the window closes or
    /// the app stops the loop.
    ///
    /// Window and GPU creation errors, and the first error passed to
    /// [`RuntimeCtx::fail`], are returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create the event loop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            surface: None,
            outcome: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("event loop exited with an error")?;

        match driver.outcome {
            Some(Stop::Fail(err)) => Err(err),
            _ => Ok(()),
        }
    }
}

/// The window, the GPU context borrowing it, and its frame clock.
#[self_referencing]
struct WindowSurface {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    surface: Option<WindowSurface>,
    outcome: Option<Stop>,
}

impl<A: App> Driver<A> {
    fn open_window(&self, event_loop: &ActiveEventLoop) -> Result<WindowSurface> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        WindowSurfaceTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()
    }

    /// The first error wins; later ones are only logged.
    fn stop(&mut self, event_loop: &ActiveEventLoop, stop: Stop) {
        let failed = matches!(self.outcome, Some(Stop::Fail(_)));
        match stop {
            Stop::Fail(err) if failed => log::error!("additional runtime error: {err:#}"),
            Stop::Exit if self.outcome.is_some() => {}
            stop => self.outcome = Some(stop),
        }
        event_loop.exit();
    }

    /// `None` re-reads the window's inner size (scale factor changes).
    fn resize(&mut self, size: Option<PhysicalSize<u32>>) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let size = size.unwrap_or_else(|| surface.with_window(|w| w.inner_size()));
        surface.with_gpu_mut(|gpu| gpu.resize(size));
        surface.with_window(|w| w.request_redraw());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let mut runtime = RuntimeCtx::default();
        let app = &mut self.app;
        let control = surface.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            runtime.exit();
        }
        for stop in runtime.stops {
            self.stop(event_loop, stop);
        }
    }
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() || self.outcome.is_some() {
            return;
        }

        match self.open_window(event_loop) {
            Ok(surface) => {
                surface.with_window(|w| w.request_redraw());
                self.surface = Some(surface);
            }
            Err(e) => self.stop(event_loop, Stop::Fail(e.context("failed to open the window"))),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.outcome.is_some() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = &self.surface {
            surface.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.outcome.is_some() {
            event_loop.exit();
            return;
        }

        let ours = self
            .surface
            .as_ref()
            .is_some_and(|s| s.with_window(|w| w.id()) == window_id);
        if !ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.surface = None;
                self.stop(event_loop, Stop::Exit);
            }
            WindowEvent::Resized(size) => self.resize(Some(size)),
            WindowEvent::ScaleFactorChanged { .. } => self.resize(None),
            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_ctx_keeps_requests_in_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.fail(anyhow::anyhow!("device lost"));
        ctx.exit();

        assert_eq!(ctx.stops.len(), 2);
        assert!(matches!(&ctx.stops[0], Stop::Fail(e) if e.to_string() == "device lost"));
        assert!(matches!(ctx.stops[1], Stop::Exit));
    }

    #[test]
    fn default_config_opens_a_720p_window() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "tessera");
        assert_eq!(config.initial_size, LogicalSize::new(1280.0, 720.0));
    }
}
