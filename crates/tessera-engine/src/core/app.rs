use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Driven by [`crate::window::Runtime`] once per redraw.
///
/// Window lifecycle events (close, resize, scale changes) are handled by the
/// runtime itself.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
