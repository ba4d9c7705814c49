use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::error::EngineError;
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget, TargetFormats, Viewport};
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle and metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width as f32, size.height as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a frame, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then submits and presents.
    ///
    /// Transient surface errors skip the frame. An error returned by `draw` is
    /// propagated and nothing is presented.
    pub fn render<F>(&mut self, draw: F) -> Result<AppControl, EngineError>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> Result<(), EngineError>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err.clone());
                log::debug!("surface error: {err}, {action:?}");
                if action == SurfaceErrorAction::Fatal {
                    return Err(EngineError::Gpu(format!("surface lost: {err}")));
                }
                return Ok(AppControl::Continue);
            }
        };

        let formats = TargetFormats {
            color: self.gpu.surface_format(),
            depth: self.gpu.depth_format(),
            sample_count: self.gpu.sample_count(),
        };
        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            formats,
            self.window.viewport(),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(
                &mut frame.encoder,
                &frame.view,
                frame.msaa_view.as_ref(),
                &frame.depth_view,
            );
            draw(&rctx, &mut target)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
