/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or `None` for a minimized or degenerate surface.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }
}

/// Formats and sample count shared by every attachment of a pass. Pipelines
/// are built against it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetFormats {
    pub color: wgpu::TextureFormat,
    pub depth: wgpu::TextureFormat,
    pub sample_count: u32,
}

/// Renderer-facing context (device/queue + target formats + viewport).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub formats: TargetFormats,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        formats: TargetFormats,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            formats,
            viewport,
        }
    }
}

/// Target for drawing (encoder + color and depth views).
///
/// `resolve_view` is set when `color_view` is multisampled; the pass resolves
/// into it.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub resolve_view: Option<&'a wgpu::TextureView>,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    /// Draws into `msaa_view` resolved into `surface_view` when present,
    /// otherwise straight into `surface_view`.
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        surface_view: &'a wgpu::TextureView,
        msaa_view: Option<&'a wgpu::TextureView>,
        depth_view: &'a wgpu::TextureView,
    ) -> Self {
        let (color_view, resolve_view) = attachment_views(surface_view, msaa_view);
        Self {
            encoder,
            color_view,
            resolve_view,
            depth_view,
        }
    }
}

fn attachment_views<'a, V>(surface: &'a V, msaa: Option<&'a V>) -> (&'a V, Option<&'a V>) {
    match msaa {
        Some(msaa) => (msaa, Some(surface)),
        None => (surface, None),
    }
}
