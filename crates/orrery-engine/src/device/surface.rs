use winit::dpi::PhysicalSize;

/// What the caller should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering resumes next frame.
    Reconfigured,
    SkipFrame,
    /// Out of memory. Terminate.
    Fatal,
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        if let Some(f) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        log::info!("present mode {requested:?} unsupported; using Fifo");
        wgpu::PresentMode::Fifo
    }
}

/// Picks the MSAA sample count for a colour/depth format pair.
///
/// `requested` is used only when both formats can be multisampled at that
/// count and the colour format can be resolved; otherwise rendering is single
/// sampled.
pub(crate) fn choose_sample_count(
    requested: u32,
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    if requested <= 1 {
        return 1;
    }

    let supported = color.sample_count_supported(requested)
        && depth.sample_count_supported(requested)
        && color.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE);

    if supported {
        requested
    } else {
        log::info!("{requested}x MSAA unsupported for the surface formats; single sampling");
        1
    }
}

fn attachment_texture(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub(crate) fn create_depth_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    sample_count: u32,
) -> wgpu::TextureView {
    attachment_texture(device, "orrery depth", format, size, sample_count)
}

/// Multisampled colour target resolved into the surface texture. `None` when
/// single sampling.
pub(crate) fn create_msaa_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    (sample_count > 1)
        .then(|| attachment_texture(device, "orrery msaa color", format, size, sample_count))
}

/// Applies a new drawable size. Returns `false` for a zero-area size, in which
/// case the surface is left unconfigured until a usable size arrives.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        present_modes: Vec<wgpu::PresentMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes,
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn prefers_first_srgb_format() {
        let c = caps(
            vec![
                wgpu::TextureFormat::Bgra8Unorm,
                wgpu::TextureFormat::Bgra8UnormSrgb,
                wgpu::TextureFormat::Rgba8UnormSrgb,
            ],
            vec![wgpu::PresentMode::Fifo],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
        assert_eq!(choose_surface_format(&caps(vec![], vec![]), true), None);
    }

    #[test]
    fn immediate_falls_back_to_fifo() {
        let vsync_only = caps(vec![], vec![wgpu::PresentMode::Fifo]);
        assert_eq!(
            choose_present_mode(&vsync_only, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );

        let both = caps(vec![], vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate]);
        assert_eq!(
            choose_present_mode(&both, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Immediate
        );
    }

    #[test]
    fn unsupported_alpha_mode_uses_first_supported() {
        let c = caps(vec![], vec![]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn sample_count_kept_when_both_formats_support_it() {
        let color = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4
            | wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE;
        let depth = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4;
        assert_eq!(choose_sample_count(4, color, depth), 4);
    }

    #[test]
    fn sample_count_falls_back_to_one() {
        let x4 = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4;
        let resolvable = x4 | wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE;

        // Depth format cannot be multisampled.
        assert_eq!(choose_sample_count(4, resolvable, wgpu::TextureFormatFeatureFlags::empty()), 1);
        // Colour format cannot be resolved.
        assert_eq!(choose_sample_count(4, x4, x4), 1);
        // Count not offered at all.
        assert_eq!(choose_sample_count(8, resolvable, x4), 1);
    }

    #[test]
    fn single_sampling_needs_no_support() {
        let none = wgpu::TextureFormatFeatureFlags::empty();
        assert_eq!(choose_sample_count(1, none, none), 1);
        assert_eq!(choose_sample_count(0, none, none), 1);
    }
}
