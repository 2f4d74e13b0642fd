//! Drawing-surface sizing.

/// Device-pixel extent for a logical size at the given pixel density.
///
/// Each axis is computed independently as `max(1, floor(logical * scale))`,
/// so the result is never zero even for a zero logical size.
pub fn physical_extent(logical_width: f64, logical_height: f64, scale: f64) -> (u32, u32) {
    let physical = |logical: f64| (logical * scale).floor().max(1.0) as u32;
    (physical(logical_width), physical(logical_height))
}

/// Window surface plus its current swapchain configuration.
///
/// The configuration is mutated only through [`SurfaceState::resize`], and
/// only when the physical size actually changed.
pub struct SurfaceState {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl SurfaceState {
    /// Configure the surface for the given physical size, preferring an sRGB
    /// swapchain format.
    pub fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Self {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(device, &config);

        Self { surface, config }
    }

    /// Reconfigure the swapchain to a new physical size.
    ///
    /// A size equal to the current configuration performs no mutation, so
    /// redundant resize events cause no swapchain churn. Returns whether a
    /// reconfigure happened.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.config.width && height == self.config.height {
            return false;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
        log::debug!("surface resized to {}x{}", width, height);
        true
    }

    /// Swapchain texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current physical size in device pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Acquire the next swapchain texture.
    pub fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
