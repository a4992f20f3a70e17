/// GPU setup options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// Swap behavior. FIFO is available everywhere and caps the frame rate at
    /// the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Alpha compositing preference; ignored when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform and backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::LowPower,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
