use crate::render::RenderTarget;

/// One acquired swapchain image plus the encoder recording into it.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) promptly; while it is
/// alive no further image can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Borrows the encoder and color view as a render target.
    pub fn target(&mut self) -> RenderTarget<'_> {
        RenderTarget::new(&mut self.encoder, &self.view)
    }
}
