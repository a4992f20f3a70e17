//! GPU types and helpers shared by the renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) alpha, as produced by 8-bit RGBA surfaces.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1) as f32, viewport.height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

pub(super) fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}

pub(super) fn viewport_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: viewport_ubo_min_binding_size(),
            },
            count: None,
        }],
    })
}

pub(super) fn write_viewport_uniform(ctx: &RenderCtx<'_>, ubo: &wgpu::Buffer) {
    ctx.queue
        .write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── color encoding ────────────────────────────────────────────────────────

/// Converts an sRGB-encoded color into what the shader should output for
/// a target of the given encoding.
pub(super) fn encode_for_target(color: [f32; 4], linear_output: bool) -> [f32; 4] {
    if linear_output {
        let [r, g, b, a] = color;
        Color::new(r, g, b, a).linearized().to_array()
    } else {
        color
    }
}

/// Texture format holding 8-bit RGBA surfaces, decoded on sample when the
/// target is sRGB so blending happens in the same space as the polygons.
pub(super) fn surface_texture_format(linear_output: bool) -> wgpu::TextureFormat {
    if linear_output {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
        assert!(viewport_ubo_min_binding_size().is_some());
    }

    #[test]
    fn zero_viewport_is_clamped() {
        let u = ViewportUniform::new(Viewport::new(0, 0));
        assert_eq!(u.viewport, [1.0, 1.0]);
    }

    #[test]
    fn encoding_keeps_endpoints() {
        let [r, g, _, a] = encode_for_target([1.0, 0.0, 1.0, 0.5], true);
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert_eq!(a, 0.5);
        let mid = encode_for_target([0.5, 0.5, 0.5, 1.0], true);
        assert!(mid[0] < 0.5);
        assert_eq!(encode_for_target([0.5, 0.5, 0.5, 1.0], false)[0], 0.5);
    }
}
