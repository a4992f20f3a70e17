use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::PixelRect;
use crate::paint::Surface;
use crate::render::overlay::OverlayEntry;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    alpha_blend, surface_texture_format, viewport_bind_group_layout, write_viewport_uniform,
    QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES,
};

/// An uploaded surface, ready to be drawn by [`TextureRenderer`].
///
/// Dropping it releases the GPU texture.
pub struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl GpuTexture {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Debug for GpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Renderer for overlay blits.
///
/// Each surface becomes its own texture and bind group; all entries of a
/// queue share one instance buffer and are drawn in queue order.
#[derive(Default)]
pub struct TextureRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    // layouts (format independent)
    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    // bindings
    viewport_bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    // geometry
    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl TextureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `surface` into a new GPU texture.
    ///
    /// Returns `None` for zero-sized surfaces and surfaces larger than the
    /// device allows.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, surface: &Surface) -> Option<GpuTexture> {
        if surface.is_empty() {
            log::debug!("skipping upload of empty {}x{} surface", surface.width(), surface.height());
            return None;
        }
        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        if surface.width() > max_dim || surface.height() > max_dim {
            log::warn!(
                "surface {}x{} exceeds the device texture limit of {max_dim}, not drawn",
                surface.width(),
                surface.height()
            );
            return None;
        }

        self.ensure_layouts(ctx);
        let bgl = self.texture_bgl.as_ref()?;
        let sampler = self.sampler.as_ref()?;

        let size = wgpu::Extent3d {
            width: surface.width(),
            height: surface.height(),
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("simview overlay texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: surface_texture_format(ctx.linear_output()),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            surface.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * surface.width()),
                rows_per_image: Some(surface.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("simview overlay texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Some(GpuTexture {
            _texture: texture,
            bind_group,
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Draws each `(label, entries)` queue in its own pass, queues in order and
    /// entries in order, each texture stretched over its destination.
    ///
    /// Instances for all queues share one buffer upload; each pass draws from
    /// its own range of it.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        queues: &[(&str, &[OverlayEntry<GpuTexture>])],
    ) {
        let (instances, firsts) = blit_instances(queues.iter().map(|(_, entries)| *entries));
        if instances.is_empty() {
            return;
        }

        self.ensure_layouts(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(ubo) = self.viewport_ubo.as_ref() else { return; };
        write_viewport_uniform(ctx, ubo);

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return; };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline)   = self.pipeline.as_ref()            else { return; };
        let Some(viewport)   = self.viewport_bind_group.as_ref() else { return; };
        let Some(quad_vbo)   = self.quad_vbo.as_ref()            else { return; };
        let Some(quad_ibo)   = self.quad_ibo.as_ref()            else { return; };

        for (&(label, entries), first) in queues.iter().zip(firsts) {
            if entries.is_empty() {
                continue;
            }

            let mut rpass = target.load_pass(label);
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, viewport, &[]);
            rpass.set_vertex_buffer(0, quad_vbo.slice(..));
            rpass.set_vertex_buffer(1, instance_vbo.slice(..));
            rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

            for (i, entry) in entries.iter().enumerate() {
                if entry.dest.normalized().is_empty() {
                    continue;
                }
                let i = first + i as u32;
                rpass.set_bind_group(1, &entry.resource.bind_group, &[]);
                rpass.draw_indexed(0..6, 0, i..i + 1);
            }
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bgl.is_none() {
            self.viewport_bgl = Some(viewport_bind_group_layout(ctx.device, "simview overlay viewport bgl"));
        }

        if self.texture_bgl.is_none() {
            self.texture_bgl = Some(ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("simview overlay texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            }));
        }

        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("simview overlay sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(viewport_bgl) = self.viewport_bgl.as_ref() else { return; };
        let Some(texture_bgl)  = self.texture_bgl.as_ref()  else { return; };

        log::debug!("building overlay pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("simview overlay shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/texture.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("simview overlay pipeline layout"),
            bind_group_layouts: &[viewport_bgl, texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("simview overlay pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), BlitInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return; };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("simview overlay viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("simview overlay viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("simview overlay quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("simview overlay quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap  = required.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<BlitInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("simview overlay instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (16 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct BlitInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
}

impl BlitInstance {
    fn covering(dest: PixelRect) -> Self {
        let r = dest.normalized();
        Self {
            dst_min: [r.x as f32, r.y as f32],
            dst_max: [
                (i64::from(r.x) + i64::from(r.w)) as f32,
                (i64::from(r.y) + i64::from(r.h)) as f32,
            ],
        }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2  // dst_max
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlitInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Concatenates the instances of every queue, returning the index of each
/// queue's first instance.
fn blit_instances<'a, T: 'a>(
    queues: impl IntoIterator<Item = &'a [OverlayEntry<T>]>,
) -> (Vec<BlitInstance>, Vec<u32>) {
    let mut instances = Vec::new();
    let mut firsts = Vec::new();
    for entries in queues {
        firsts.push(instances.len() as u32);
        instances.extend(entries.iter().map(|e| BlitInstance::covering(e.dest)));
    }
    (instances, firsts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &'static str, dest: PixelRect) -> OverlayEntry<&'static str> {
        OverlayEntry { resource: name, dest }
    }

    #[test]
    fn queues_get_disjoint_instance_ranges() {
        let text = [entry("label", PixelRect::new(0, 0, 16, 16))];
        let images = [
            entry("crate", PixelRect::new(48, 0, 16, 16)),
            entry("ball", PixelRect::new(80, 8, 4, 4)),
        ];

        let (instances, firsts) = blit_instances([&text[..], &images[..]]);
        assert_eq!(firsts, [0, 1]);
        assert_eq!(instances.len(), 3);

        // Text keeps its own rect when images are queued after it.
        assert_eq!(instances[firsts[0] as usize].dst_min, [0.0, 0.0]);
        assert_eq!(instances[firsts[0] as usize].dst_max, [16.0, 16.0]);
        assert_eq!(instances[firsts[1] as usize].dst_min, [48.0, 0.0]);
        assert_eq!(instances[firsts[1] as usize + 1].dst_max, [84.0, 12.0]);
    }

    #[test]
    fn empty_queue_still_gets_an_offset() {
        let images = [entry("crate", PixelRect::new(1, 2, 3, 4))];
        let (instances, firsts) = blit_instances([&[][..], &images[..]]);
        assert_eq!(firsts, [0, 0]);
        assert_eq!(instances.len(), 1);
    }

    #[test]
    fn negative_extent_is_normalized() {
        let inst = BlitInstance::covering(PixelRect::new(10, 10, -4, -2));
        assert_eq!(inst.dst_min, [6.0, 8.0]);
        assert_eq!(inst.dst_max, [10.0, 10.0]);
    }
}
