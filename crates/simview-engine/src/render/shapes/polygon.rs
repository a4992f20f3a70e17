use crate::render::batch::{PolyVertex, PolygonBatch};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    alpha_blend, encode_for_target, viewport_bind_group_layout, write_viewport_uniform,
    ViewportUniform,
};

/// Renderer for the per-frame polygon batch.
///
/// Draws one indexed triangle list. Vertex and index buffers grow to the
/// next power of two and are reused across frames.
#[derive(Default)]
pub struct PolygonRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    // geometry
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    // reusable upload buffer
    staged: Vec<PolyVertex>,
}

impl PolygonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, batch: &PolygonBatch) {
        if batch.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_capacity(ctx, batch.vertices().len(), batch.indices().len());

        let linear = ctx.linear_output();
        self.staged.clear();
        self.staged.extend(batch.vertices().iter().map(|v| PolyVertex {
            pos: v.pos,
            color: encode_for_target(v.color, linear),
        }));

        let Some(ubo) = self.viewport_ubo.as_ref() else { return; };
        write_viewport_uniform(ctx, ubo);

        let Some(vbo) = self.vbo.as_ref() else { return; };
        let Some(ibo) = self.ibo.as_ref() else { return; };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.staged));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(batch.indices()));

        let Some(pipeline)   = self.pipeline.as_ref()   else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };

        let vbo_bytes = std::mem::size_of_val(self.staged.as_slice()) as u64;
        let ibo_bytes = std::mem::size_of_val(batch.indices()) as u64;

        let mut rpass = target.load_pass("simview polygon pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..vbo_bytes));
        rpass.set_index_buffer(ibo.slice(..ibo_bytes), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..batch.indices().len() as u32, 0, 0..1);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        log::debug!("building polygon pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("simview polygon shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/polygon.wgsl").into()),
        });

        let bgl = viewport_bind_group_layout(ctx.device, "simview polygon bgl");

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("simview polygon pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("simview polygon pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PolyVertex::layout()],
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
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("simview polygon viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("simview polygon bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(256);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("simview polygon vbo"),
                size: (cap * std::mem::size_of::<PolyVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }
        if indices > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(768);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("simview polygon ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }
    }
}
