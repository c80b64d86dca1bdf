use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::scene::DrawList;

use super::batch::{MeshVertex, Pipeline, PreparedScene, ShapeInstance};
use super::common::{
    create_pipeline, ensure_capacity, load_op, logical_clip_to_scissor, QuadVertex, ViewportUniform, QUAD_INDICES,
    QUAD_VERTICES,
};
use super::{RenderCtx, RenderTarget};

/// Renders a whole `DrawList` in one render pass.
///
/// Two pipelines share one viewport uniform:
/// - `shape`: instanced SDF quads for rects, ellipses and lines, with solid,
///   linear or radial paint and analytic antialiasing
/// - `mesh`: per-vertex colored triangles
///
/// Items are drawn strictly in paint order; consecutive items with the same
/// pipeline and clip rect share a draw call.
#[derive(Default)]
pub struct SceneRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    shape_pipeline: Option<wgpu::RenderPipeline>,
    mesh_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    shape_vbo: Option<wgpu::Buffer>,
    shape_capacity: usize,
    mesh_vbo: Option<wgpu::Buffer>,
    mesh_capacity: usize,

    prepared: PreparedScene,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `draw_list` into `target`, clearing to `clear` first when given.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        clear: Option<Color>,
    ) {
        self.ensure_pipelines(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        self.prepared.build(draw_list);
        if self.prepared.batches.is_empty() && clear.is_none() {
            return;
        }

        self.write_viewport_uniform(ctx);
        self.upload(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("deepwork scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: load_op(clear), store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (Some(shape_pipeline), Some(mesh_pipeline), Some(bind_group), Some(quad_vbo), Some(quad_ibo)) = (
            self.shape_pipeline.as_ref(),
            self.mesh_pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
        ) else {
            return;
        };

        rpass.set_bind_group(0, bind_group, &[]);
        let mut bound: Option<Pipeline> = None;

        for batch in &self.prepared.batches {
            let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(batch.clip, ctx.viewport, ctx.scale_factor)
            else {
                continue;
            };

            match batch.pipeline {
                Pipeline::Shape => {
                    let Some(shape_vbo) = self.shape_vbo.as_ref() else { continue };
                    if bound != Some(Pipeline::Shape) {
                        rpass.set_pipeline(shape_pipeline);
                        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
                        rpass.set_vertex_buffer(1, shape_vbo.slice(..));
                        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
                        bound = Some(Pipeline::Shape);
                    }
                    rpass.set_scissor_rect(sx, sy, sw, sh);
                    rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, batch.range.clone());
                }
                Pipeline::Mesh => {
                    let Some(mesh_vbo) = self.mesh_vbo.as_ref() else { continue };
                    if bound != Some(Pipeline::Mesh) {
                        rpass.set_pipeline(mesh_pipeline);
                        rpass.set_vertex_buffer(0, mesh_vbo.slice(..));
                        bound = Some(Pipeline::Mesh);
                    }
                    rpass.set_scissor_rect(sx, sy, sw, sh);
                    rpass.draw(batch.range.clone(), 0..1);
                }
            }
        }
    }

    fn upload(&mut self, ctx: &RenderCtx<'_>) {
        let shapes = self.prepared.shapes.len();
        if shapes > 0 {
            ensure_capacity(
                ctx.device,
                &mut self.shape_vbo,
                &mut self.shape_capacity,
                shapes,
                std::mem::size_of::<ShapeInstance>(),
                "deepwork shape instance vbo",
            );
            if let Some(vbo) = self.shape_vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.prepared.shapes));
            }
        }

        let vertices = self.prepared.mesh.len();
        if vertices > 0 {
            ensure_capacity(
                ctx.device,
                &mut self.mesh_vbo,
                &mut self.mesh_capacity,
                vertices,
                std::mem::size_of::<MeshVertex>(),
                "deepwork mesh vbo",
            );
            if let Some(vbo) = self.mesh_vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.prepared.mesh));
            }
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.shape_pipeline.is_some() {
            return;
        }

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("deepwork scene bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: ViewportUniform::min_binding_size(),
                },
                count: None,
            }],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("deepwork scene pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let shape_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("deepwork shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });
        let mesh_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("deepwork mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        self.shape_pipeline = Some(create_pipeline(
            ctx,
            &layout,
            &shape_shader,
            "deepwork shape pipeline",
            &[QuadVertex::layout(), ShapeInstance::layout()],
        ));
        self.mesh_pipeline = Some(create_pipeline(
            ctx,
            &layout,
            &mesh_shader,
            "deepwork mesh pipeline",
            &[MeshVertex::layout()],
        ));

        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
        log::debug!("scene pipelines built for {:?}", ctx.surface_format);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("deepwork viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("deepwork scene bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("deepwork quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("deepwork quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform::new(ctx.viewport, ctx.scale_factor);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}
