use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::paint::Color;
use crate::scene::DrawList;
use crate::surface::{BackingSize, SurfacePlacement};

use super::common::{create_pipeline, load_op, logical_clip_to_scissor};
use super::{RenderCtx, RenderTarget, SceneRenderer};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct CompositeUniform {
    viewport: [f32; 2],
    _pad: [f32; 2],
    dest: [f32; 4],
}

impl CompositeUniform {
    fn new(viewport: Viewport, placement: &SurfacePlacement) -> Self {
        let dest = placement.dest();
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
            dest: [dest.origin.x, dest.origin.y, dest.size.x, dest.size.y],
        }
    }
}

struct LayerTexture {
    size: BackingSize,
    format: wgpu::TextureFormat,
    view: wgpu::TextureView,
    _texture: wgpu::Texture,
}

/// Presents a surface frame at the surface's own pixel density.
///
/// Each call rasterizes the frame into an offscreen layer of exactly the
/// committed backing size at the committed (capped) scale, then stretches the
/// layer over the placement rect of the window target with linear filtering.
/// The layer is reallocated only when the backing size or format changes.
#[derive(Default)]
pub struct SurfaceCompositor {
    scene: SceneRenderer,

    layer: Option<LayerTexture>,
    layer_generation: u64,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    uniform: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    bind_group_generation: u64,
}

impl SurfaceCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `frame` (surface-local logical units) into `target` at
    /// `placement`, clearing the target to `clear` first when given.
    ///
    /// Without a placement only the clear runs.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &mut DrawList,
        placement: Option<SurfacePlacement>,
        clear: Option<Color>,
    ) {
        let Some(placement) = placement.filter(|p| p.scale.is_finite() && p.scale > 0.0) else {
            if clear.is_some() {
                drop(begin_pass(target, clear));
            }
            return;
        };

        self.ensure_layer(ctx, placement.backing);
        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_bindings(ctx);

        let Some(layer) = self.layer.as_ref() else { return };

        let extent = placement.extent();
        let layer_ctx = RenderCtx::new(
            ctx.device,
            ctx.queue,
            ctx.surface_format,
            Viewport::new(extent.x, extent.y),
            placement.scale,
        );
        {
            let mut layer_target = RenderTarget::new(&mut *target.encoder, &layer.view);
            self.scene.render(&layer_ctx, &mut layer_target, frame, Some(Color::transparent()));
        }

        if let Some(ubo) = self.uniform.as_ref() {
            let u = CompositeUniform::new(ctx.viewport, &placement);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let mut rpass = begin_pass(target, clear);
        let (Some(pipeline), Some(bind_group)) = (self.pipeline.as_ref(), self.bind_group.as_ref()) else {
            return;
        };
        let Some((sx, sy, sw, sh)) = logical_clip_to_scissor(Some(placement.clip), ctx.viewport, ctx.scale_factor)
        else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_scissor_rect(sx, sy, sw, sh);
        rpass.draw(0..6, 0..1);
    }

    fn ensure_layer(&mut self, ctx: &RenderCtx<'_>, size: BackingSize) {
        if let Some(layer) = &self.layer {
            if layer.size == size && layer.format == ctx.surface_format {
                return;
            }
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("deepwork surface layer"),
            size: wgpu::Extent3d { width: size.width, height: size.height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        self.layer = Some(LayerTexture {
            size,
            format: ctx.surface_format,
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            _texture: texture,
        });
        self.layer_generation += 1;
        log::debug!("surface layer allocated at {}x{}", size.width, size.height);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("deepwork composite bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(std::mem::size_of::<CompositeUniform>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("deepwork composite pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("deepwork composite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/composite.wgsl").into()),
        });

        self.pipeline = Some(create_pipeline(ctx, &layout, &shader, "deepwork composite pipeline", &[]));
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.uniform = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("deepwork surface sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform.is_some() && self.bind_group_generation == self.layer_generation {
            return;
        }

        let (Some(bgl), Some(layer), Some(sampler)) =
            (self.bind_group_layout.as_ref(), self.layer.as_ref(), self.sampler.as_ref())
        else {
            return;
        };

        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("deepwork composite ubo"),
            size: std::mem::size_of::<CompositeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("deepwork composite bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: uniform.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&layer.view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        self.uniform = Some(uniform);
        self.bind_group = Some(bind_group);
        self.bind_group_generation = self.layer_generation;
    }
}

fn begin_pass<'e>(target: &'e mut RenderTarget<'_>, clear: Option<Color>) -> wgpu::RenderPass<'e> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("deepwork composite pass"),
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
    })
}
