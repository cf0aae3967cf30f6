use std::mem::size_of_val;
use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Result, ensure};
use glam::Mat4;

use crate::coords::{Viewport, ortho_projection};
use crate::shapes::{Circle, FillMode, Rectangle, Shape, Sprite};

use super::batch::{BatchLimits, Batcher, CircleVertex, DrawCall, FlushSink, FrameStats, QuadVertex};
use super::resources::{
    GpuBuffer, ProgramDesc, ShaderProgram, SlotTexture, Texture, TextureHandle, TextureId,
};
use super::{RenderCtx, RenderTarget};

/// Size of the `binding_array` declared in `shaders/quad.wgsl`.
pub const MAX_TEXTURE_SLOTS: usize = 32;

const QUAD_SHADER: &str = include_str!("shaders/quad.wgsl");
const CIRCLE_SHADER: &str = include_str!("shaders/circle.wgsl");

#[derive(Debug, Clone)]
pub struct Renderer2DConfig {
    pub limits: BatchLimits,
    /// Sampler filter shared by every texture slot.
    pub texture_filter: wgpu::FilterMode,
    /// WGSL file replacing the built-in quad shader.
    pub quad_shader_path: Option<PathBuf>,
    /// WGSL file replacing the built-in circle shader.
    pub circle_shader_path: Option<PathBuf>,
}

impl Default for Renderer2DConfig {
    fn default() -> Self {
        Self {
            limits: BatchLimits::default(),
            texture_filter: wgpu::FilterMode::Nearest,
            quad_shader_path: None,
            circle_shader_path: None,
        }
    }
}

/// Batching renderer for rectangles, sprites and circles.
///
/// All GPU resources are created in [`Renderer2D::new`] and sized for the
/// configured limits. Per frame:
///
/// ```ignore
/// let mut frame = renderer.begin(rctx, target);
/// frame.draw_rect(&rect);
/// frame.draw_sprite(&sprite);
/// let stats = frame.end();
/// ```
///
/// Each flush records its own upload copies and render pass into the
/// target's encoder, so draw order follows flush order.
pub struct Renderer2D {
    batcher: Batcher<TextureHandle>,
    gpu: GpuBatches,
}

impl Renderer2D {
    /// Fails if the device was created without texture binding arrays
    /// (see `GpuInit::for_batching`).
    pub fn new(ctx: &RenderCtx<'_>, config: Renderer2DConfig) -> Result<Self> {
        let required = wgpu::Features::TEXTURE_BINDING_ARRAY
            | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING;
        ensure!(
            ctx.device.features().contains(required),
            "device lacks texture binding arrays with non-uniform indexing"
        );

        let device_slots = ctx.device.limits().max_binding_array_elements_per_shader_stage;
        ensure!(
            device_slots as usize >= MAX_TEXTURE_SLOTS,
            "device allows {device_slots} binding array elements per stage, need {MAX_TEXTURE_SLOTS}"
        );

        let mut limits = config.limits;
        if limits.max_texture_slots > MAX_TEXTURE_SLOTS {
            log::warn!(
                "renderer2d: {} texture slots requested; clamped to {MAX_TEXTURE_SLOTS}",
                limits.max_texture_slots
            );
            limits.max_texture_slots = MAX_TEXTURE_SLOTS;
        }

        let gpu = GpuBatches::new(ctx, &config, limits);
        let renderer = Self {
            batcher: Batcher::new(limits),
            gpu,
        };
        renderer.upload_projection(ctx.queue, ctx.projection());

        log::info!(
            "renderer2d ready: {} max vertices, {} texture slots, surface {:?}",
            limits.max_vertices,
            limits.max_texture_slots,
            ctx.surface_format
        );
        Ok(renderer)
    }

    #[inline]
    pub fn limits(&self) -> BatchLimits {
        self.batcher.limits()
    }

    /// Writes the orthographic projection for `viewport` to both programs.
    pub fn update_projection(&self, queue: &wgpu::Queue, viewport: Viewport) {
        self.upload_projection(queue, ortho_projection(viewport));
    }

    fn upload_projection(&self, queue: &wgpu::Queue, projection: Mat4) {
        self.gpu.quad_program.upload_projection(queue, projection);
        self.gpu.circle_program.upload_projection(queue, projection);
    }

    /// Opens a frame drawing into `target`. Pending batches are flushed by
    /// [`Frame2D::end`] or when the frame is dropped.
    pub fn begin<'f, 't>(
        &'f mut self,
        ctx: &'f RenderCtx<'_>,
        target: &'f mut RenderTarget<'t>,
    ) -> Frame2D<'f, 't> {
        let Self { batcher, gpu } = self;
        batcher.begin();
        Frame2D {
            batcher,
            sink: GpuSink {
                gpu,
                device: ctx.device,
                target,
            },
            open: true,
        }
    }
}

/// One open `begin`/`end` bracket of a [`Renderer2D`].
pub struct Frame2D<'f, 't> {
    batcher: &'f mut Batcher<TextureHandle>,
    sink: GpuSink<'f, 't>,
    open: bool,
}

impl Frame2D<'_, '_> {
    pub fn draw_rect(&mut self, rect: &Rectangle) {
        self.batcher.draw_rect(rect, &mut self.sink);
    }

    pub fn draw_circle(&mut self, circle: &Circle) {
        self.batcher.draw_circle(circle, &mut self.sink);
    }

    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        self.batcher.draw_sprite(sprite, &mut self.sink);
    }

    pub fn submit(&mut self, shape: &Shape) {
        self.batcher.submit(shape, &mut self.sink);
    }

    /// Draws everything pending so far before anything submitted later.
    pub fn flush(&mut self) {
        self.batcher.flush(&mut self.sink);
    }

    pub fn end(mut self) -> FrameStats {
        self.open = false;
        self.batcher.end(&mut self.sink)
    }
}

impl Drop for Frame2D<'_, '_> {
    fn drop(&mut self) {
        if self.open {
            self.batcher.end(&mut self.sink);
        }
    }
}

// ── GPU resources ──────────────────────────────────────────────────────────

struct GpuBatches {
    quad_program: ShaderProgram,
    circle_program: ShaderProgram,
    quad_vbo: GpuBuffer,
    quad_ibo: GpuBuffer,
    circle_vbo: GpuBuffer,
    circle_ibo: GpuBuffer,
    slots: TextureSlots,
}

impl GpuBatches {
    fn new(ctx: &RenderCtx<'_>, config: &Renderer2DConfig, limits: BatchLimits) -> Self {
        let device = ctx.device;
        let slots = TextureSlots::new(device, ctx.queue, config.texture_filter);

        let quad_layout = QuadVertex::layout();
        let quad_program = ShaderProgram::compile(
            device,
            ctx.surface_format,
            &ProgramDesc {
                label: "tessera quad program",
                builtin_source: QUAD_SHADER,
                override_path: config.quad_shader_path.as_deref(),
                vertex_layout: &quad_layout,
                extra_bind_group_layouts: &[&slots.layout],
                fill_fragment: "fs_main",
                line_fragment: "fs_main",
            },
        );

        let circle_layout = CircleVertex::layout();
        let circle_program = ShaderProgram::compile(
            device,
            ctx.surface_format,
            &ProgramDesc {
                label: "tessera circle program",
                builtin_source: CIRCLE_SHADER,
                override_path: config.circle_shader_path.as_deref(),
                vertex_layout: &circle_layout,
                extra_bind_group_layouts: &[],
                fill_fragment: "fs_main",
                line_fragment: "fs_outline",
            },
        );

        let index_bytes = (limits.max_indices() * size_of::<u32>()) as u64;
        let vbo = |label, stride: u64| {
            GpuBuffer::init(
                device,
                label,
                wgpu::BufferUsages::VERTEX,
                limits.max_vertices as u64 * stride,
            )
        };
        let ibo = |label| GpuBuffer::init(device, label, wgpu::BufferUsages::INDEX, index_bytes);

        Self {
            quad_vbo: vbo("tessera quad vbo", quad_layout.stride()),
            quad_ibo: ibo("tessera quad ibo"),
            circle_vbo: vbo("tessera circle vbo", circle_layout.stride()),
            circle_ibo: ibo("tessera circle ibo"),
            quad_program,
            circle_program,
            slots,
        }
    }
}

/// Texture binding array + shared sampler for the quad program (group 1).
///
/// Unused slots are filled with a 1x1 white texture. The bind group is
/// rebuilt only when the bound texture set changes between flushes.
struct TextureSlots {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallback: Texture,
    cached: Option<(Vec<TextureId>, wgpu::BindGroup)>,
}

impl TextureSlots {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue, filter: wgpu::FilterMode) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera texture slots bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: NonZeroU32::new(MAX_TEXTURE_SLOTS as u32),
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera texture sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        let fallback = Texture::solid(device, queue, "tessera fallback texture", [255; 4]);

        Self {
            layout,
            sampler,
            fallback,
            cached: None,
        }
    }

    fn bind(&mut self, device: &wgpu::Device, textures: &[TextureHandle]) -> &wgpu::BindGroup {
        let ids: Vec<TextureId> = textures.iter().map(SlotTexture::texture_id).collect();
        if self.cached.as_ref().is_some_and(|(cached, _)| *cached != ids) {
            self.cached = None;
        }

        let Self {
            layout,
            sampler,
            fallback,
            cached,
        } = self;

        let (_, bind_group) = cached.get_or_insert_with(|| {
            let mut views: Vec<&wgpu::TextureView> = Vec::with_capacity(MAX_TEXTURE_SLOTS);
            views.extend(textures.iter().map(|t| t.view()));
            views.resize(MAX_TEXTURE_SLOTS, fallback.view());

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tessera texture slots bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureViewArray(&views),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });
            (ids, bind_group)
        });
        bind_group
    }
}

// ── flush sink ─────────────────────────────────────────────────────────────

struct GpuSink<'f, 't> {
    gpu: &'f mut GpuBatches,
    device: &'f wgpu::Device,
    target: &'f mut RenderTarget<'t>,
}

impl GpuSink<'_, '_> {
    fn draw_quads(
        &mut self,
        vertices: &[QuadVertex],
        indices: &[u32],
        textures: &[TextureHandle],
        fill: FillMode,
    ) -> Result<()> {
        let gpu = &mut *self.gpu;
        gpu.quad_vbo.stage(self.device, self.target.encoder, bytemuck::cast_slice(vertices))?;
        gpu.quad_ibo.stage(self.device, self.target.encoder, bytemuck::cast_slice(indices))?;
        let slots = gpu.slots.bind(self.device, textures);

        let mut rpass = self.target.load_pass("tessera quad pass");
        rpass.set_pipeline(gpu.quad_program.pipeline(fill));
        rpass.set_bind_group(0, gpu.quad_program.projection_bind_group(), &[]);
        rpass.set_bind_group(1, slots, &[]);
        rpass.set_vertex_buffer(0, gpu.quad_vbo.slice(size_of_val(vertices) as u64));
        rpass.set_index_buffer(
            gpu.quad_ibo.slice(size_of_val(indices) as u64),
            wgpu::IndexFormat::Uint32,
        );
        rpass.draw_indexed(0..indices.len() as u32, 0, 0..1);
        Ok(())
    }

    fn draw_circles(
        &mut self,
        vertices: &[CircleVertex],
        indices: &[u32],
        fill: FillMode,
    ) -> Result<()> {
        let gpu = &*self.gpu;
        gpu.circle_vbo.stage(self.device, self.target.encoder, bytemuck::cast_slice(vertices))?;
        gpu.circle_ibo.stage(self.device, self.target.encoder, bytemuck::cast_slice(indices))?;

        let mut rpass = self.target.load_pass("tessera circle pass");
        rpass.set_pipeline(gpu.circle_program.pipeline(fill));
        rpass.set_bind_group(0, gpu.circle_program.projection_bind_group(), &[]);
        rpass.set_vertex_buffer(0, gpu.circle_vbo.slice(size_of_val(vertices) as u64));
        rpass.set_index_buffer(
            gpu.circle_ibo.slice(size_of_val(indices) as u64),
            wgpu::IndexFormat::Uint32,
        );
        rpass.draw_indexed(0..indices.len() as u32, 0, 0..1);
        Ok(())
    }
}

impl FlushSink<TextureHandle> for GpuSink<'_, '_> {
    fn draw(&mut self, call: DrawCall<'_, TextureHandle>) {
        let class = call.class_name();
        let result = match call {
            DrawCall::Quads {
                vertices,
                indices,
                textures,
                fill,
            } => self.draw_quads(vertices, indices, textures, fill),
            DrawCall::Circles {
                vertices,
                indices,
                fill,
            } => self.draw_circles(vertices, indices, fill),
        };

        if let Err(e) = result {
            log::error!("renderer2d: skipped {class} draw: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::resources::validate_wgsl;

    #[test]
    fn builtin_quad_shader_validates() {
        validate_wgsl(QUAD_SHADER, &["vs_main", "fs_main"]).unwrap();
    }

    #[test]
    fn builtin_circle_shader_validates() {
        validate_wgsl(CIRCLE_SHADER, &["vs_main", "fs_main", "fs_outline"]).unwrap();
    }

    #[test]
    fn quad_shader_slot_count_matches_renderer() {
        let decl = format!("binding_array<texture_2d<f32>, {MAX_TEXTURE_SLOTS}>");
        assert!(QUAD_SHADER.contains(&decl));
    }

    #[test]
    fn default_config_uses_stock_limits() {
        let c = Renderer2DConfig::default();
        assert_eq!(c.limits.max_vertices, 10_000);
        assert_eq!(c.limits.max_texture_slots, MAX_TEXTURE_SLOTS);
        assert!(c.quad_shader_path.is_none() && c.circle_shader_path.is_none());
    }
}
