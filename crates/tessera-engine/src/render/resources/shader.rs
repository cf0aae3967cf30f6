use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use glam::Mat4;

use crate::io::read_file;
use crate::render::common::{ProjectionUniform, premul_alpha_blend};
use crate::shapes::FillMode;

use super::{GpuBuffer, VertexLayout};

/// Parses and validates WGSL with naga and checks that every name in
/// `entry_points` is defined.
pub fn validate_wgsl(source: &str, entry_points: &[&str]) -> Result<()> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!("{}", e.emit_to_string(source)))
        .context("WGSL parse failed")?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("{e}"))
    .context("WGSL validation failed")?;

    for name in entry_points {
        ensure!(
            module.entry_points.iter().any(|ep| ep.name == *name),
            "missing entry point `{name}`"
        );
    }
    Ok(())
}

/// Inputs for [`ShaderProgram::compile`].
pub struct ProgramDesc<'a> {
    pub label: &'static str,
    pub builtin_source: &'static str,
    /// Optional WGSL file replacing `builtin_source`. Empty or invalid files
    /// are reported and ignored.
    pub override_path: Option<&'a Path>,
    pub vertex_layout: &'a VertexLayout,
    /// Bind group layouts following the projection group (group 0).
    pub extra_bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Fragment entry point for filled (triangle list) draws.
    pub fill_fragment: &'static str,
    /// Fragment entry point for outlined (line list) draws.
    pub line_fragment: &'static str,
}

/// One WGSL module compiled into a triangle-list and a line-list pipeline
/// that share the projection uniform at group 0, binding 0.
#[derive(Debug)]
pub struct ShaderProgram {
    label: &'static str,
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    projection_ubo: GpuBuffer,
    projection_bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    pub const VERTEX_ENTRY: &'static str = "vs_main";

    pub fn compile(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        desc: &ProgramDesc<'_>,
    ) -> Self {
        let source = resolve_source(desc);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(source),
        });

        let projection_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(ProjectionUniform::SIZE),
                },
                count: None,
            }],
        });

        let projection_ubo = GpuBuffer::init(
            device,
            "tessera projection ubo",
            wgpu::BufferUsages::UNIFORM,
            ProjectionUniform::SIZE,
        );

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera projection bind group"),
            layout: &projection_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.buffer().as_entire_binding(),
            }],
        });

        let mut layouts: Vec<&wgpu::BindGroupLayout> = vec![&projection_bgl];
        layouts.extend_from_slice(desc.extra_bind_group_layouts);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        let build = |topology: wgpu::PrimitiveTopology, fragment: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(Self::VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[desc.vertex_layout.buffer_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(fragment),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
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
            })
        };

        let fill_pipeline = build(wgpu::PrimitiveTopology::TriangleList, desc.fill_fragment);
        let line_pipeline = build(wgpu::PrimitiveTopology::LineList, desc.line_fragment);

        Self {
            label: desc.label,
            fill_pipeline,
            line_pipeline,
            projection_ubo,
            projection_bind_group,
        }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Pipeline whose topology matches `fill`.
    #[inline]
    pub fn pipeline(&self, fill: FillMode) -> &wgpu::RenderPipeline {
        match fill {
            FillMode::Filled => &self.fill_pipeline,
            FillMode::Outlined => &self.line_pipeline,
        }
    }

    #[inline]
    pub fn projection_bind_group(&self) -> &wgpu::BindGroup {
        &self.projection_bind_group
    }

    pub fn upload_projection(&self, queue: &wgpu::Queue, projection: Mat4) {
        let uniform = ProjectionUniform::new(projection);
        if let Err(e) = self.projection_ubo.update(queue, bytemuck::bytes_of(&uniform)) {
            log::error!("{}: projection upload failed: {e:#}", self.label);
        }
    }
}

fn resolve_source(desc: &ProgramDesc<'_>) -> Cow<'static, str> {
    let builtin = Cow::Borrowed(desc.builtin_source);
    let Some(path) = desc.override_path else {
        return builtin;
    };

    let source = read_file(path);
    if source.is_empty() {
        log::warn!("{}: {} is empty; using built-in shader", desc.label, path.display());
        return builtin;
    }

    let entry_points = [ShaderProgram::VERTEX_ENTRY, desc.fill_fragment, desc.line_fragment];
    match validate_wgsl(&source, &entry_points) {
        Ok(()) => {
            log::info!("{}: loaded shader from {}", desc.label, path.display());
            Cow::Owned(source)
        }
        Err(e) => {
            log::error!("{}: {}: {e:#}", desc.label, path.display());
            log::warn!("{}: using built-in shader", desc.label);
            builtin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
@vertex
fn vs_main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;

    #[test]
    fn accepts_valid_module() {
        validate_wgsl(MINIMAL, &["vs_main", "fs_main"]).unwrap();
    }

    #[test]
    fn rejects_missing_entry_point() {
        let err = validate_wgsl(MINIMAL, &["vs_main", "fs_outline"]).unwrap_err();
        assert!(format!("{err:#}").contains("fs_outline"));
    }

    #[test]
    fn rejects_syntax_errors() {
        let err = validate_wgsl("fn broken( {", &[]).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn rejects_type_errors() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        assert!(validate_wgsl(src, &[]).is_err());
    }
}
