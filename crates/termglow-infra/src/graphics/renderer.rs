// Copyright 2025 the termglow developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The wgpu rasterizer: turns a frame snapshot into draw calls.
//!
//! All GPU resources are allocated once at mount and sized for the scene's
//! fixed object count; per frame the renderer only rewrites the uniform and
//! instance buffers and records one render pass. Everything is released when
//! the renderer drops (RAII), so unmounting leaks nothing across remounts.

use std::mem;

use termglow_core::error::FrameError;
use termglow_core::math::{LinearRgba, Mat4, Vec3};
use termglow_core::scene::{panel, particles, Scene};
use termglow_core::Rasterizer;
use wgpu::util::DeviceExt;

use super::context::GraphicsContext;
use super::glyphs::{load_font_bytes, GlyphAtlas, TextVertex};
use super::mesh::{Vertex, CUBE_INDICES, CUBE_VERTICES};

const SHADER_SOURCE: &str = include_str!("shaders/scene.wgsl");

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Background clear color: the dark page background the panel floats over.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.004,
    b: 0.006,
    a: 1.0,
};

/// The uniform block shared by both pipelines. Layout mirrors
/// `SceneUniforms` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    text_model: [[f32; 4]; 4],
    ambient: [f32; 4],
    key_position: [f32; 4],
    key_color: [f32; 4],
    fill_position: [f32; 4],
    fill_color: [f32; 4],
    text_color: [f32; 4],
}

/// Per-instance data for the instanced box draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl InstanceRaw {
    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }

    fn new(model: Mat4, color: LinearRgba, emissive: LinearRgba) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
            emissive: emissive.to_array(),
        }
    }
}

/// GPU state for the optional text layer. Absent when the font asset could
/// not be loaded; the panel renders without text in that case.
struct TextLayer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// A [`Rasterizer`] backed by wgpu.
pub struct SceneRenderer {
    context: GraphicsContext,
    depth_view: wgpu::TextureView,
    mesh_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_scratch: Vec<InstanceRaw>,
    text: Option<TextLayer>,
    frame_color: LinearRgba,
    screen_color: LinearRgba,
    text_color: LinearRgba,
}

impl SceneRenderer {
    /// Allocates every GPU resource the scene needs, sized for its fixed
    /// object count.
    pub fn new(context: GraphicsContext, scene: &Scene) -> Self {
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        // --- Uniforms ---
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // --- Cube geometry ---
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Panel frame + screen + every particle; the count never changes.
        let instance_capacity = 2 + scene.particle_count();
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Box Instance Buffer"),
            size: (instance_capacity * mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // --- Mesh pipeline ---
        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&mesh_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_mesh"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[Vertex::buffer_layout(), InstanceRaw::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_mesh"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // --- Text layer (optional, degrades independently of the boxes) ---
        let text = load_font_bytes().and_then(|bytes| {
            match GlyphAtlas::build(&bytes, scene.panel().content()) {
                Ok(atlas) => Some(Self::build_text_layer(
                    &context,
                    &shader,
                    &uniform_layout,
                    &atlas,
                    scene.panel().content(),
                )),
                Err(e) => {
                    log::warn!("Glyph atlas build failed ({e:#}); terminal text will not render");
                    None
                }
            }
        });

        let depth_view = Self::create_depth_view(&context);

        log::info!(
            "Scene renderer ready on \"{}\" ({} box instances, text layer: {})",
            context.adapter_name,
            instance_capacity,
            if text.is_some() { "on" } else { "off" }
        );

        Self {
            context,
            depth_view,
            mesh_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            instance_buffer,
            instance_scratch: Vec::with_capacity(instance_capacity),
            text,
            frame_color: LinearRgba::from_hex(panel::FRAME_COLOR_HEX),
            screen_color: LinearRgba::from_hex(panel::SCREEN_COLOR_HEX),
            text_color: LinearRgba::from_hex(panel::TEXT_COLOR_HEX),
        }
    }

    fn build_text_layer(
        context: &GraphicsContext,
        shader: &wgpu::ShaderModule,
        uniform_layout: &wgpu::BindGroupLayout,
        atlas: &GlyphAtlas,
        content: &str,
    ) -> TextLayer {
        let device = &context.device;
        let (atlas_width, atlas_height) = atlas.dimensions();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glyph Atlas"),
            size: wgpu::Extent3d {
                width: atlas_width,
                height: atlas_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas_width),
                rows_per_image: Some(atlas_height),
            },
            wgpu::Extent3d {
                width: atlas_width,
                height: atlas_height,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Glyph Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let atlas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Glyph Atlas Layout"),
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
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Glyph Atlas Bind Group"),
            layout: &atlas_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let (vertices, indices) = atlas.layout(content, panel::TEXT_GLYPH_SIZE);
        let index_count = indices.len() as u32;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Text Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Text Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[uniform_layout, &atlas_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_text"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[TextVertex::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_text"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.surface_config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Text quads face the camera; no culling so the slight sway
                // never clips them out.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!("Text layer built: {index_count} indices");

        TextLayer {
            pipeline,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count,
        }
    }

    fn create_depth_view(context: &GraphicsContext) -> wgpu::TextureView {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: context.surface_config.width,
                height: context.surface_config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Reconfigures the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth_view = Self::create_depth_view(&self.context);
        log::debug!("Renderer resized to {width}x{height}");
    }

    fn uniforms_for(&self, scene: &Scene) -> SceneUniforms {
        let snapshot = scene.snapshot();
        let view_proj = scene
            .camera
            .view_projection_matrix(self.context.aspect_ratio());
        let lights = &scene.lights;
        SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            text_model: snapshot.panel.text.to_matrix().to_cols_array_2d(),
            ambient: lights
                .ambient
                .color
                .scaled(lights.ambient.intensity)
                .to_array(),
            key_position: [
                lights.key.position.x,
                lights.key.position.y,
                lights.key.position.z,
                1.0,
            ],
            key_color: lights.key.color.scaled(lights.key.intensity).to_array(),
            fill_position: [
                lights.fill.position.x,
                lights.fill.position.y,
                lights.fill.position.z,
                1.0,
            ],
            fill_color: lights.fill.color.scaled(lights.fill.intensity).to_array(),
            text_color: self.text_color.to_array(),
        }
    }

    fn fill_instances(&mut self, scene: &Scene) {
        let snapshot = scene.snapshot();
        self.instance_scratch.clear();

        let pose = &snapshot.panel;
        self.instance_scratch.push(InstanceRaw::new(
            pose.frame.to_matrix() * Mat4::from_scale(panel::FRAME_EXTENTS),
            self.frame_color,
            LinearRgba::BLACK,
        ));
        self.instance_scratch.push(InstanceRaw::new(
            pose.screen.to_matrix() * Mat4::from_scale(panel::SCREEN_EXTENTS),
            self.screen_color,
            LinearRgba::BLACK,
        ));

        for p in &snapshot.particles {
            let edge = p.scale * particles::PARTICLE_EXTENT;
            self.instance_scratch.push(InstanceRaw::new(
                Mat4::from_translation(p.position) * Mat4::from_scale(Vec3::splat(edge)),
                p.color,
                p.color.scaled(particles::EMISSIVE_INTENSITY),
            ));
        }
    }
}

impl Rasterizer for SceneRenderer {
    fn submit(&mut self, scene: &Scene) -> Result<(), FrameError> {
        let uniforms = self.uniforms_for(scene);
        self.fill_instances(scene);

        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.context.queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&self.instance_scratch),
        );

        let surface_texture = self.context.acquire_frame()?;
        let target_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Scene Command Encoder"),
                });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(
                0..CUBE_INDICES.len() as u32,
                0,
                0..self.instance_scratch.len() as u32,
            );

            if let Some(text) = &self.text {
                pass.set_pipeline(&text.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_bind_group(1, &text.bind_group, &[]);
                pass.set_vertex_buffer(0, text.vertex_buffer.slice(..));
                pass.set_index_buffer(text.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..text.index_count, 0, 0..1);
            }
        }

        self.context
            .queue
            .submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_raw_is_gpu_sized() {
        // 4x4 matrix + color + emissive, tightly packed.
        assert_eq!(mem::size_of::<InstanceRaw>(), 96);
    }

    #[test]
    fn test_scene_uniforms_size_matches_wgsl_block() {
        // Two mat4x4 plus six vec4.
        assert_eq!(mem::size_of::<SceneUniforms>(), 2 * 64 + 6 * 16);
    }

    #[test]
    fn test_instance_encodes_transform_and_colors() {
        let raw = InstanceRaw::new(
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            LinearRgba::rgb(0.5, 0.0, 0.0),
            LinearRgba::BLACK,
        );
        assert_eq!(raw.model[3][0], 1.0);
        assert_eq!(raw.model[3][1], 2.0);
        assert_eq!(raw.model[3][2], 3.0);
        assert_eq!(raw.color[0], 0.5);
        assert_eq!(raw.emissive[0], 0.0);
    }
}
