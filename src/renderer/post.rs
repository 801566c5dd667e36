use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Offscreen color format the scene renders into before bloom
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Unreal-style bloom settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            strength: 0.3,
            radius: 0.1,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct BloomUniform {
    settings: [f32; 4],
    texel: [f32; 4],
}

impl BloomUniform {
    fn new(settings: BloomSettings, width: u32, height: u32) -> Self {
        Self {
            settings: [settings.threshold, settings.strength, settings.radius, 0.0],
            texel: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32, 0.0, 0.0],
        }
    }
}

/// Render targets sized to the window
struct Targets {
    scene_view: wgpu::TextureView,
    bloom_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    bloom_bind_group: wgpu::BindGroup,
    copy_bind_group: wgpu::BindGroup,
}

/// Scene target, bloom pass and final copy to the surface
pub struct PostProcess {
    settings: BloomSettings,
    sampler: wgpu::Sampler,
    bloom_uniform: wgpu::Buffer,
    bloom_layout: wgpu::BindGroupLayout,
    copy_layout: wgpu::BindGroupLayout,
    bloom_pipeline: wgpu::RenderPipeline,
    copy_pipeline: wgpu::RenderPipeline,
    targets: Targets,
}

impl PostProcess {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        settings: BloomSettings,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/post.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bloom_uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bloom Uniform"),
            contents: bytemuck::cast_slice(&[BloomUniform::new(settings, width, height)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let bloom_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom_bind_group_layout"),
            entries: &[
                texture_entry,
                sampler_entry,
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let copy_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("copy_bind_group_layout"),
            entries: &[texture_entry, sampler_entry],
        });

        let bloom_pipeline = fullscreen_pipeline(device, &shader, &bloom_layout, "fs_bloom", HDR_FORMAT, "Bloom Pipeline");
        let copy_pipeline = fullscreen_pipeline(device, &shader, &copy_layout, "fs_copy", surface_format, "Copy Pipeline");

        let targets = Targets::new(device, &sampler, &bloom_layout, &copy_layout, &bloom_uniform, width, height);

        Self {
            settings,
            sampler,
            bloom_uniform,
            bloom_layout,
            copy_layout,
            bloom_pipeline,
            copy_pipeline,
            targets,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.targets = Targets::new(
            device,
            &self.sampler,
            &self.bloom_layout,
            &self.copy_layout,
            &self.bloom_uniform,
            width,
            height,
        );
        queue.write_buffer(
            &self.bloom_uniform,
            0,
            bytemuck::cast_slice(&[BloomUniform::new(self.settings, width, height)]),
        );
    }

    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.targets.scene_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.targets.depth_view
    }

    /// Bloom the scene target, then write the result to `output`
    pub fn apply(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Bloom Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.bloom_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.bloom_pipeline);
            pass.set_bind_group(0, &self.targets.bloom_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Output Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.copy_pipeline);
        pass.set_bind_group(0, &self.targets.copy_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

impl Targets {
    fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        bloom_layout: &wgpu::BindGroupLayout,
        copy_layout: &wgpu::BindGroupLayout,
        bloom_uniform: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> Self {
        let scene_view = create_target(device, "Scene Target", HDR_FORMAT, width, height);
        let bloom_view = create_target(device, "Bloom Target", HDR_FORMAT, width, height);
        let depth_view = create_target(device, "Depth Target", PostProcess::DEPTH_FORMAT, width, height);

        let bloom_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom_bind_group"),
            layout: bloom_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: bloom_uniform.as_entire_binding(),
                },
            ],
        });

        let copy_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("copy_bind_group"),
            layout: copy_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&bloom_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            scene_view,
            bloom_view,
            depth_view,
            bloom_bind_group,
            copy_bind_group,
        }
    }
}

fn create_target(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::BindGroupLayout,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bloom_matches_showcase_look() {
        let settings = BloomSettings::default();
        assert_eq!(settings.threshold, 0.0);
        assert_eq!(settings.strength, 0.3);
        assert_eq!(settings.radius, 0.1);
    }

    #[test]
    fn texel_size_survives_zero_viewport() {
        let uniform = BloomUniform::new(BloomSettings::default(), 0, 0);
        assert_eq!(uniform.texel[0], 1.0);
        assert_eq!(uniform.texel[1], 1.0);
    }
}
