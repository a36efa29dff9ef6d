use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{
    mip_chain, GfxError, GraphicsBackend, ImageData, MeshData, MeshHandle, ProgramHandle,
    ShaderSource, TextureHandle, Vertex,
};

/// GPU objects created through [`WgpuBackend`], addressed by handle.
///
/// Handle ids are 1-based slot indices; slots are never reused because the UI
/// layer has no teardown path for shared resources.
#[derive(Default)]
pub struct GpuStore {
    layouts: Option<Layouts>,
    programs: Vec<Program>,
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
}

struct Layouts {
    projection: wgpu::BindGroupLayout,
    texture: wgpu::BindGroupLayout,
    pipeline: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
}

struct Program {
    label: String,
    module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
    pipeline: Option<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
}

pub(crate) struct Mesh {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
    pub index_count: u32,
}

struct Texture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ProjectionUniform {
    pub matrix: [[f32; 4]; 4],
}

/// Per-instance model transform, column-major.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadInstance {
    pub model: [[f32; 4]; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

/// Runs `f` inside a validation error scope and returns whatever the device
/// reported for it.
fn capture_validation<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    (value, pollster::block_on(scope.pop()))
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    module: &wgpu::ShaderModule,
    vertex_entry: &str,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module,
            entry_point: Some(vertex_entry),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout(), QuadInstance::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
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
    })
}

fn slot(raw: u32) -> Option<usize> {
    raw.checked_sub(1).map(|i| i as usize)
}

impl GpuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn ensure_layouts(&mut self, device: &wgpu::Device) {
        if self.layouts.is_some() {
            return;
        }

        let projection = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trellis projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ProjectionUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trellis texture bgl"),
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

        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trellis quad pipeline layout"),
            bind_group_layouts: &[&projection, &texture],
            immediate_size: 0,
        });

        // Edge clamping with trilinear filtering across the mip chain.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("trellis image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        self.layouts = Some(Layouts { projection, texture, pipeline, sampler });
    }

    /// Layout for the renderer's projection bind group (group 0).
    pub(crate) fn projection_layout(
        &mut self,
        device: &wgpu::Device,
    ) -> Option<&wgpu::BindGroupLayout> {
        self.ensure_layouts(device);
        self.layouts.as_ref().map(|l| &l.projection)
    }

    /// Makes sure `program` has a pipeline for `format`, rebuilding it if the
    /// surface format changed. Returns false for unknown handles.
    pub(crate) fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        program: ProgramHandle,
        format: wgpu::TextureFormat,
    ) -> bool {
        self.ensure_layouts(device);
        let Some(layouts) = self.layouts.as_ref() else { return false };
        let Some(entry) = slot(program.raw()).and_then(|i| self.programs.get_mut(i)) else {
            return false;
        };

        if matches!(&entry.pipeline, Some((f, _)) if *f == format) {
            return true;
        }

        let (pipeline, error) = capture_validation(device, || {
            build_pipeline(
                device,
                &layouts.pipeline,
                &entry.label,
                &entry.module,
                &entry.vertex_entry,
                &entry.fragment_entry,
                format,
            )
        });
        if let Some(err) = error {
            log::error!("pipeline for '{}' rejected for {format:?}: {err}", entry.label);
            return false;
        }

        log::debug!("pipeline for '{}' built for {format:?}", entry.label);
        entry.pipeline = Some((format, pipeline));
        true
    }

    pub(crate) fn pipeline(&self, program: ProgramHandle) -> Option<&wgpu::RenderPipeline> {
        let entry = self.programs.get(slot(program.raw())?)?;
        entry.pipeline.as_ref().map(|(_, p)| p)
    }

    pub(crate) fn mesh(&self, mesh: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(slot(mesh.raw())?)
    }

    pub(crate) fn texture_bind_group(&self, texture: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.textures.get(slot(texture.raw())?).map(|t| &t.bind_group)
    }
}

/// [`GraphicsBackend`] over a live wgpu device.
///
/// Borrowed for the duration of a frame callback; everything it creates is
/// recorded into the [`GpuStore`] and outlives the backend.
pub struct WgpuBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    store: &'a mut GpuStore,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        store: &'a mut GpuStore,
    ) -> Self {
        Self { device, queue, surface_format, store }
    }
}

impl GraphicsBackend for WgpuBackend<'_> {
    fn compile_program(&mut self, source: &ShaderSource<'_>) -> Result<ProgramHandle, GfxError> {
        source.validate()?;
        let shader_error = |reason: String| GfxError::Shader {
            label: source.label.to_string(),
            reason,
        };

        self.store.ensure_layouts(self.device);
        let Some(layouts) = self.store.layouts.as_ref() else {
            return Err(shader_error("no pipeline layout".to_string()));
        };

        let device = self.device;
        let format = self.surface_format;

        // Compile and link now so the first frame does not pay for it, and so
        // WGSL errors come back here instead of at draw time.
        let ((module, pipeline), error) = capture_validation(device, || {
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.label),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.into()),
            });
            let pipeline = build_pipeline(
                device,
                &layouts.pipeline,
                source.label,
                &module,
                source.vertex_entry,
                source.fragment_entry,
                format,
            );
            (module, pipeline)
        });
        if let Some(err) = error {
            log::error!("program '{}' rejected: {err}", source.label);
            return Err(shader_error(err.to_string()));
        }

        self.store.programs.push(Program {
            label: source.label.to_string(),
            module,
            vertex_entry: source.vertex_entry.to_string(),
            fragment_entry: source.fragment_entry.to_string(),
            pipeline: Some((format, pipeline)),
        });
        let handle = ProgramHandle::from_raw(self.store.programs.len() as u32);

        log::debug!("program '{}' compiled as {}", source.label, handle.raw());
        Ok(handle)
    }

    fn upload_mesh(&mut self, mesh: &MeshData<'_>) -> Result<MeshHandle, GfxError> {
        mesh.validate()?;

        let vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trellis mesh vbo"),
            contents: bytemuck::cast_slice(mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trellis mesh ibo"),
            contents: bytemuck::cast_slice(mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.store.meshes.push(Mesh {
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
        });
        let handle = MeshHandle::from_raw(self.store.meshes.len() as u32);

        log::debug!(
            "mesh {} uploaded: {} vertices, {} indices",
            handle.raw(),
            mesh.vertices.len(),
            mesh.indices.len()
        );
        Ok(handle)
    }

    fn upload_texture(&mut self, image: &ImageData<'_>) -> Result<TextureHandle, GfxError> {
        image.validate(self.device.limits().max_texture_dimension_2d)?;
        self.store.ensure_layouts(self.device);
        let Some(layouts) = self.store.layouts.as_ref() else {
            return Err(GfxError::InvalidTexture { reason: "no texture layout".to_string() });
        };

        let chain = mip_chain(image.width, image.height, image.rgba);
        let mip_level_count = 1 + chain.len() as u32;

        let device = self.device;
        let queue = self.queue;
        let ((texture, bind_group), error) = capture_validation(device, || {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("trellis image texture"),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });

            let levels = std::iter::once((image.width, image.height, image.rgba))
                .chain(chain.iter().map(|l| (l.width, l.height, l.rgba.as_slice())));

            for (mip_level, (w, h, rgba)) in levels.enumerate() {
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: mip_level as u32,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    rgba,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * w),
                        rows_per_image: Some(h),
                    },
                    wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
                );
            }

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("trellis image bind group"),
                layout: &layouts.texture,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&layouts.sampler),
                    },
                ],
            });
            (texture, bind_group)
        });
        if let Some(err) = error {
            log::error!("texture {}x{} rejected: {err}", image.width, image.height);
            return Err(GfxError::InvalidTexture { reason: err.to_string() });
        }

        self.store.textures.push(Texture { _texture: texture, bind_group });
        let handle = TextureHandle::from_raw(self.store.textures.len() as u32);

        log::debug!(
            "texture {} uploaded: {}x{}, {mip_level_count} mip levels",
            handle.raw(),
            image.width,
            image.height
        );
        Ok(handle)
    }
}
