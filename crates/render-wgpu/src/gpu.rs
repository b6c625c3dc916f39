use crate::camera::LookController;
use crate::shaders;
use artwalk_common::Aabb;
use artwalk_field::TriMesh;
use artwalk_scene::{LightRig, PlanePlacement};
use artwalk_session::Session;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

/// World placement of the unit-cube blob field: scaled up and pushed out in
/// front of the spawn point, resting on the floor plane.
const FIELD_SCALE: f32 = 120.0;
const FIELD_OFFSET: Vec3 = Vec3::new(-60.0, 0.0, -180.0);

const MAX_SOLIDS: u32 = 64;
const MAX_PLANES: u32 = 16;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    hemisphere_sky: [f32; 4],
    hemisphere_ground: [f32; 4],
    hemisphere_dir: [f32; 4],
    directional: [f32; 4],
    ambient: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, lights: &LightRig) -> Self {
        let dir = lights.hemisphere_direction.normalize_or_zero();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            hemisphere_sky: with_w(lights.hemisphere_sky, lights.hemisphere_intensity),
            hemisphere_ground: with_w(lights.hemisphere_ground, 0.0),
            hemisphere_dir: [dir.x, dir.y, dir.z, 0.0],
            directional: with_w(lights.directional_color, lights.directional_intensity),
            ambient: with_w(lights.ambient_color, lights.ambient_intensity),
        }
    }
}

fn with_w(rgb: [f32; 3], w: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], w]
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Model matrix placing the normalized field cube in the world.
fn field_model() -> Mat4 {
    Mat4::from_translation(FIELD_OFFSET) * Mat4::from_scale(Vec3::splat(FIELD_SCALE))
}

/// Model matrix stretching a unit cube over a collision box.
fn solid_model(bounds: &Aabb) -> Mat4 {
    let extents = (bounds.max - bounds.min).max(Vec3::splat(f32::EPSILON));
    Mat4::from_scale_rotation_translation(extents, Quat::IDENTITY, bounds.center())
}

/// Model matrix for a placed image plane (unit quad in the XY plane). The
/// placement's texture path is not sampled; planes draw as flat lit quads.
fn plane_model(plane: &PlanePlacement) -> Mat4 {
    Mat4::from_translation(plane.position)
        * Mat4::from_scale(Vec3::new(plane.width, plane.height, 1.0))
}

/// Generate unit cube vertices and indices.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let white = [1.0, 1.0, 1.0];
    let v = |position: [f32; 3], normal: [f32; 3]| Vertex {
        position,
        normal,
        color: white,
    };
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        v([-p, -p,  p], [0.0, 0.0, 1.0]),
        v([ p, -p,  p], [0.0, 0.0, 1.0]),
        v([ p,  p,  p], [0.0, 0.0, 1.0]),
        v([-p,  p,  p], [0.0, 0.0, 1.0]),
        // -Z face
        v([ p, -p, -p], [0.0, 0.0, -1.0]),
        v([-p, -p, -p], [0.0, 0.0, -1.0]),
        v([-p,  p, -p], [0.0, 0.0, -1.0]),
        v([ p,  p, -p], [0.0, 0.0, -1.0]),
        // +X face
        v([ p, -p,  p], [1.0, 0.0, 0.0]),
        v([ p, -p, -p], [1.0, 0.0, 0.0]),
        v([ p,  p, -p], [1.0, 0.0, 0.0]),
        v([ p,  p,  p], [1.0, 0.0, 0.0]),
        // -X face
        v([-p, -p, -p], [-1.0, 0.0, 0.0]),
        v([-p, -p,  p], [-1.0, 0.0, 0.0]),
        v([-p,  p,  p], [-1.0, 0.0, 0.0]),
        v([-p,  p, -p], [-1.0, 0.0, 0.0]),
        // +Y face
        v([-p,  p,  p], [0.0, 1.0, 0.0]),
        v([ p,  p,  p], [0.0, 1.0, 0.0]),
        v([ p,  p, -p], [0.0, 1.0, 0.0]),
        v([-p,  p, -p], [0.0, 1.0, 0.0]),
        // -Y face
        v([-p, -p, -p], [0.0, -1.0, 0.0]),
        v([ p, -p, -p], [0.0, -1.0, 0.0]),
        v([ p, -p,  p], [0.0, -1.0, 0.0]),
        v([-p, -p,  p], [0.0, -1.0, 0.0]),
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Unit quad in the XY plane, centered at the origin, facing +Z.
fn quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let white = [1.0, 1.0, 1.0];
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex { position: [-p, -p, 0.0], normal: n, color: white },
        Vertex { position: [p, -p, 0.0], normal: n, color: white },
        Vertex { position: [p, p, 0.0], normal: n, color: white },
        Vertex { position: [-p, p, 0.0], normal: n, color: white },
    ];
    let indices = vec![0, 1, 2, 2, 3, 0];
    (vertices, indices)
}

/// Generate grid floor line vertices.
fn grid_mesh(half_extent: i32, spacing: f32) -> Vec<GridVertex> {
    let mut verts = Vec::new();
    let color = [0.4, 0.4, 0.4, 1.0];
    let extent = half_extent as f32 * spacing;

    for i in -half_extent..=half_extent {
        let offset = i as f32 * spacing;
        // Lines along X
        verts.push(GridVertex {
            position: [-extent, 0.0, offset],
            color,
        });
        verts.push(GridVertex {
            position: [extent, 0.0, offset],
            color,
        });
        // Lines along Z
        verts.push(GridVertex {
            position: [offset, 0.0, -extent],
            color,
        });
        verts.push(GridVertex {
            position: [offset, 0.0, extent],
            color,
        });
    }
    verts
}

fn blob_vertices(mesh: &TriMesh) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.colors)
        .map(|((&position, &normal), &color)| Vertex {
            position,
            normal,
            color,
        })
        .collect()
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    quad_index_count: u32,
    grid_vertex_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    blob_vertex_buffer: wgpu::Buffer,
    blob_index_buffer: wgpu::Buffer,
    blob_vertex_capacity: usize,
    blob_index_capacity: usize,
    blob_index_count: u32,
    blob_instance_buffer: wgpu::Buffer,
    solid_instance_buffer: wgpu::Buffer,
    plane_instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY, &LightRig::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        // One lit pipeline serves the blob surface, the solids, and the
        // image planes. Culling stays off: planes are double-sided.
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let grid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &grid_shader,
                entry_point: Some("vs_grid"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &grid_shader,
                entry_point: Some("fs_grid"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cube_index_count = cube_indices.len() as u32;

        let (quad_verts, quad_indices) = quad_mesh();
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let quad_index_count = quad_indices.len() as u32;

        let grid_verts = grid_mesh(50, 10.0);
        let grid_vertex_count = grid_verts.len() as u32;
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&grid_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Blob buffers start with a generous capacity and grow on demand;
        // the mesh is re-uploaded every frame.
        let blob_vertex_capacity = 16_384;
        let blob_index_capacity = 65_536;
        let blob_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blob_vertex_buffer"),
            size: (blob_vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let blob_index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blob_index_buffer"),
            size: (blob_index_capacity * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let blob_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blob_instance_buffer"),
            size: std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let solid_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("solid_instance_buffer"),
            size: (MAX_SOLIDS as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let plane_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plane_instance_buffer"),
            size: (MAX_PLANES as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count,
            quad_vertex_buffer,
            quad_index_buffer,
            quad_index_count,
            grid_vertex_buffer,
            grid_vertex_count,
            blob_vertex_buffer,
            blob_index_buffer,
            blob_vertex_capacity,
            blob_index_capacity,
            blob_index_count: 0,
            blob_instance_buffer,
            solid_instance_buffer,
            plane_instance_buffer,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    fn ensure_blob_capacity(&mut self, device: &wgpu::Device, mesh: &TriMesh) {
        if mesh.positions.len() > self.blob_vertex_capacity {
            self.blob_vertex_capacity = mesh.positions.len().next_power_of_two();
            tracing::debug!(capacity = self.blob_vertex_capacity, "growing blob vertex buffer");
            self.blob_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("blob_vertex_buffer"),
                size: (self.blob_vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        if mesh.indices.len() > self.blob_index_capacity {
            self.blob_index_capacity = mesh.indices.len().next_power_of_two();
            self.blob_index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("blob_index_buffer"),
                size: (self.blob_index_capacity * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
    }

    /// Render one frame: grid floor, blob surface, solids, image planes.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        controller: &LookController,
        session: &Session,
        mesh: &TriMesh,
    ) {
        let vp = controller.view_projection(session.rig().position, session.heading());
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(vp, &session.config().lights)),
        );

        self.ensure_blob_capacity(device, mesh);
        self.blob_index_count = mesh.indices.len() as u32;
        if !mesh.is_empty() {
            queue.write_buffer(
                &self.blob_vertex_buffer,
                0,
                bytemuck::cast_slice(&blob_vertices(mesh)),
            );
            queue.write_buffer(&self.blob_index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
            queue.write_buffer(
                &self.blob_instance_buffer,
                0,
                bytemuck::bytes_of(&InstanceData::new(field_model(), [1.0, 1.0, 1.0, 1.0])),
            );
        }

        let solids: Vec<InstanceData> = session
            .objects()
            .iter()
            .take(MAX_SOLIDS as usize)
            .map(|o| InstanceData::new(solid_model(&o.bounds), [0.7, 0.7, 0.7, 1.0]))
            .collect();
        if !solids.is_empty() {
            queue.write_buffer(&self.solid_instance_buffer, 0, bytemuck::cast_slice(&solids));
        }

        let planes: Vec<InstanceData> = session
            .config()
            .planes
            .iter()
            .take(MAX_PLANES as usize)
            .map(|p| InstanceData::new(plane_model(p), [0.9, 0.9, 0.9, 1.0]))
            .collect();
        if !planes.is_empty() {
            queue.write_buffer(&self.plane_instance_buffer, 0, bytemuck::cast_slice(&planes));
        }

        let bg = session.config().background;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Grid floor
            pass.set_pipeline(&self.grid_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            // Blob iso-surface
            if self.blob_index_count > 0 {
                pass.set_vertex_buffer(0, self.blob_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.blob_instance_buffer.slice(..));
                pass.set_index_buffer(self.blob_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.blob_index_count, 0, 0..1);
            }

            // Collision solids
            if !solids.is_empty() {
                pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.solid_instance_buffer.slice(..));
                pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.cube_index_count, 0, 0..solids.len() as u32);
            }

            // Image planes
            if !planes.is_empty() {
                pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.plane_instance_buffer.slice(..));
                pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.quad_index_count, 0, 0..planes.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_mesh_is_a_closed_box() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
    }

    #[test]
    fn quad_mesh_is_two_triangles() {
        let (verts, indices) = quad_mesh();
        assert_eq!(verts.len(), 4);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn grid_mesh_covers_both_axes() {
        let verts = grid_mesh(2, 1.0);
        // 5 lines per axis, 2 vertices per line, 2 axes.
        assert_eq!(verts.len(), 20);
    }

    #[test]
    fn field_model_rests_on_the_floor() {
        let model = field_model();
        let low = model.transform_point3(Vec3::ZERO);
        let high = model.transform_point3(Vec3::ONE);
        assert_eq!(low.y, 0.0);
        assert_eq!(high.y, FIELD_SCALE);
    }

    #[test]
    fn solid_model_spans_the_bounds() {
        let bounds = Aabb::new(Vec3::new(80.0, -120.0, 80.0), Vec3::new(120.0, -80.0, 120.0));
        let model = solid_model(&bounds);
        let min = model.transform_point3(Vec3::splat(-0.5));
        let max = model.transform_point3(Vec3::splat(0.5));
        assert!((min - bounds.min).length() < 1e-3);
        assert!((max - bounds.max).length() < 1e-3);
    }

    #[test]
    fn blob_vertices_interleave_all_attributes() {
        let mesh = TriMesh {
            positions: vec![[0.0, 1.0, 2.0]],
            normals: vec![[0.0, 1.0, 0.0]],
            colors: vec![[1.0, 0.0, 0.0]],
            indices: vec![],
        };
        let verts = blob_vertices(&mesh);
        assert_eq!(verts.len(), 1);
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0]);
    }
}
