use super::camera::Camera;
use super::context::GpuContext;
use super::error::RenderError;
use super::mesh::{Mesh, MeshData};
use super::pipeline::{light_kind, shading, ScenePipeline, Uniforms};
use crate::driver::SceneRenderer;
use crate::scene::{Geometry, Light, Material, Scene};
use glam::{Mat4, Vec3};
use winit::dpi::{LogicalSize, PhysicalSize};

const MAX_INSTANCES: usize = 256;
const SPARKLE_RADIUS: f32 = 0.5;

struct DrawCall {
    mesh: MeshSlot,
    offset: u32,
}

#[derive(Clone, Copy)]
enum MeshSlot {
    Geometry(usize),
    Sparkle,
}

/// Forward renderer drawing every scene object with one light.
pub struct WgpuRenderer {
    context: GpuContext,
    pipeline: ScenePipeline,
    meshes: Vec<(Geometry, Mesh)>,
    sparkle_mesh: Mesh,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_alignment: u32,
    staging: UniformStaging,
    logical_size: (u32, u32),
    pixel_density: f64,
    window_size: Option<PhysicalSize<u32>>,
    warned_overflow: bool,
}

/// CPU-side image of the dynamic uniform buffer, reused across frames.
struct UniformStaging {
    data: Vec<u8>,
    stride: usize,
}

impl UniformStaging {
    fn new(stride: usize) -> Self {
        Self {
            data: Vec::with_capacity(stride * MAX_INSTANCES),
            stride,
        }
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len() / self.stride
    }

    /// Appends one slot holding `bytes`. Returns its dynamic offset, or `None`
    /// once every slot is taken.
    fn push(&mut self, bytes: &[u8]) -> Option<u32> {
        if self.len() >= MAX_INSTANCES {
            return None;
        }
        let offset = self.data.len();
        self.data.resize(offset + self.stride, 0);
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Some(offset as u32)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Surface extent for a logical output size.
///
/// The window's own extent is used whenever it maps back to `logical` at
/// `density`; otherwise the logical size is scaled and rounded.
fn physical_extent(
    logical: (u32, u32),
    density: f64,
    window: Option<PhysicalSize<u32>>,
) -> PhysicalSize<u32> {
    if let Some(window) = window.filter(|w| w.width > 0 && w.height > 0) {
        let mapped: LogicalSize<u32> = window.to_logical(density);
        if (mapped.width, mapped.height) == logical {
            return window;
        }
    }

    let scale = |v: u32| ((v as f64 * density).round() as u32).max(1);
    PhysicalSize::new(scale(logical.0), scale(logical.1))
}

impl WgpuRenderer {
    pub fn new(context: GpuContext, logical_size: (u32, u32), pixel_density: f64) -> Self {
        let pipeline = ScenePipeline::new(&context);
        let sparkle_mesh = Mesh::upload(&context.device, &MeshData::octahedron(SPARKLE_RADIUS));

        let uniform_alignment = context.device.limits().min_uniform_buffer_offset_alignment;
        let aligned_size = Self::align_to(std::mem::size_of::<Uniforms>() as u32, uniform_alignment);
        let buffer_size = (aligned_size as usize * MAX_INSTANCES) as u64;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dynamic Uniform Buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = pipeline.create_bind_group(&context.device, &uniform_buffer);

        let mut renderer = Self {
            context,
            pipeline,
            meshes: Vec::new(),
            sparkle_mesh,
            uniform_buffer,
            bind_group,
            uniform_alignment,
            staging: UniformStaging::new(aligned_size as usize),
            logical_size,
            pixel_density: if pixel_density > 0.0 { pixel_density } else { 1.0 },
            window_size: None,
            warned_overflow: false,
        };
        renderer.apply_size();
        renderer
    }

    fn align_to(size: u32, alignment: u32) -> u32 {
        (size + alignment - 1) & !(alignment - 1)
    }

    /// Records the window's current physical extent. Call before the matching
    /// logical resize so the surface tracks the window exactly.
    pub fn set_window_size(&mut self, size: PhysicalSize<u32>) {
        self.window_size = Some(size);
    }

    fn apply_size(&mut self) {
        let size = physical_extent(self.logical_size, self.pixel_density, self.window_size);
        if size != self.context.size {
            self.context.resize(size);
        }
    }

    fn mesh_slot(&mut self, geometry: &Geometry) -> usize {
        if let Some(index) = self.meshes.iter().position(|(g, _)| g == geometry) {
            return index;
        }
        log::debug!("Uploading mesh for {:?}", geometry);
        let mesh = Mesh::upload(&self.context.device, &MeshData::from_geometry(geometry));
        self.meshes.push((*geometry, mesh));
        self.meshes.len() - 1
    }

    fn light_uniforms(light: Option<&Light>) -> ([f32; 4], [f32; 4], [f32; 4], [f32; 4]) {
        let Some(light) = light else {
            return ([0.0, 0.0, 0.0, light_kind::NONE], [0.0; 4], [0.0; 4], [0.0; 4]);
        };

        let position = light.position();
        let direction = light.direction();
        let radiance = light.radiance();

        match *light {
            Light::Directional { .. } => (
                position.extend(light_kind::DIRECTIONAL).to_array(),
                direction.extend(0.0).to_array(),
                [radiance.r, radiance.g, radiance.b, 0.0],
                [0.0; 4],
            ),
            Light::Spot {
                angle,
                penumbra,
                decay,
                distance,
                ..
            } => (
                position.extend(light_kind::SPOT).to_array(),
                direction.extend(angle.cos()).to_array(),
                [radiance.r, radiance.g, radiance.b, decay],
                [distance, (angle * (1.0 - penumbra)).cos(), 0.0, 0.0],
            ),
        }
    }

    fn material_uniforms(material: &Material) -> ([f32; 4], [f32; 4], [f32; 4]) {
        let kind = match *material {
            Material::Basic { .. } => [shading::UNLIT, 0.0, 0.0, 0.0],
            Material::Lambert { .. } => [shading::LAMBERT, 0.0, 0.0, 0.0],
            Material::Standard {
                roughness,
                metalness,
                ..
            } => [shading::STANDARD, roughness, metalness, 0.0],
        };
        (material.color().to_array(), material.emissive().to_array(), kind)
    }
}

impl SceneRenderer for WgpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring and skipping frame");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if scene.lights().len() > 1 {
            log::debug!("Only the first of {} lights is shaded", scene.lights().len());
        }
        let (light_position, light_direction, light_color, light_params) =
            Self::light_uniforms(scene.lights().first());

        let view_proj = camera.view_projection().to_cols_array_2d();
        let camera_position = camera.position.extend(1.0).to_array();

        let mut slots = Vec::with_capacity(scene.objects().len());
        for object in scene.objects() {
            slots.push(self.mesh_slot(&object.geometry));
        }

        let staging = &mut self.staging;
        staging.clear();
        let mut draw_calls: Vec<DrawCall> = Vec::new();

        let mut push = |mesh: MeshSlot, model: Mat4, material: &Material| -> bool {
            let (color, emissive, material) = Self::material_uniforms(material);
            let uniforms = Uniforms {
                view_proj,
                model: model.to_cols_array_2d(),
                normal_matrix: model.inverse().transpose().to_cols_array_2d(),
                color,
                emissive,
                material,
                camera_position,
                light_position,
                light_direction,
                light_color,
                light_params,
            };

            let Some(offset) = staging.push(bytemuck::bytes_of(&uniforms)) else {
                return false;
            };
            draw_calls.push(DrawCall { mesh, offset });
            true
        };

        let mut overflow = false;
        for (object, slot) in scene.objects().iter().zip(slots) {
            let model = object.model_matrix();
            overflow |= !push(MeshSlot::Geometry(slot), model, &object.material);

            if let Some(sparkles) = &object.sparkles {
                let material = Material::Basic {
                    color: sparkles.config().color,
                };
                for (position, particle) in sparkles.positions().zip(sparkles.particles()) {
                    let size = sparkles.particle_size(particle);
                    let local = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(size));
                    overflow |= !push(MeshSlot::Sparkle, model * local, &material);
                }
            }
        }

        if overflow && !self.warned_overflow {
            log::warn!("Scene exceeds {} draws per frame, extra objects are skipped", MAX_INSTANCES);
            self.warned_overflow = true;
        }

        if !draw_calls.is_empty() {
            self.context
                .queue
                .write_buffer(&self.uniform_buffer, 0, self.staging.as_bytes());
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline.pipeline);

            for call in &draw_calls {
                render_pass.set_bind_group(0, &self.bind_group, &[call.offset]);
                match call.mesh {
                    MeshSlot::Geometry(index) => self.meshes[index].1.draw(&mut render_pass),
                    MeshSlot::Sparkle => self.sparkle_mesh.draw(&mut render_pass),
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn set_output_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width, height);
        self.apply_size();
    }

    fn output_size(&self) -> (u32, u32) {
        self.logical_size
    }

    fn set_pixel_density(&mut self, ratio: f64) {
        if ratio <= 0.0 {
            log::warn!("Ignoring non-positive pixel density {}", ratio);
            return;
        }
        self.pixel_density = ratio;
        self.apply_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_extent_survives_fractional_scale_factors() {
        for scale in [1.25, 1.5, 1.75] {
            for width in 990..1010 {
                let window = PhysicalSize::new(width, width + 3);
                let logical: LogicalSize<u32> = window.to_logical(scale);
                let extent = physical_extent((logical.width, logical.height), scale, Some(window));
                assert_eq!(extent, window, "scale {} width {}", scale, width);
            }
        }
    }

    #[test]
    fn stale_window_extent_falls_back_to_scaling() {
        let window = PhysicalSize::new(1600, 1200);
        let extent = physical_extent((640, 480), 2.0, Some(window));
        assert_eq!(extent, PhysicalSize::new(1280, 960));
    }

    #[test]
    fn staging_writes_only_used_slots_and_keeps_its_allocation() {
        let mut staging = UniformStaging::new(256);
        let capacity = staging.data.capacity();

        assert_eq!(staging.push(&[1; 4]), Some(0));
        assert_eq!(staging.push(&[2; 4]), Some(256));
        assert_eq!(staging.as_bytes().len(), 512);
        assert_eq!(&staging.as_bytes()[256..260], &[2; 4]);

        staging.clear();
        assert_eq!(staging.len(), 0);
        assert_eq!(staging.push(&[3; 4]), Some(0));
        assert_eq!(staging.as_bytes().len(), 256);
        assert_eq!(staging.data.capacity(), capacity);
    }

    #[test]
    fn staging_refuses_slots_past_the_buffer() {
        let mut staging = UniformStaging::new(16);
        for _ in 0..MAX_INSTANCES {
            assert!(staging.push(&[0; 16]).is_some());
        }
        assert_eq!(staging.push(&[0; 16]), None);
        assert_eq!(staging.len(), MAX_INSTANCES);
    }

    #[test]
    fn scaled_extent_is_never_empty() {
        assert_eq!(physical_extent((0, 0), 1.0, None), PhysicalSize::new(1, 1));
        assert_eq!(physical_extent((800, 600), 1.5, None), PhysicalSize::new(1200, 900));
    }
}
