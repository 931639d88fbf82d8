use crate::scene::Geometry;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side triangle list with counter-clockwise front faces.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => Self::cuboid(width, height, depth),
            Geometry::Dodecahedron { radius } => Self::dodecahedron(radius),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => Self::cylinder(radius_top, radius_bottom, height, radial_segments),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Adds a flat convex polygon as a triangle fan. `corners` must wind
    /// counter-clockwise when seen from the side `normal` points to.
    fn push_polygon(&mut self, corners: &[Vec3], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners.iter().map(|&p| Vertex::new(p, normal)));
        for i in 1..corners.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let mut mesh = Self::default();

        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        for (normal, u, v) in faces {
            let center = normal * half;
            let u = u * half;
            let v = v * half;
            mesh.push_polygon(
                &[center - u - v, center + u - v, center + u + v, center - u + v],
                normal,
            );
        }

        mesh
    }

    /// Regular dodecahedron with its vertices on a sphere of `radius`.
    pub fn dodecahedron(radius: f32) -> Self {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let inv = 1.0 / phi;

        let mut corners = Vec::with_capacity(20);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        for a in [-1.0, 1.0] {
            for b in [-1.0, 1.0] {
                corners.push(Vec3::new(0.0, a * inv, b * phi));
                corners.push(Vec3::new(a * inv, b * phi, 0.0));
                corners.push(Vec3::new(a * phi, 0.0, b * inv));
            }
        }
        let scale = radius / 3.0_f32.sqrt();
        for c in &mut corners {
            *c *= scale;
        }

        // Face normals of a dodecahedron are the vertices of an icosahedron.
        let mut normals = Vec::with_capacity(12);
        for a in [-1.0, 1.0] {
            for b in [-1.0, 1.0] {
                normals.push(Vec3::new(0.0, a * phi, b).normalize());
                normals.push(Vec3::new(a * phi, b, 0.0).normalize());
                normals.push(Vec3::new(b, 0.0, a * phi).normalize());
            }
        }

        let mut mesh = Self::default();
        for normal in normals {
            let max_dot = corners
                .iter()
                .map(|c| c.dot(normal))
                .fold(f32::MIN, f32::max);
            let mut face: Vec<Vec3> = corners
                .iter()
                .copied()
                .filter(|c| c.dot(normal) > max_dot - 1e-4 * radius.max(1.0))
                .collect();

            let center = face.iter().copied().sum::<Vec3>() / face.len() as f32;
            let u = (face[0] - center).normalize();
            let w = normal.cross(u);
            face.sort_by(|a, b| {
                let angle_a = (*a - center).dot(w).atan2((*a - center).dot(u));
                let angle_b = (*b - center).dot(w).atan2((*b - center).dot(u));
                angle_a.total_cmp(&angle_b)
            });

            mesh.push_polygon(&face, normal);
        }

        mesh
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half_height = height / 2.0;
        let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
        let mut mesh = Self::default();

        for i in 0..=segments {
            let theta = TAU * i as f32 / segments as f32;
            let (z, x) = theta.sin_cos();
            let normal = Vec3::new(x, slope, z).normalize();

            mesh.vertices.push(Vertex::new(
                Vec3::new(x * radius_bottom, -half_height, z * radius_bottom),
                normal,
            ));
            mesh.vertices.push(Vertex::new(
                Vec3::new(x * radius_top, half_height, z * radius_top),
                normal,
            ));
        }

        for i in 0..segments {
            let base = i * 2;
            mesh.indices.extend_from_slice(&[base, base + 1, base + 3]);
            mesh.indices.extend_from_slice(&[base, base + 3, base + 2]);
        }

        for (y, radius, normal) in [
            (-half_height, radius_bottom, Vec3::NEG_Y),
            (half_height, radius_top, Vec3::Y),
        ] {
            if radius <= 0.0 {
                continue;
            }
            let mut rim: Vec<Vec3> = (0..segments)
                .map(|i| {
                    let theta = TAU * i as f32 / segments as f32;
                    let (z, x) = theta.sin_cos();
                    Vec3::new(x * radius, y, z * radius)
                })
                .collect();
            // Increasing theta winds clockwise seen from above.
            if normal.y > 0.0 {
                rim.reverse();
            }
            mesh.push_polygon(&rim, normal);
        }

        mesh
    }

    /// Small diamond used for sparkle particles.
    pub fn octahedron(radius: f32) -> Self {
        let mut mesh = Self::default();
        for sx in [-1.0_f32, 1.0] {
            for sy in [-1.0_f32, 1.0] {
                for sz in [-1.0_f32, 1.0] {
                    let a = Vec3::X * sx * radius;
                    let b = Vec3::Y * sy * radius;
                    let c = Vec3::Z * sz * radius;
                    let normal = Vec3::new(sx, sy, sz).normalize();
                    if sx * sy * sz > 0.0 {
                        mesh.push_polygon(&[a, b, c], normal);
                    } else {
                        mesh.push_polygon(&[a, c, b], normal);
                    }
                }
            }
        }
        mesh
    }
}

pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Every triangle's winding must agree with its stored normal.
    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.vertices[tri[k] as usize].position));
            let face = (b - a).cross(c - a);
            let stored = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face.dot(stored) > 0.0, "triangle {tri:?} winds against its normal");
        }
    }

    #[test]
    fn cuboid_has_six_quads_with_outward_faces() {
        let mesh = MeshData::cuboid(2.0, 0.1, 2.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward_winding(&mesh);

        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_abs_diff_eq!(max_y, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn dodecahedron_has_twelve_pentagons_on_the_sphere() {
        let mesh = MeshData::dodecahedron(1.0);
        assert_eq!(mesh.vertices.len(), 60);
        assert_eq!(mesh.triangle_count(), 36);
        assert_outward_winding(&mesh);

        for v in &mesh.vertices {
            assert_abs_diff_eq!(Vec3::from(v.position).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn cylinder_sides_and_caps_face_outward() {
        let mesh = MeshData::cylinder(1.0, 1.0, 1.0, 16);
        assert_eq!(mesh.triangle_count(), 16 * 2 + 14 * 2);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn cone_skips_the_degenerate_cap() {
        let mesh = MeshData::cylinder(0.0, 1.0, 2.0, 8);
        assert_eq!(mesh.triangle_count(), 8 * 2 + 6);
    }

    #[test]
    fn octahedron_faces_point_away_from_center() {
        let mesh = MeshData::octahedron(0.5);
        assert_eq!(mesh.triangle_count(), 8);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn geometry_dispatch_picks_the_right_builder() {
        let mesh = MeshData::from_geometry(&Geometry::UNIT_BOX);
        assert_eq!(mesh.triangle_count(), 12);
    }
}
