use super::color::Color;
use super::sparkles::Sparkles;
use crate::math::Transform;
use glam::{DVec3, Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Dodecahedron {
        radius: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl Geometry {
    pub const UNIT_BOX: Self = Geometry::Box {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
    };

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: 32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Unlit, flat color.
    Basic { color: Color },
    /// Diffuse-only shading.
    Lambert { color: Color, emissive: Color },
    /// Diffuse plus a roughness-controlled specular lobe.
    Standard {
        color: Color,
        emissive: Color,
        roughness: f32,
        metalness: f32,
    },
}

impl Material {
    pub fn lambert(color: Color, emissive: Color) -> Self {
        Material::Lambert { color, emissive }
    }

    pub fn standard(color: Color, emissive: Color) -> Self {
        Material::Standard {
            color,
            emissive,
            roughness: 1.0,
            metalness: 0.0,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Material::Basic { color }
            | Material::Lambert { color, .. }
            | Material::Standard { color, .. } => color,
        }
    }

    pub fn emissive(&self) -> Color {
        match *self {
            Material::Basic { .. } => Color::BLACK,
            Material::Lambert { emissive, .. } | Material::Standard { emissive, .. } => emissive,
        }
    }
}

/// Index of an object inside its [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) usize);

/// A mesh placed in the scene, spinning by a fixed increment every frame.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, X then Y then Z. Never normalized.
    pub rotation: DVec3,
    /// Added to `rotation` once per frame.
    pub spin: DVec3,
    pub sparkles: Option<Sparkles>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: DVec3::ZERO,
            spin: DVec3::ZERO,
            sparkles: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_spin(mut self, spin: DVec3) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_sparkles(mut self, sparkles: Sparkles) -> Self {
        self.sparkles = Some(sparkles);
        self
    }

    /// Applies one frame of animation: one spin increment and one sparkle step.
    pub fn advance(&mut self) {
        self.rotation += self.spin;
        if let Some(sparkles) = &mut self.sparkles {
            sparkles.advance();
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_euler(self.position, self.rotation)
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform().to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::sparkles::SparklesConfig;

    fn cube() -> SceneObject {
        let color = Color::from_hex(0x468585);
        SceneObject::new("cube", Geometry::UNIT_BOX, Material::lambert(color, color))
    }

    #[test]
    fn advance_adds_spin_without_normalizing() {
        let mut object = cube().with_spin(DVec3::new(4.0, 0.0, 0.0));
        object.advance();
        object.advance();
        assert_eq!(object.rotation, DVec3::new(8.0, 0.0, 0.0));
    }

    #[test]
    fn advance_steps_attached_sparkles() {
        let mut object = cube().with_sparkles(Sparkles::new(SparklesConfig {
            speed: 0.5,
            ..Default::default()
        }));
        object.advance();
        assert_eq!(object.sparkles.as_ref().map(Sparkles::phase), Some(0.5));
    }

    #[test]
    fn basic_material_has_no_emission() {
        let material = Material::Basic {
            color: Color::WHITE,
        };
        assert_eq!(material.emissive(), Color::BLACK);
        assert_eq!(material.color(), Color::WHITE);
    }
}
