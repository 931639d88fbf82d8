use super::color::Color;
use glam::Vec3;

/// A light source. Both kinds aim at the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel rays travelling from `position` towards the origin.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    /// Cone of light emitted from `position` towards the origin.
    Spot {
        color: Color,
        intensity: f32,
        position: Vec3,
        /// Half-angle of the cone, in radians.
        angle: f32,
        /// Fraction of the cone that fades out at its edge, `0..=1`.
        penumbra: f32,
        /// Exponent of the distance falloff.
        decay: f32,
        /// Cut-off range; `0.0` means unlimited.
        distance: f32,
    },
}

impl Light {
    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            position,
        }
    }

    pub fn spot(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Spot {
            color,
            intensity,
            position,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            decay: 2.0,
            distance: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        match *self {
            Light::Directional { position, .. } | Light::Spot { position, .. } => position,
        }
    }

    /// Unit vector the light travels along.
    pub fn direction(&self) -> Vec3 {
        (-self.position()).normalize_or(Vec3::NEG_Y)
    }

    /// Color premultiplied by intensity.
    pub fn radiance(&self) -> Color {
        match *self {
            Light::Directional {
                color, intensity, ..
            }
            | Light::Spot {
                color, intensity, ..
            } => color.scaled(intensity),
        }
    }
}
