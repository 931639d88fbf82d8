use glam::{DVec3, EulerRot, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Builds a transform from Euler angles applied in X, then Y, then Z order.
    ///
    /// Angles are accumulated in double precision and may grow without bound,
    /// so they are reduced modulo a full turn before narrowing to `f32`.
    pub fn from_position_euler(position: Vec3, euler: DVec3) -> Self {
        let x = euler.x.rem_euclid(std::f64::consts::TAU) as f32;
        let y = euler.y.rem_euclid(std::f64::consts::TAU) as f32;
        let z = euler.z.rem_euclid(std::f64::consts::TAU) as f32;

        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
            scale: Vec3::ONE,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn euler_rotation_about_y_turns_x_into_negative_z() {
        let transform =
            Transform::from_position_euler(Vec3::ZERO, DVec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
        let rotated = transform.to_matrix().transform_vector3(Vec3::X);

        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotated.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn large_angles_wrap_to_the_same_orientation() {
        let base = Transform::from_position_euler(Vec3::ZERO, DVec3::new(0.3, 0.7, 0.0));
        let wrapped = Transform::from_position_euler(
            Vec3::ZERO,
            DVec3::new(0.3 + 1000.0 * std::f64::consts::TAU, 0.7, 0.0),
        );

        let a = base.to_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        let b = wrapped.to_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn matrix_places_translation_in_last_column() {
        let transform = Transform::from_position(Vec3::new(0.0, -1.5, 0.0));
        let m = transform.to_matrix();
        assert_eq!(m.w_axis.truncate(), Vec3::new(0.0, -1.5, 0.0));
    }
}
