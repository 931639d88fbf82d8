//! Math utilities module
//!
//! Provides convenient re-exports from glam and the object transform helper.

mod transform;

pub use transform::Transform;

// Re-export commonly used glam types
pub use glam::{DVec3, Mat4, Quat, Vec3};
