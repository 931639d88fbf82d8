use crate::driver::InteractionController;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Perspective camera.
///
/// The projection matrix is cached: changing `fov`, `aspect`, `near` or `far`
/// has no effect until [`Camera::update_projection_matrix`] is called.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75.0, 1.0, 0.1, 1000.0)
    }
}

impl Camera {
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or(Vec3::X)
    }

    pub fn camera_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }
}

/// Pointer input delivered by the host, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(PointerButton),
    Released(PointerButton),
    Moved { x: f32, y: f32 },
    /// Positive values zoom in.
    Wheel(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_rotate: bool,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
            enable_pan: true,
            enable_rotate: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Idle,
    Rotate,
    Pan,
    Dolly,
}

/// Orbits the camera around a target point.
///
/// Input accumulates pending deltas; [`OrbitControls::update`] applies them
/// once per frame. With damping enabled only `damping_factor` of the pending
/// motion is applied per update and the remainder decays geometrically, so
/// motion keeps easing out after input stops as long as `update` is called.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
    drag: DragMode,
    last_pointer: Option<(f32, f32)>,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            target: Vec3::ZERO,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: DragMode::Idle,
            last_pointer: None,
        }
    }

    /// Pending motion that the next updates will still apply.
    pub fn is_moving(&self) -> bool {
        self.delta_theta != 0.0 || self.delta_phi != 0.0 || self.pan_offset != Vec3::ZERO || self.scale != 1.0
    }

    pub fn rotate_left(&mut self, angle: f32) {
        if self.settings.enable_rotate {
            self.delta_theta -= angle;
        }
    }

    pub fn rotate_up(&mut self, angle: f32) {
        if self.settings.enable_rotate {
            self.delta_phi -= angle;
        }
    }

    /// Moves the target in the camera's screen plane by world-space distances.
    pub fn pan(&mut self, camera: &Camera, right: f32, up: f32) {
        if self.settings.enable_pan {
            self.pan_offset += camera.right() * -right + camera.camera_up() * up;
        }
    }

    /// Scales the orbit distance; `steps > 0` moves closer.
    pub fn dolly(&mut self, steps: f32) {
        if self.settings.enable_zoom {
            self.scale *= 0.95_f32.powf(self.zoom_speed * steps);
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, viewport_height: u32, camera: &Camera) {
        let height = viewport_height.max(1) as f32;

        match event {
            PointerEvent::Pressed(button) => {
                self.drag = match button {
                    PointerButton::Primary => DragMode::Rotate,
                    PointerButton::Secondary => DragMode::Pan,
                    PointerButton::Middle => DragMode::Dolly,
                };
            }
            PointerEvent::Released(_) => self.drag = DragMode::Idle,
            PointerEvent::Moved { x, y } => {
                let (dx, dy) = match self.last_pointer {
                    Some((lx, ly)) => (x - lx, y - ly),
                    None => (0.0, 0.0),
                };
                self.last_pointer = Some((x, y));

                match self.drag {
                    DragMode::Rotate => {
                        self.rotate_left(TAU * dx / height * self.rotate_speed);
                        self.rotate_up(TAU * dy / height * self.rotate_speed);
                    }
                    DragMode::Pan => {
                        let distance = (camera.position - self.target).length() * (camera.fov * 0.5).tan();
                        let scale = 2.0 * distance / height * self.pan_speed;
                        self.pan(camera, dx * scale, dy * scale);
                    }
                    DragMode::Dolly => self.dolly(-dy * 0.1),
                    DragMode::Idle => {}
                }
            }
            PointerEvent::Wheel(delta) => self.dolly(delta.signum()),
        }
    }

    /// Applies pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI * 0.5)
        };

        let (step_theta, step_phi, step_pan) = if self.settings.enable_damping {
            let f = self.settings.damping_factor;
            (self.delta_theta * f, self.delta_phi * f, self.pan_offset * f)
        } else {
            (self.delta_theta, self.delta_phi, self.pan_offset)
        };

        theta += step_theta;
        phi = (phi + step_phi)
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        self.target += step_pan;
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_position = self.target + new_offset;

        if self.settings.enable_damping {
            let decay = 1.0 - self.settings.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
            if self.delta_theta.abs() < EPS {
                self.delta_theta = 0.0;
            }
            if self.delta_phi.abs() < EPS {
                self.delta_phi = 0.0;
            }
            if self.pan_offset.length_squared() < EPS * EPS {
                self.pan_offset = Vec3::ZERO;
            }
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = new_position.distance_squared(camera.position) > EPS || camera.target != self.target;
        camera.position = new_position;
        camera.target = self.target;
        moved
    }
}

impl InteractionController for OrbitControls {
    fn update(&mut self, camera: &mut Camera) -> bool {
        OrbitControls::update(self, camera)
    }

    fn handle_pointer(&mut self, event: PointerEvent, viewport: (u32, u32), camera: &Camera) {
        OrbitControls::handle_pointer(self, event, viewport.1, camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera_at_z5() -> Camera {
        let mut camera = Camera::perspective(75.0, 1.0, 0.1, 1000.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.target = Vec3::ZERO;
        camera
    }

    #[test]
    fn aspect_change_needs_explicit_projection_update() {
        let mut camera = Camera::default();
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(75.0_f32.to_radians(), 2.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn update_without_input_keeps_camera_still() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings::default());
        assert!(!controls.update(&mut camera));
        assert_abs_diff_eq!(camera.position.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn undamped_rotation_lands_in_one_update() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..Default::default()
        });

        controls.rotate_left(-std::f32::consts::FRAC_PI_2);
        assert!(controls.update(&mut camera));
        assert!(!controls.is_moving());
        assert_abs_diff_eq!(camera.position.x, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn damped_rotation_eases_out_and_settles() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings::default());
        controls.rotate_left(-1.0);

        controls.update(&mut camera);
        let first_step = camera.position.x;
        assert!(first_step > 0.0);
        assert!(controls.is_moving());

        for _ in 0..1000 {
            controls.update(&mut camera);
        }
        assert!(!controls.is_moving());
        // Geometric series of `factor * (1 - factor)^n` sums to the full input.
        let theta = camera.position.x.atan2(camera.position.z);
        assert_abs_diff_eq!(theta, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..Default::default()
        });
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        assert!(camera.position.y > 0.0);
        assert!(camera.position.y <= 5.0);
    }

    #[test]
    fn disabled_zoom_ignores_wheel() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_zoom: false,
            ..Default::default()
        });
        controls.handle_pointer(PointerEvent::Wheel(1.0), 600, &camera);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.position.length(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn wheel_forward_moves_closer() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings::default());
        controls.handle_pointer(PointerEvent::Wheel(3.0), 600, &camera);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.position.length(), 4.75, epsilon = 1e-4);
    }

    #[test]
    fn secondary_drag_pans_target() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..Default::default()
        });

        controls.handle_pointer(PointerEvent::Moved { x: 100.0, y: 100.0 }, 600, &camera);
        controls.handle_pointer(PointerEvent::Pressed(PointerButton::Secondary), 600, &camera);
        controls.handle_pointer(PointerEvent::Moved { x: 160.0, y: 100.0 }, 600, &camera);
        controls.update(&mut camera);

        assert!(camera.target.x < 0.0);
        assert_abs_diff_eq!(camera.target.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.position.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn primary_drag_only_rotates_while_pressed() {
        let mut camera = camera_at_z5();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..Default::default()
        });

        controls.handle_pointer(PointerEvent::Moved { x: 0.0, y: 0.0 }, 600, &camera);
        controls.handle_pointer(PointerEvent::Moved { x: 50.0, y: 0.0 }, 600, &camera);
        assert!(!controls.is_moving());

        controls.handle_pointer(PointerEvent::Pressed(PointerButton::Primary), 600, &camera);
        controls.handle_pointer(PointerEvent::Moved { x: 100.0, y: 0.0 }, 600, &camera);
        assert!(controls.is_moving());

        controls.handle_pointer(PointerEvent::Released(PointerButton::Primary), 600, &camera);
        controls.update(&mut camera);
        controls.handle_pointer(PointerEvent::Moved { x: 200.0, y: 0.0 }, 600, &camera);
        assert!(!controls.is_moving());
    }
}
