use approx::assert_abs_diff_eq;
use spin_scene::{frame_context, Camera, RenderError, Scene, ScenePreset, SceneRenderer};

struct NullRenderer((u32, u32));

impl SceneRenderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
        Ok(())
    }

    fn set_output_size(&mut self, width: u32, height: u32) {
        self.0 = (width, height);
    }

    fn output_size(&self) -> (u32, u32) {
        self.0
    }
}

#[test]
fn context_camera_matches_renderer_aspect() {
    let context = frame_context(ScenePreset::Basic.config(), NullRenderer((1280, 720)));
    assert_abs_diff_eq!(context.camera.aspect, 1280.0 / 720.0, epsilon = 1e-6);
    assert_abs_diff_eq!(context.camera.fov, 75f32.to_radians(), epsilon = 1e-6);
    assert_eq!(context.camera.position.z, 5.0);
}

#[test]
fn only_interactive_presets_get_a_controller() {
    let basic = frame_context(ScenePreset::Basic.config(), NullRenderer((1, 1)));
    assert!(basic.controller.is_none());

    for preset in [ScenePreset::Orbit, ScenePreset::Sparkles] {
        let context = frame_context(preset.config(), NullRenderer((1, 1)));
        assert!(context.controller.is_some(), "{} should orbit", preset);
    }
}

#[test]
fn orbit_camera_keeps_looking_at_origin() {
    let context = frame_context(ScenePreset::Orbit.config(), NullRenderer((800, 600)));
    assert_eq!(context.camera.target, glam::Vec3::ZERO);
    assert_abs_diff_eq!(context.camera.position.length(), 5.0, epsilon = 1e-4);
}

#[test]
fn zero_sized_renderer_still_builds_a_camera() {
    let context = frame_context(ScenePreset::Sparkles.config(), NullRenderer((0, 0)));
    assert!(context.camera.aspect.is_finite());
}
