use super::color::Color;
use super::light::Light;
use super::object::{Geometry, Material, SceneObject};
use super::sparkles::{Sparkles, SparklesConfig};
use super::Scene;
use crate::render::camera::{Camera, OrbitSettings};
use glam::{DVec3, Vec3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TEAL: u32 = 0x468585;
const MINT: u32 = 0x9cdba6;
const STONE: u32 = 0xb4b4b3;
const PAPER: u32 = 0xf0f0f0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scene preset `{0}` (expected one of: basic, orbit, sparkles)")]
pub struct UnknownPreset(pub String);

/// The stock demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePreset {
    /// A spinning cube under a directional light. No camera controls.
    #[default]
    Basic,
    /// A spinning dodecahedron over a slowly turning slab, lit by a spot
    /// light, with damped orbit controls.
    Orbit,
    /// A spinning cylinder wrapped in sparkles, with orbit controls.
    Sparkles,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 3] = [ScenePreset::Basic, ScenePreset::Orbit, ScenePreset::Sparkles];

    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Basic => "basic",
            ScenePreset::Orbit => "orbit",
            ScenePreset::Sparkles => "sparkles",
        }
    }

    pub fn config(self) -> SceneConfig {
        match self {
            ScenePreset::Basic => basic(),
            ScenePreset::Orbit => orbit(),
            ScenePreset::Sparkles => sparkles(),
        }
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

impl CameraConfig {
    pub fn build(&self, aspect: f32) -> Camera {
        let mut camera = Camera::perspective(self.fov_degrees, aspect, self.near, self.far);
        camera.position = self.position;
        camera.update_projection_matrix();
        camera
    }
}

/// Everything needed to stand up one demo: the scene content, the camera,
/// optional orbit controls, and whether output follows the display's pixel
/// density.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub scene: Scene,
    pub camera: CameraConfig,
    pub controls: Option<OrbitSettings>,
    pub follow_pixel_density: bool,
}

impl SceneConfig {
    pub fn without_damping(mut self) -> Self {
        if let Some(controls) = &mut self.controls {
            controls.enable_damping = false;
        }
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.scene.background = background;
        self
    }
}

fn basic() -> SceneConfig {
    let mut scene = Scene::new(Color::from_hex(PAPER));
    let teal = Color::from_hex(TEAL);

    scene.add(
        SceneObject::new("cube", Geometry::UNIT_BOX, Material::lambert(teal, teal))
            .with_spin(DVec3::new(0.01, 0.01, 0.0)),
    );
    scene.add_light(Light::directional(Color::from_hex(MINT), 10.0, Vec3::ONE));

    SceneConfig {
        scene,
        camera: CameraConfig::default(),
        controls: None,
        follow_pixel_density: false,
    }
}

fn orbit() -> SceneConfig {
    let mut scene = Scene::new(Color::from_hex(PAPER));
    let teal = Color::from_hex(TEAL);
    let stone = Color::from_hex(STONE);

    scene.add(
        SceneObject::new(
            "dodecahedron",
            Geometry::Dodecahedron { radius: 1.0 },
            Material::lambert(teal, teal),
        )
        .with_spin(DVec3::new(0.01, 0.01, 0.0)),
    );
    scene.add(
        SceneObject::new(
            "slab",
            Geometry::Box {
                width: 2.0,
                height: 0.1,
                depth: 2.0,
            },
            Material::standard(stone, stone),
        )
        .with_position(Vec3::new(0.0, -1.5, 0.0))
        .with_spin(DVec3::new(0.0, 0.005, 0.0)),
    );
    // White at unit intensity: the stock scene never actually tints this light.
    scene.add_light(Light::spot(Color::WHITE, 1.0, Vec3::ONE));

    SceneConfig {
        scene,
        camera: CameraConfig::default(),
        controls: Some(OrbitSettings {
            enable_damping: true,
            damping_factor: 0.05,
            enable_zoom: true,
            enable_pan: true,
            enable_rotate: true,
        }),
        follow_pixel_density: true,
    }
}

fn sparkles() -> SceneConfig {
    let mut scene = Scene::new(Color::from_hex(PAPER));
    let teal = Color::from_hex(TEAL);

    scene.add(
        SceneObject::new(
            "cylinder",
            Geometry::cylinder(1.0, 1.0, 1.0),
            Material::lambert(teal, teal),
        )
        .with_spin(DVec3::new(0.01, 0.01, 0.0))
        .with_sparkles(Sparkles::new(SparklesConfig {
            count: 100,
            scale: 1.0,
            size: 6.0,
            speed: 0.002,
            noise: 0.2,
            color: Color::from_hex(0xffa500),
            ..Default::default()
        })),
    );
    scene.add_light(Light::directional(Color::from_hex(MINT), 10.0, Vec3::ONE));

    SceneConfig {
        scene,
        camera: CameraConfig::default(),
        controls: Some(OrbitSettings::default()),
        follow_pixel_density: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_scene_is_one_cube_without_controls() {
        let config = ScenePreset::Basic.config();
        assert_eq!(config.scene.objects().len(), 1);
        assert!(config.controls.is_none());
        assert!(!config.follow_pixel_density);

        let cube = &config.scene.objects()[0];
        assert_eq!(cube.geometry, Geometry::UNIT_BOX);
        assert_eq!(cube.spin, DVec3::new(0.01, 0.01, 0.0));
        assert_eq!(cube.material.color(), Color::from_hex(TEAL));
        assert_eq!(cube.material.emissive(), Color::from_hex(TEAL));
    }

    #[test]
    fn orbit_scene_has_slab_below_and_damped_controls() {
        let config = ScenePreset::Orbit.config();
        let slab = config.scene.find("slab").expect("slab");
        assert_eq!(slab.position, Vec3::new(0.0, -1.5, 0.0));
        assert_eq!(slab.spin, DVec3::new(0.0, 0.005, 0.0));

        let controls = config.controls.expect("orbit controls");
        assert!(controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.05);
        assert!(matches!(config.scene.lights()[0], Light::Spot { .. }));
    }

    #[test]
    fn sparkles_scene_attaches_a_hundred_particles() {
        let config = ScenePreset::Sparkles.config();
        let cylinder = config.scene.find("cylinder").expect("cylinder");
        assert_eq!(cylinder.sparkles.as_ref().map(Sparkles::len), Some(100));
        assert!(config.controls.is_some());
    }

    #[test]
    fn every_preset_shares_camera_and_background() {
        for preset in ScenePreset::ALL {
            let config = preset.config();
            assert_eq!(config.camera, CameraConfig::default());
            assert_eq!(config.scene.background, Color::from_hex(PAPER));
            assert_eq!(config.scene.lights().len(), 1);
        }
    }

    #[test]
    fn preset_names_round_trip_through_from_str() {
        for preset in ScenePreset::ALL {
            assert_eq!(preset.name().parse::<ScenePreset>(), Ok(preset));
        }
        assert_eq!("ORBIT".parse::<ScenePreset>(), Ok(ScenePreset::Orbit));
        assert!("teapot".parse::<ScenePreset>().is_err());
    }

    #[test]
    fn without_damping_only_touches_controls() {
        let config = ScenePreset::Orbit.config().without_damping();
        assert_eq!(config.controls.map(|c| c.enable_damping), Some(false));
        assert!(ScenePreset::Basic.config().without_damping().controls.is_none());
    }

    #[test]
    fn background_override_accepts_parsed_css_color() {
        let background: Color = "#202830".parse().unwrap();
        let config = ScenePreset::Sparkles.config().with_background(background);
        assert_eq!(config.scene.background, Color::from_hex(0x202830));
        assert_eq!(config.scene.objects().len(), 1);
    }

    #[test]
    fn camera_config_builds_projection_for_aspect() {
        let camera = CameraConfig::default().build(2.0);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
    }
}
