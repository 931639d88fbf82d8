//! Scene description
//!
//! Plain data consumed by the renderer: objects with their geometry and
//! material, lights, and the background color. Presets reproduce the stock
//! demo scenes.

pub mod color;
pub mod light;
pub mod object;
pub mod preset;
pub mod sparkles;

pub use color::{Color, ColorParseError};
pub use light::Light;
pub use object::{Geometry, Material, ObjectId, SceneObject};
pub use preset::{SceneConfig, ScenePreset};
pub use sparkles::{Particle, Sparkles, SparklesConfig};

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_address_objects_in_insertion_order() {
        let mut scene = Scene::default();
        let a = scene.add(SceneObject::new(
            "a",
            Geometry::UNIT_BOX,
            Material::Basic { color: Color::WHITE },
        ));
        let b = scene.add(SceneObject::new(
            "b",
            Geometry::Dodecahedron { radius: 1.0 },
            Material::Basic { color: Color::WHITE },
        ));

        assert_eq!(scene.object(a).map(|o| o.name.as_str()), Some("a"));
        assert_eq!(scene.object(b).map(|o| o.name.as_str()), Some("b"));
        assert!(scene.find("c").is_none());
    }
}
