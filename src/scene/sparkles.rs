use super::color::Color;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DRIFT_AMPLITUDE: f32 = 0.2;
const NOISE_FREQUENCY: f32 = 100.0;
const PIXELS_TO_WORLD: f32 = 0.01;

/// Parameters of a sparkle field attached to a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklesConfig {
    pub count: usize,
    /// Edge length of the cube the particles are scattered in.
    pub scale: f32,
    /// Particle size, in nominal pixels.
    pub size: f32,
    /// Phase advance per frame.
    pub speed: f32,
    pub noise: f32,
    pub color: Color,
    pub seed: u64,
}

impl Default for SparklesConfig {
    fn default() -> Self {
        Self {
            count: 100,
            scale: 1.0,
            size: 6.0,
            speed: 0.002,
            noise: 0.2,
            color: Color::from_hex(0xffa500),
            seed: 0x5eed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub base: Vec3,
    /// Relative size in `0.5..=1.0`.
    pub size_factor: f32,
}

/// Slowly drifting particles, expressed in the parent object's local space.
#[derive(Debug, Clone)]
pub struct Sparkles {
    config: SparklesConfig,
    particles: Vec<Particle>,
    phase: f32,
}

impl Sparkles {
    pub fn new(config: SparklesConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let half = config.scale * 0.5;

        let particles = (0..config.count)
            .map(|_| Particle {
                base: Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                ),
                size_factor: rng.gen_range(0.5..=1.0),
            })
            .collect();

        Self {
            config,
            particles,
            phase: 0.0,
        }
    }

    pub fn config(&self) -> &SparklesConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn advance(&mut self) {
        self.phase += self.config.speed;
    }

    /// World-space edge length of a particle with the given size factor.
    pub fn particle_size(&self, particle: &Particle) -> f32 {
        self.config.size * particle.size_factor * PIXELS_TO_WORLD
    }

    /// Current local-space positions, displaced along each axis by the drift.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let noise = self.config.noise * NOISE_FREQUENCY;
        self.particles.iter().map(move |p| {
            let t = self.phase + p.base.x * noise;
            p.base + Vec3::new(t.cos(), t.sin(), t.cos()) * DRIFT_AMPLITUDE
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_scatters_identically() {
        let a = Sparkles::new(SparklesConfig::default());
        let b = Sparkles::new(SparklesConfig::default());
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn particles_stay_inside_the_configured_cube() {
        let sparkles = Sparkles::new(SparklesConfig {
            scale: 2.0,
            ..Default::default()
        });
        for p in sparkles.particles() {
            assert!(p.base.abs().max_element() <= 1.0);
            assert!((0.5..=1.0).contains(&p.size_factor));
        }
    }

    #[test]
    fn advance_moves_phase_by_speed_each_frame() {
        let mut sparkles = Sparkles::new(SparklesConfig {
            speed: 0.25,
            ..Default::default()
        });
        sparkles.advance();
        sparkles.advance();
        assert_eq!(sparkles.phase(), 0.5);
    }

    #[test]
    fn drift_is_bounded_by_amplitude() {
        let mut sparkles = Sparkles::new(SparklesConfig::default());
        for _ in 0..50 {
            sparkles.advance();
        }
        for (pos, p) in sparkles.positions().zip(sparkles.particles()) {
            assert!((pos - p.base).abs().max_element() <= DRIFT_AMPLITUDE + 1e-6);
        }
    }
}
