use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::WorldConfig;
use crate::model::environment::Environment;

/// Distance of the directional light from the origin on the ground plane.
const LIGHT_ORBIT_RADIUS: f32 = 200.0;
const LIGHT_HEIGHT: f32 = 150.0;
/// Orbit angle advanced per millisecond of wall time.
const ORBIT_RATE: f64 = 0.00001;

/// Everything around the avatar: decoration, ground extents and the sun.
pub struct Scene {
    pub environment: Environment,
    pub ground_radius: f32,
    pub ocean_radius: f32,
    pub light_position: Vec3,
    pub sun_position: Vec3,
    pub seed: u64,
}

impl Scene {
    pub fn new(config: &WorldConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let environment = Environment::generate(config, &mut rng);
        info!(seed, "scene generated");

        let mut scene = Self {
            environment,
            ground_radius: config.ground_radius,
            ocean_radius: config.ground_radius * 2.0,
            light_position: Vec3::ZERO,
            sun_position: Vec3::ZERO,
            seed,
        };
        scene.update(0.0);
        scene
    }

    /// Swing the light and the visible sun around the scene.
    pub fn update(&mut self, now_ms: f64) {
        let angle = now_ms * ORBIT_RATE;
        let x = angle.sin() as f32 * LIGHT_ORBIT_RADIUS;
        let z = angle.cos() as f32 * LIGHT_ORBIT_RADIUS;
        self.light_position = Vec3::new(x, LIGHT_HEIGHT, z);
        self.sun_position = Vec3::new(x / 4.0, 15.0, z / 4.0);
    }
}
