//! Tunables for the avatar, camera rig, world decoration and intro sequence.
//!
//! Every section deserializes with defaults, so a config file only needs the
//! fields it changes.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::tween::Ease;

/// Upper bound (exclusive) for `PlayerConfig::wrap_tolerance`.
pub const MAX_WRAP_TOLERANCE: f32 = std::f32::consts::FRAC_PI_4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub world: WorldConfig,
    pub intro: IntroConfig,
    pub logging: LogConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let p = &self.player;
        if p.size <= 0.0 {
            return invalid("player.size must be positive");
        }
        if p.movement_speed < 0.0 || p.jump_speed <= 0.0 {
            return invalid("player speeds must be non-negative (jump_speed positive)");
        }
        if !p.jump_height.is_finite() || p.jump_height <= 0.0 {
            return invalid("player.jump_height must be positive");
        }
        if p.rotate_duration < 0.0 {
            return invalid("player.rotate_duration must be non-negative");
        }
        // Wider windows would reach a canonical yaw and snap it away.
        if !(0.0..MAX_WRAP_TOLERANCE).contains(&p.wrap_tolerance) {
            return invalid("player.wrap_tolerance must be in [0, pi/4)");
        }

        let c = &self.camera;
        let f = &c.follow;
        if c.position_duration < 0.0 || f.x < 0.0 || f.y < 0.0 || f.z < 0.0 {
            return invalid("camera durations must be non-negative");
        }
        if c.z_near <= 0.0 || c.z_far <= c.z_near {
            return invalid("camera clip planes must satisfy 0 < z_near < z_far");
        }

        let w = &self.world;
        if !w.tree_size.is_ordered() || !w.rock_size.is_ordered() || !w.spawn_area.is_ordered() {
            return invalid("world ranges must have min <= max");
        }
        if w.rock_count > 0 && w.rock_colors.is_empty() {
            return invalid("world.rock_colors must not be empty when rocks are placed");
        }

        let i = &self.intro;
        if i.fall_duration < 0.0 || i.delay < 0.0 || i.settle < 0.0 {
            return invalid("intro timings must be non-negative");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Edge length of the avatar cube; the avatar rests at half of it.
    pub size: f32,
    pub body_color: u32,
    pub eye_color: u32,
    /// Ground distance covered per tick while a direction is held.
    pub movement_speed: f32,
    /// Jump phase advance per tick (radians of the sine arc).
    pub jump_speed: f32,
    /// Peak height of the jump arc above rest, whatever the cube size.
    pub jump_height: f32,
    pub rotate_duration: f32,
    /// Distance from a wrap boundary at which yaw snaps to its twin.
    pub wrap_tolerance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 0.5,
            body_color: 0x5bbaee,
            eye_color: 0x000000,
            movement_speed: 0.05,
            jump_speed: 0.06,
            jump_height: 1.0,
            // anything much above 0.11 lets turns overlap visibly
            rotate_duration: 0.1,
            wrap_tolerance: 0.05,
        }
    }
}

/// Per-axis look-at lag in seconds; zero snaps that axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowDurations {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for FollowDurations {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5, z: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: Vec3,
    pub position_duration: f32,
    pub follow: FollowDurations,
    pub ease: Ease,
    pub fov_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 3.0, 8.0),
            position_duration: 1.0,
            follow: FollowDurations::default(),
            ease: Ease::Power1Out,
            fov_deg: 75.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed placement seed; a fresh one is drawn when unset.
    pub seed: Option<u64>,
    pub ground_radius: f32,
    pub tree_count: usize,
    pub tree_size: Span,
    pub golden_tree_chance: f64,
    pub rock_count: usize,
    pub rock_size: Span,
    pub rock_colors: Vec<u32>,
    /// Square placement area on both x and z.
    pub spawn_area: Span,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ground_radius: 30.0,
            tree_count: 100,
            tree_size: Span::new(0.5, 1.5),
            golden_tree_chance: 0.1,
            rock_count: 150,
            rock_size: Span::new(0.05, 0.2),
            rock_colors: vec![0x555555, 0xaaaaaa, 0xcccccc, 0xaaaaaa],
            spawn_area: Span::new(-20.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub enabled: bool,
    pub start_height: f32,
    pub fall_duration: f32,
    pub delay: f32,
    /// Extra time after landing before the vertical look-at lag is restored.
    pub settle: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_height: 50.0,
            fall_duration: 5.0,
            delay: 0.0,
            settle: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub level: String,
    /// Daily-rolling log file (native only).
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
