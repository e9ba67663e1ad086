use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

/// The second representation of "down", below zero.
pub const DOWN_BELOW_ZERO: f32 = -FRAC_PI_2;

/// Canonical cardinal orientation of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    /// Yaw in `[0, 2π)` for this facing.
    pub fn canonical_yaw(self) -> f32 {
        match self {
            Facing::Up => FRAC_PI_2,
            Facing::Left => PI,
            Facing::Down => 3.0 * FRAC_PI_2,
            Facing::Right => 0.0,
        }
    }

    /// Yaw to turn toward from `yaw`, picking whichever twin of down (3π/2 or
    /// −π/2) and right (0 or 2π) lies on the shorter side.
    pub fn target_yaw(self, yaw: f32) -> f32 {
        match self {
            Facing::Up => FRAC_PI_2,
            Facing::Left => PI,
            Facing::Down if yaw >= FRAC_PI_2 => 3.0 * FRAC_PI_2,
            Facing::Down => DOWN_BELOW_ZERO,
            Facing::Right if yaw <= PI => 0.0,
            Facing::Right => TAU,
        }
    }

    /// Nearest facing to an arbitrary yaw.
    pub fn from_yaw(yaw: f32) -> Facing {
        let quarter = (yaw.rem_euclid(TAU) / FRAC_PI_2).round() as i32 % 4;
        match quarter {
            0 => Facing::Right,
            1 => Facing::Up,
            2 => Facing::Left,
            _ => Facing::Down,
        }
    }

    /// Unit ground displacement for one step in this direction.
    pub fn step(self) -> Vec3 {
        match self {
            Facing::Up => Vec3::NEG_Z,
            Facing::Down => Vec3::Z,
            Facing::Left => Vec3::NEG_X,
            Facing::Right => Vec3::X,
        }
    }
}

/// Movement intents, set by the input layer and read once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MovementIntent {
    pub fn toward(facing: Facing) -> Self {
        let mut intent = Self::default();
        intent.set(facing, true);
        intent
    }

    pub fn set(&mut self, facing: Facing, held: bool) {
        match facing {
            Facing::Up => self.up = held,
            Facing::Down => self.down = held,
            Facing::Left => self.left = held,
            Facing::Right => self.right = held,
        }
    }

    /// Held directions in processing order: up, down, left, right.
    pub fn directions(&self) -> impl Iterator<Item = Facing> + '_ {
        Facing::ALL.into_iter().filter(move |f| match f {
            Facing::Up => self.up,
            Facing::Down => self.down,
            Facing::Left => self.left,
            Facing::Right => self.right,
        })
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Where the avatar cube is and which way it looks.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub position: Vec3,
    /// Unbounded yaw; wrap correction keeps it within about `[-π/2, 2π]`.
    pub yaw: f32,
    pub facing: Facing,
    pub size: f32,
}

impl Avatar {
    /// A new avatar at the origin, resting on the ground and facing right.
    pub fn new(size: f32) -> Self {
        Self {
            position: Vec3::new(0.0, size / 2.0, 0.0),
            yaw: 0.0,
            facing: Facing::Right,
            size,
        }
    }

    pub fn rest_height(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_grounded(&self) -> bool {
        self.position.y == self.rest_height()
    }

    /// World-space point on the face the avatar looks out of.
    pub fn eye_point(&self) -> Vec3 {
        let half = self.size / 2.0;
        self.position + Vec3::new(self.yaw.cos() * half, 0.0, -self.yaw.sin() * half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn shorter_side_targets() {
        assert_eq!(Facing::Down.target_yaw(0.0), DOWN_BELOW_ZERO);
        assert_eq!(Facing::Down.target_yaw(PI), 3.0 * FRAC_PI_2);
        assert_eq!(Facing::Right.target_yaw(FRAC_PI_2), 0.0);
        assert_eq!(Facing::Right.target_yaw(3.0 * FRAC_PI_2), TAU);

        for from in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            for facing in Facing::ALL {
                let delta = (facing.target_yaw(from) - from).abs();
                assert!(delta <= PI + 1e-6, "{facing:?} from {from}: {delta}");
            }
        }
    }

    #[test]
    fn from_yaw_handles_twins() {
        assert_eq!(Facing::from_yaw(0.0), Facing::Right);
        assert_eq!(Facing::from_yaw(TAU), Facing::Right);
        assert_eq!(Facing::from_yaw(DOWN_BELOW_ZERO), Facing::Down);
        assert_eq!(Facing::from_yaw(3.0 * FRAC_PI_2), Facing::Down);
        assert_eq!(Facing::from_yaw(PI + 0.2), Facing::Left);
        for facing in Facing::ALL {
            assert_eq!(Facing::from_yaw(facing.canonical_yaw()), facing);
        }
    }

    #[test]
    fn intent_directions_follow_processing_order() {
        let intent = MovementIntent {
            right: true,
            up: true,
            ..Default::default()
        };
        let dirs: Vec<_> = intent.directions().collect();
        assert_eq!(dirs, vec![Facing::Up, Facing::Right]);
        assert!(!intent.is_idle());
        assert!(MovementIntent::default().is_idle());
        assert!(MovementIntent::toward(Facing::Left).left);
    }

    #[test]
    fn new_avatar_rests_on_ground() {
        let avatar = Avatar::new(0.5);
        assert_eq!(avatar.rest_height(), 0.25);
        assert!(avatar.is_grounded());
        let eye = avatar.eye_point();
        assert_abs_diff_eq!(eye.x, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(eye.z, 0.0, epsilon = 1e-6);
    }
}
