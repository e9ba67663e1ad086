use glam::Vec3;

/// Progress through a single jump arc.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    pub enabled: bool,
    /// Radians travelled along the sine arc.
    pub phase: f32,
}

impl JumpState {
    pub fn is_airborne(&self) -> bool {
        self.enabled
    }
}

/// What a tick of jump integration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStep {
    Grounded,
    Airborne,
    Landed,
}

/// Handles the avatar's jump arc.
#[derive(Debug, Clone, Copy)]
pub struct JumpPhysics {
    /// Phase advance per tick.
    pub speed: f32,
    /// Peak height above rest.
    pub height: f32,
}

impl JumpPhysics {
    pub fn new(speed: f32, height: f32) -> Self {
        Self { speed, height }
    }

    /// Arm a jump. Returns false when one is already in the air.
    pub fn trigger(&self, state: &mut JumpState) -> bool {
        if state.enabled {
            return false;
        }
        state.enabled = true;
        state.phase = 0.0;
        true
    }

    /// Advance the arc by one tick, keeping `pos.y` at or above `rest`.
    pub fn update(&self, state: &mut JumpState, pos: &mut Vec3, rest: f32) -> JumpStep {
        if !state.enabled {
            return JumpStep::Grounded;
        }

        state.phase += self.speed;
        let lift = state.phase.sin();
        if lift <= 0.0 {
            // Land on the floor exactly rather than on the last sample of the arc.
            state.enabled = false;
            state.phase = 0.0;
            pos.y = rest;
            return JumpStep::Landed;
        }

        pos.y = rest + self.height * lift;
        JumpStep::Airborne
    }
}
