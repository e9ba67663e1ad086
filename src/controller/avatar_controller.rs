use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;
use tracing::{debug, info, trace};

use crate::config::{CameraConfig, PlayerConfig};
use crate::controller::camera_controller::{CameraPort, CameraRig};
use crate::controller::physics::{JumpPhysics, JumpState, JumpStep};
use crate::controller::tween::{Ease, Timeline, Tweener};
use crate::model::{Avatar, Facing, MovementIntent, DOWN_BELOW_ZERO};

/// Control returns to the player this long before the intro fall lands.
pub const INTRO_HANDOFF_LEAD: f32 = 0.2;

/// Vertical look-at lag during the intro, relative to the fall duration.
pub const INTRO_LOOK_STRETCH: f32 = 1.25;

/// Yaw closer than this to a turn target counts as already facing it.
const AT_REST_EPS: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AvatarProp {
    Yaw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum IntroEvent {
    BeginFall { duration: f32 },
    ResumeControl,
    RestoreFollowY { duration: f32 },
}

/// A rotation the controller asked the tween engine for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRequest {
    pub facing: Facing,
    pub from: f32,
    pub to: f32,
}

impl TurnRequest {
    pub fn delta(&self) -> f32 {
        self.to - self.from
    }
}

/// Drives the avatar and its camera once per frame.
///
/// Movement and the jump arc advance a fixed amount per tick; rotation and
/// camera motion are tweens measured in seconds, so they settle in the same
/// wall time at any frame rate.
pub struct AvatarController<C: CameraPort> {
    avatar: Avatar,
    intent: MovementIntent,
    jump: JumpState,
    physics: JumpPhysics,
    movement_speed: f32,
    rotate_duration: f32,
    wrap_tolerance: f32,
    /// Armed by a wrap snap; swallows the next turn request.
    suppress_next_turn: bool,
    last_turn: Option<TurnRequest>,
    turns: Tweener<AvatarProp>,
    rig: CameraRig,
    camera: C,
    intro: Timeline<IntroEvent>,
    intro_active: bool,
    intro_settle: f32,
    /// Configured vertical look-at lag that every intro restores.
    resting_follow_y: f32,
    elapsed: f32,
}

impl<C: CameraPort> AvatarController<C> {
    pub fn new(player: &PlayerConfig, camera_config: &CameraConfig, mut camera: C) -> Self {
        let avatar = Avatar::new(player.size);
        let rig = CameraRig::new(camera_config, avatar.position);
        camera.set_position(avatar.position + camera_config.offset);
        rig.aim(&mut camera);

        Self {
            avatar,
            intent: MovementIntent::default(),
            jump: JumpState::default(),
            physics: JumpPhysics::new(player.jump_speed, player.jump_height),
            movement_speed: player.movement_speed,
            rotate_duration: player.rotate_duration,
            wrap_tolerance: player.wrap_tolerance,
            suppress_next_turn: false,
            last_turn: None,
            turns: Tweener::new(),
            rig,
            camera,
            intro: Timeline::new(),
            intro_active: false,
            intro_settle: 1.0,
            resting_follow_y: camera_config.follow.y,
            elapsed: 0.0,
        }
    }

    /// Seconds after landing before the intro restores the vertical look-at lag.
    pub fn with_intro_settle(mut self, settle: f32) -> Self {
        self.intro_settle = settle.max(0.0);
        self
    }

    pub fn set_intent(&mut self, intent: MovementIntent) {
        self.intent = intent;
    }

    pub fn intent(&self) -> MovementIntent {
        self.intent
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn last_turn(&self) -> Option<TurnRequest> {
        self.last_turn
    }

    pub fn is_turning(&self) -> bool {
        self.turns.is_active(AvatarProp::Yaw)
    }

    pub fn intro_active(&self) -> bool {
        self.intro_active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Move the avatar directly; height never drops below the rest height.
    pub fn teleport(&mut self, position: Vec3) {
        let rest = self.avatar.rest_height();
        self.avatar.position = Vec3::new(position.x, position.y.max(rest), position.z);
        debug!(position = ?self.avatar.position, "teleported");
    }

    /// Drop the camera from `start_height` onto the avatar, suspending control
    /// until shortly before it lands.
    pub fn camera_fall(&mut self, start_height: f32, fall_duration: f32, delay: f32) {
        let fall_duration = fall_duration.max(0.0);
        let delay = delay.max(0.0);
        info!(start_height, fall_duration, delay, "camera intro started");

        self.intro_active = true;
        self.intro.clear();
        self.rig.place_camera_height(&mut self.camera, start_height);

        let land = delay + fall_duration;
        self.intro.after(delay, IntroEvent::BeginFall { duration: fall_duration });
        self.intro
            .after((land - INTRO_HANDOFF_LEAD).max(0.0), IntroEvent::ResumeControl);
        self.intro.after(
            land + self.intro_settle,
            IntroEvent::RestoreFollowY { duration: self.resting_follow_y },
        );
    }

    /// One frame: `dt` seconds of tweens and timers, one tick of movement.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);

        let avatar = &mut self.avatar;
        self.turns.step(dt, |prop, value| match prop {
            AvatarProp::Yaw => avatar.yaw = value,
        });
        self.rig.step(dt, &mut self.camera);
        for event in self.intro.step(dt) {
            self.handle_intro(event);
        }

        if self.intro_active {
            self.rig
                .track_camera_height(self.camera.position(), self.avatar.position);
            self.rig.aim(&mut self.camera);
            return;
        }

        self.correct_wrap();

        if self.intent.jump && self.physics.trigger(&mut self.jump) {
            debug!(y = self.avatar.position.y, "jump");
        }
        let rest = self.avatar.rest_height();
        if self.physics.update(&mut self.jump, &mut self.avatar.position, rest) == JumpStep::Landed {
            debug!("landed");
        }

        let intent = self.intent;
        for facing in intent.directions() {
            self.avatar.position += facing.step() * self.movement_speed;
            self.request_turn(facing);
        }

        self.rig.follow(self.camera.position(), self.avatar.position);
        self.rig.aim(&mut self.camera);
    }

    fn handle_intro(&mut self, event: IntroEvent) {
        match event {
            IntroEvent::BeginFall { duration } => {
                let from = self.camera.position().y;
                let to = self.avatar.position.y + self.rig.offset.y;
                self.rig.lower_camera(from, to, duration);
                self.rig.set_follow_y(duration * INTRO_LOOK_STRETCH);
                info!(from, to, duration, "camera falling");
            }
            IntroEvent::ResumeControl => {
                self.intro_active = false;
                info!(elapsed = self.elapsed, "control handed to player");
            }
            IntroEvent::RestoreFollowY { duration } => {
                self.rig.set_follow_y(duration);
                debug!(duration, "vertical look-at lag restored");
            }
        }
    }

    /// Snap yaw that reached a wrap boundary onto its twin on the other side,
    /// so a turn never has to spin through a full revolution.
    fn correct_wrap(&mut self) {
        let yaw = self.avatar.yaw;
        let snapped = if yaw >= TAU - self.wrap_tolerance {
            0.0
        } else if yaw <= DOWN_BELOW_ZERO + self.wrap_tolerance {
            3.0 * FRAC_PI_2
        } else {
            return;
        };

        trace!(from = yaw, to = snapped, "yaw wrapped");
        self.turns.cancel(AvatarProp::Yaw);
        self.avatar.yaw = snapped;
        self.suppress_next_turn = true;
    }

    fn request_turn(&mut self, facing: Facing) {
        let yaw = self.avatar.yaw;
        let target = facing.target_yaw(yaw);
        self.avatar.facing = facing;

        // Only the turns that can cross a wrap boundary honor the snap.
        if self.suppress_next_turn && matches!(facing, Facing::Down | Facing::Right) {
            self.suppress_next_turn = false;
            return;
        }
        if !self.is_turning() && (yaw - target).abs() < AT_REST_EPS {
            return;
        }
        if self.turns.target_of(AvatarProp::Yaw) == Some(target) {
            return;
        }

        self.turns
            .to(AvatarProp::Yaw, yaw, target, self.rotate_duration, Ease::Power1Out);
        self.last_turn = Some(TurnRequest { facing, from: yaw, to: target });
    }
}
