use glam::Vec3;

use crate::config::{CameraConfig, FollowDurations};
use crate::controller::tween::{Ease, Tweener};

/// The camera the rig drives. Injected into the controller rather than reached
/// through globals, so tests can hand in a recording fake.
pub trait CameraPort {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn look_at(&mut self, target: Vec3);
}

/// Properties the rig animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProp {
    CameraX,
    CameraY,
    CameraZ,
    LookX,
    LookY,
    LookZ,
}

const CAMERA_AXES: [RigProp; 3] = [RigProp::CameraX, RigProp::CameraY, RigProp::CameraZ];
const LOOK_AXES: [RigProp; 3] = [RigProp::LookX, RigProp::LookY, RigProp::LookZ];

/// Camera follow state: a fixed offset behind the avatar and a look-at point
/// that trails it with a separate lag on each axis.
pub struct CameraRig {
    pub offset: Vec3,
    pub position_duration: f32,
    follow: FollowDurations,
    ease: Ease,
    look_target: Vec3,
    tweens: Tweener<RigProp>,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, avatar: Vec3) -> Self {
        Self {
            offset: config.offset,
            position_duration: config.position_duration,
            follow: config.follow,
            ease: config.ease,
            look_target: avatar,
            tweens: Tweener::new(),
        }
    }

    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn follow_durations(&self) -> FollowDurations {
        self.follow
    }

    pub fn set_follow_y(&mut self, duration: f32) {
        self.follow.y = duration.max(0.0);
    }

    pub fn is_animating(&self, prop: RigProp) -> bool {
        self.tweens.is_active(prop)
    }

    /// Advance running tweens and write the results into the camera and look-at point.
    pub fn step<C: CameraPort>(&mut self, dt: f32, camera: &mut C) {
        let mut position = camera.position();
        let mut moved = false;
        let look = &mut self.look_target;

        self.tweens.step(dt, |prop, value| match prop {
            RigProp::CameraX => {
                position.x = value;
                moved = true;
            }
            RigProp::CameraY => {
                position.y = value;
                moved = true;
            }
            RigProp::CameraZ => {
                position.z = value;
                moved = true;
            }
            RigProp::LookX => look.x = value,
            RigProp::LookY => look.y = value,
            RigProp::LookZ => look.z = value,
        });

        if moved {
            camera.set_position(position);
        }
    }

    /// Head the camera toward `avatar + offset` and the look-at point toward `avatar`.
    pub fn follow(&mut self, camera_position: Vec3, avatar: Vec3) {
        let goal = avatar + self.offset;
        for (axis, prop) in CAMERA_AXES.into_iter().enumerate() {
            self.tweens
                .to(prop, camera_position[axis], goal[axis], self.position_duration, self.ease);
        }

        let durations = [self.follow.x, self.follow.y, self.follow.z];
        for (axis, prop) in LOOK_AXES.into_iter().enumerate() {
            self.chase_look(prop, axis, avatar[axis], durations[axis]);
        }
    }

    /// Intro variant of [`follow`](Self::follow): the look-at point keeps the
    /// avatar's ground position but trails the camera's own height.
    pub fn track_camera_height(&mut self, camera_position: Vec3, avatar: Vec3) {
        self.chase_look(RigProp::LookX, 0, avatar.x, self.follow.x);
        self.chase_look(RigProp::LookY, 1, camera_position.y, self.follow.y);
        self.chase_look(RigProp::LookZ, 2, avatar.z, self.follow.z);
    }

    fn chase_look(&mut self, prop: RigProp, axis: usize, target: f32, duration: f32) {
        if duration == 0.0 {
            self.tweens.cancel(prop);
            self.look_target[axis] = target;
        } else {
            self.tweens
                .to(prop, self.look_target[axis], target, duration, self.ease);
        }
    }

    /// Put the camera at `height` right now, dropping any vertical tween.
    pub fn place_camera_height<C: CameraPort>(&mut self, camera: &mut C, height: f32) {
        self.tweens.cancel(RigProp::CameraY);
        let mut position = camera.position();
        position.y = height;
        camera.set_position(position);
    }

    /// Start lowering the camera from `from` to `to` over `duration` seconds.
    pub fn lower_camera(&mut self, from: f32, to: f32, duration: f32) {
        self.tweens.to(RigProp::CameraY, from, to, duration, self.ease);
    }

    pub fn aim<C: CameraPort>(&self, camera: &mut C) {
        camera.look_at(self.look_target);
    }
}
