// CONTROLLER: Input, avatar logic, tweens and the update loop
pub mod input;
pub mod physics;
pub mod tween;
pub mod camera_controller;
pub mod avatar_controller;
#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use input::{InputEvent, InputProcessor, InputState, KeyBindings, Toggle};
pub use physics::{JumpPhysics, JumpState, JumpStep};
pub use tween::{Ease, Timeline, Tweener};
pub use camera_controller::{CameraPort, CameraRig, RigProp};
pub use avatar_controller::{AvatarController, TurnRequest};
#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
