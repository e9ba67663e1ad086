// MODEL: Avatar, camera and scene data
pub mod avatar;
pub mod camera;
pub mod environment;
pub mod scene;

pub use avatar::{Avatar, Facing, MovementIntent, DOWN_BELOW_ZERO};
pub use camera::{Camera, ScreenPoint};
pub use environment::{Environment, Rock, Tree};
pub use scene::Scene;
