// VIEW: Turning the scene into pixels
pub mod draw;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use draw::{build_frame, css_color, AvatarStyle, DrawItem, Helpers, Layer, Shape};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
