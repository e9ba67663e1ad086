use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::controller::CameraPort;

/// A projected point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Distance along the view direction, for back-to-front sorting.
    pub depth: f32,
}

/// Perspective camera that looks at an explicit target point.
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32, config: &CameraConfig) -> Self {
        Self {
            eye: config.offset,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: config.fov_deg.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let dir = (self.target - self.eye).normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            dir
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.forward(), self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * self.view()
    }

    /// Project a world point onto a `width` x `height` canvas (origin top-left).
    /// Points outside the near/far range give `None`.
    pub fn project(&self, world: Vec3, width: f32, height: f32) -> Option<ScreenPoint> {
        let depth = (world - self.eye).dot(self.forward());
        if depth < self.z_near || depth > self.z_far {
            return None;
        }
        let clip = self.view_proj() * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width,
            y: (1.0 - ndc.y) * 0.5 * height,
            depth,
        })
    }

    /// How many pixels one world unit spans at `depth` on a canvas `height` pixels tall.
    pub fn pixels_per_unit(&self, depth: f32, height: f32) -> f32 {
        height / (2.0 * (self.fov_y / 2.0).tan() * depth.max(self.z_near))
    }
}

impl CameraPort for Camera {
    fn position(&self) -> Vec3 {
        self.eye
    }

    fn set_position(&mut self, position: Vec3) {
        self.eye = position;
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera() -> Camera {
        let mut cam = Camera::new(800, 600, &CameraConfig::default());
        cam.eye = Vec3::new(0.0, 0.0, 10.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn target_projects_to_center() {
        let cam = camera();
        let p = cam.project(Vec3::ZERO, 800.0, 600.0).unwrap();
        assert_abs_diff_eq!(p.x, 400.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p.y, 300.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p.depth, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn right_and_up_map_to_screen_axes() {
        let cam = camera();
        let right = cam.project(Vec3::X, 800.0, 600.0).unwrap();
        let up = cam.project(Vec3::Y, 800.0, 600.0).unwrap();
        assert!(right.x > 400.0);
        assert!(up.y < 300.0);
    }

    #[test]
    fn behind_camera_is_culled() {
        let cam = camera();
        assert!(cam.project(Vec3::new(0.0, 0.0, 20.0), 800.0, 600.0).is_none());
        assert!(cam.project(Vec3::new(0.0, 0.0, -200.0), 800.0, 600.0).is_none());
    }

    #[test]
    fn pixel_scale_matches_projection() {
        let cam = camera();
        let a = cam.project(Vec3::ZERO, 800.0, 600.0).unwrap();
        let b = cam.project(Vec3::Y, 800.0, 600.0).unwrap();
        assert_abs_diff_eq!(a.y - b.y, cam.pixels_per_unit(10.0, 600.0), epsilon = 1e-2);
    }

    #[test]
    fn degenerate_look_at_keeps_a_direction() {
        let mut cam = camera();
        cam.look_at(cam.eye);
        assert_eq!(cam.forward(), Vec3::NEG_Z);
        assert!(cam.view().is_finite());
    }
}
