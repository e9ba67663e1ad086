//! Flattens the scene into depth-sorted 2D shapes for a painter.
//!
//! Everything here is plain math so the frame can be checked without a
//! browser. Polygons are clipped against the camera's near plane before
//! projection, so geometry reaching behind the camera still fills the view.

use std::cmp::Ordering;

use glam::{Mat4, Quat, Vec3};

use crate::model::environment::TRUNK_BROWN;
use crate::model::{Avatar, Camera, Rock, Scene, Tree};

pub const GROUND_GREEN: u32 = 0x42aa50;
pub const OCEAN_BLUE: u32 = 0x555eff;
pub const SUN_YELLOW: u32 = 0xffee00;
pub const SKY: u32 = 0xffffff;
pub const GRID_LINE: u32 = 0x888888;
pub const GRID_CENTER: u32 = 0x444444;
pub const AXIS_X: u32 = 0x00ff00;
pub const AXIS_Y: u32 = 0xff0000;
pub const AXIS_Z: u32 = 0x0000ff;

const AMBIENT: f32 = 0.75;
const DIRECTIONAL: f32 = 0.5;
/// Linear fog toward the sky color, fully opaque at this depth.
const FOG_FAR: f32 = 80.0;
const CIRCLE_SEGMENTS: usize = 100;
const OCEAN_DROP: f32 = 0.1;
const SUN_RADIUS: f32 = 2.0;
const AXIS_LENGTH: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon { points: Vec<[f32; 2]>, fill: u32 },
    Line { from: [f32; 2], to: [f32; 2], color: u32, width: f32 },
    Disc { center: [f32; 2], radius: f32, fill: u32 },
}

/// Painted in declaration order; depth only sorts within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Ground,
    Helpers,
    Objects,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub layer: Layer,
    /// Distance along the view direction.
    pub depth: f32,
    pub shape: Shape,
}

/// Which debug helpers to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Helpers {
    pub grid: bool,
    pub axes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarStyle {
    pub body: u32,
    pub eyes: u32,
}

/// `#rrggbb` for a packed 0xRRGGBB color.
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

fn channels(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32,
        ((color >> 8) & 0xff) as f32,
        (color & 0xff) as f32,
    ]
}

fn pack([r, g, b]: [f32; 3]) -> u32 {
    let c = |v: f32| v.round().clamp(0.0, 255.0) as u32;
    (c(r) << 16) | (c(g) << 8) | c(b)
}

/// Scale each channel, saturating at white.
pub fn shade(color: u32, factor: f32) -> u32 {
    let [r, g, b] = channels(color);
    pack([r * factor, g * factor, b * factor])
}

/// Blend `a` toward `b` by `t` in `[0, 1]`.
pub fn mix(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let (ca, cb) = (channels(a), channels(b));
    pack([
        ca[0] + (cb[0] - ca[0]) * t,
        ca[1] + (cb[1] - ca[1]) * t,
        ca[2] + (cb[2] - ca[2]) * t,
    ])
}

struct FrameBuilder<'a> {
    camera: &'a Camera,
    view_proj: Mat4,
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    light_dir: Vec3,
    width: f32,
    height: f32,
    items: Vec<DrawItem>,
}

impl<'a> FrameBuilder<'a> {
    fn new(camera: &'a Camera, light: Vec3, width: f32, height: f32) -> Self {
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        Self {
            camera,
            view_proj: camera.view_proj(),
            eye: camera.eye,
            forward,
            right: if right == Vec3::ZERO { Vec3::X } else { right },
            light_dir: light.normalize_or_zero(),
            width,
            height,
            items: Vec::new(),
        }
    }

    fn depth(&self, p: Vec3) -> f32 {
        (p - self.eye).dot(self.forward)
    }

    /// Screen position of a point known to be in front of the near plane.
    fn to_screen(&self, p: Vec3) -> [f32; 2] {
        let clip = self.view_proj * p.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        [
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        ]
    }

    fn near(&self) -> f32 {
        self.camera.z_near * 1.01
    }

    fn clip_polygon(&self, points: &[Vec3]) -> Vec<Vec3> {
        let near = self.near();
        let mut out = Vec::with_capacity(points.len() + 2);
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let (da, db) = (self.depth(a) - near, self.depth(b) - near);
            if da >= 0.0 {
                out.push(a);
            }
            if (da >= 0.0) != (db >= 0.0) {
                out.push(a + (b - a) * (da / (da - db)));
            }
        }
        out
    }

    fn lit(&self, color: u32, normal: Vec3) -> u32 {
        let diffuse = normal.normalize_or_zero().dot(self.light_dir).max(0.0);
        shade(color, AMBIENT + DIRECTIONAL * diffuse)
    }

    fn fogged(&self, color: u32, depth: f32) -> u32 {
        mix(color, SKY, depth / FOG_FAR)
    }

    fn polygon(&mut self, layer: Layer, depth: f32, points: &[Vec3], fill: u32) {
        let clipped = self.clip_polygon(points);
        if clipped.len() < 3 {
            return;
        }
        let points = clipped.iter().map(|p| self.to_screen(*p)).collect();
        self.items.push(DrawItem {
            layer,
            depth,
            shape: Shape::Polygon { points, fill },
        });
    }

    fn line(&mut self, layer: Layer, from: Vec3, to: Vec3, color: u32, width: f32) {
        let near = self.near();
        let (da, db) = (self.depth(from) - near, self.depth(to) - near);
        if da < 0.0 && db < 0.0 {
            return;
        }
        let cut = |a: Vec3, b: Vec3, da: f32, db: f32| a + (b - a) * (da / (da - db));
        let (from, to) = match (da >= 0.0, db >= 0.0) {
            (true, true) => (from, to),
            (false, _) => (cut(from, to, da, db), to),
            (_, false) => (from, cut(from, to, da, db)),
        };
        let depth = self.depth((from + to) / 2.0);
        self.items.push(DrawItem {
            layer,
            depth,
            shape: Shape::Line {
                from: self.to_screen(from),
                to: self.to_screen(to),
                color,
                width,
            },
        });
    }

    fn disc(&mut self, center: Vec3, radius: f32, fill: u32, depth_bias: f32) {
        let Some(at) = self.camera.project(center, self.width, self.height) else {
            return;
        };
        self.items.push(DrawItem {
            layer: Layer::Objects,
            depth: at.depth - depth_bias,
            shape: Shape::Disc {
                center: [at.x, at.y],
                radius: radius * self.camera.pixels_per_unit(at.depth, self.height),
                fill,
            },
        });
    }

    fn ground_circle(&mut self, y: f32, radius: f32, color: u32) {
        let ring: Vec<Vec3> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                Vec3::new(a.cos() * radius, y, a.sin() * radius)
            })
            .collect();
        let fill = self.lit(color, Vec3::Y);
        self.polygon(Layer::Ground, f32::MAX, &ring, fill);
    }

    /// Oriented box; every visible face shares the box's center depth so a
    /// marker pushed right after stays on top.
    fn cuboid(&mut self, center: Vec3, half: Vec3, yaw: f32, color: u32) {
        let depth = self.depth(center);
        let rotation = Quat::from_rotation_y(yaw);
        let color = self.fogged(color, depth);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for sign in [1.0, -1.0] {
                let local_normal = axis * sign;
                let normal = rotation * local_normal;
                let face_center = center + rotation * (local_normal * half);
                if normal.dot(self.eye - face_center) <= 0.0 {
                    continue;
                }
                // Two in-face axes spanning the face
                let (u, v) = match axis {
                    a if a == Vec3::X => (Vec3::Y, Vec3::Z),
                    a if a == Vec3::Y => (Vec3::X, Vec3::Z),
                    _ => (Vec3::X, Vec3::Y),
                };
                let (u, v) = (rotation * (u * half), rotation * (v * half));
                let corners = [
                    face_center + u + v,
                    face_center + u - v,
                    face_center - u - v,
                    face_center - u + v,
                ];
                let fill = self.lit(color, normal);
                self.polygon(Layer::Objects, depth, &corners, fill);
            }
        }
    }

    /// Camera-facing triangle standing in for a cone.
    fn cone(&mut self, center: Vec3, radius: f32, height: f32, color: u32) {
        let depth = self.depth(center);
        let base = center - Vec3::Y * (height / 2.0);
        let apex = center + Vec3::Y * (height / 2.0);
        let side = self.right * radius;
        let fill = self.fogged(self.lit(color, -self.forward), depth);
        self.polygon(Layer::Objects, depth, &[base - side, apex, base + side], fill);
    }

    fn tree(&mut self, tree: &Tree) {
        let size = tree.size;
        let trunk = Vec3::new(0.16 * size, size / 2.0, 0.16 * size);
        self.cuboid(tree.position, trunk, 0.0, TRUNK_BROWN);
        for lift in [1.0, 1.25, 1.5] {
            let center = tree.position + Vec3::Y * (size * lift);
            self.cone(center, size * 0.75, size * 2.0, tree.leaf_color);
        }
    }

    fn rock(&mut self, rock: &Rock) {
        self.cuboid(rock.position, rock.size / 2.0, 0.0, rock.color);
    }

    fn avatar(&mut self, avatar: &Avatar, style: &AvatarStyle) {
        self.cuboid(avatar.position, Vec3::splat(avatar.size / 2.0), avatar.yaw, style.body);
        let eye = avatar.eye_point();
        let facing_camera = (eye - avatar.position).dot(self.eye - eye) > 0.0;
        if facing_camera {
            let bias = self.depth(eye) - self.depth(avatar.position) + 1e-3;
            self.disc(eye, avatar.size * 0.12, style.eyes, bias);
        }
    }

    fn grid(&mut self, radius: f32) {
        let half = radius.floor() as i32;
        let extent = half as f32;
        for i in -half..=half {
            let at = i as f32;
            let color = if i == 0 { GRID_CENTER } else { GRID_LINE };
            self.line(
                Layer::Helpers,
                Vec3::new(at, 0.0, -extent),
                Vec3::new(at, 0.0, extent),
                color,
                1.0,
            );
            self.line(
                Layer::Helpers,
                Vec3::new(-extent, 0.0, at),
                Vec3::new(extent, 0.0, at),
                color,
                1.0,
            );
        }
    }

    fn axes(&mut self) {
        for (dir, color) in [(Vec3::X, AXIS_X), (Vec3::Y, AXIS_Y), (Vec3::Z, AXIS_Z)] {
            self.line(Layer::Objects, Vec3::ZERO, dir * AXIS_LENGTH, color, 2.0);
        }
    }

    fn finish(mut self) -> Vec<DrawItem> {
        self.items.sort_by(|a, b| {
            a.layer
                .cmp(&b.layer)
                .then(b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal))
        });
        self.items
    }
}

/// Everything visible this frame, in paint order (back to front).
pub fn build_frame(
    camera: &Camera,
    scene: &Scene,
    avatar: &Avatar,
    style: &AvatarStyle,
    helpers: Helpers,
    width: f32,
    height: f32,
) -> Vec<DrawItem> {
    let mut frame = FrameBuilder::new(camera, scene.light_position, width, height);

    frame.ground_circle(-OCEAN_DROP, scene.ocean_radius, OCEAN_BLUE);
    frame.ground_circle(0.0, scene.ground_radius, GROUND_GREEN);
    if helpers.grid {
        frame.grid(scene.ground_radius);
    }
    if helpers.axes {
        frame.axes();
    }

    let sun_depth = frame.depth(scene.sun_position);
    let sun = frame.fogged(SUN_YELLOW, sun_depth);
    frame.disc(scene.sun_position, SUN_RADIUS, sun, 0.0);

    for tree in &scene.environment.trees {
        frame.tree(tree);
    }
    for rock in &scene.environment.rocks {
        frame.rock(rock);
    }
    frame.avatar(avatar, style);

    frame.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, WorldConfig};
    use crate::controller::CameraPort;

    fn empty_scene() -> Scene {
        Scene::new(&WorldConfig {
            seed: Some(1),
            tree_count: 0,
            rock_count: 0,
            ..WorldConfig::default()
        })
    }

    fn camera() -> Camera {
        let mut cam = Camera::new(800, 600, &CameraConfig::default());
        cam.set_position(Vec3::new(0.0, 3.25, 8.0));
        cam.look_at(Vec3::new(0.0, 0.25, 0.0));
        cam
    }

    const STYLE: AvatarStyle = AvatarStyle {
        body: 0x5bbaee,
        eyes: 0x000000,
    };

    #[test]
    fn colors() {
        assert_eq!(css_color(0x5bbaee), "#5bbaee");
        assert_eq!(css_color(0), "#000000");
        assert_eq!(shade(0x808080, 2.5), 0xffffff);
        assert_eq!(shade(0x204060, 0.5), 0x102030);
        assert_eq!(mix(0x000000, 0xffffff, 0.5), 0x808080);
        assert_eq!(mix(0x123456, 0xffffff, 3.0), 0xffffff);
    }

    #[test]
    fn frame_is_sorted_back_to_front() {
        let scene = Scene::new(&WorldConfig {
            seed: Some(4),
            ..WorldConfig::default()
        });
        let avatar = Avatar::new(0.5);
        let items = build_frame(
            &camera(),
            &scene,
            &avatar,
            &STYLE,
            Helpers { grid: true, axes: true },
            800.0,
            600.0,
        );

        assert!(matches!(items[0].shape, Shape::Polygon { .. }));
        assert_eq!(items[0].layer, Layer::Ground);
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.layer < b.layer || (a.layer == b.layer && a.depth >= b.depth));
        }
        assert!(items.iter().any(|i| i.layer == Layer::Helpers));
    }

    #[test]
    fn ground_fills_view_when_camera_stands_inside_it() {
        let items = build_frame(
            &camera(),
            &empty_scene(),
            &Avatar::new(0.5),
            &STYLE,
            Helpers::default(),
            800.0,
            600.0,
        );
        let ground = items
            .iter()
            .filter_map(|i| match &i.shape {
                Shape::Polygon { points, .. } if i.layer == Layer::Ground => Some(points),
                _ => None,
            })
            .last()
            .unwrap();
        // Bottom of the screen is ground right under the camera.
        assert!(ground.iter().any(|p| p[1] > 600.0));
    }

    #[test]
    fn avatar_shows_three_faces_and_its_eye() {
        // Avatar faces right; camera sits up, back and to the right.
        let mut cam = camera();
        cam.set_position(Vec3::new(4.0, 3.0, 8.0));
        let items = build_frame(
            &cam,
            &empty_scene(),
            &Avatar::new(0.5),
            &STYLE,
            Helpers::default(),
            800.0,
            600.0,
        );
        let objects: Vec<_> = items.iter().filter(|i| i.layer == Layer::Objects).collect();
        let faces = objects
            .iter()
            .filter(|i| matches!(i.shape, Shape::Polygon { .. }))
            .count();
        assert_eq!(faces, 3);
        match &objects.last().unwrap().shape {
            Shape::Disc { fill, radius, .. } => {
                assert_eq!(*fill, STYLE.eyes);
                assert!(*radius > 0.0);
            }
            other => panic!("expected eye last, got {other:?}"),
        }
    }

    #[test]
    fn eye_hidden_when_facing_away() {
        let mut avatar = Avatar::new(0.5);
        avatar.yaw = std::f32::consts::FRAC_PI_2; // looking up the screen, away from camera
        let items = build_frame(
            &camera(),
            &empty_scene(),
            &avatar,
            &STYLE,
            Helpers::default(),
            800.0,
            600.0,
        );
        assert!(!items
            .iter()
            .any(|i| matches!(i.shape, Shape::Disc { fill, .. } if fill == STYLE.eyes)));
    }

    #[test]
    fn lines_behind_camera_are_dropped_or_cut() {
        let cam = camera();
        let mut frame = FrameBuilder::new(&cam, Vec3::Y, 800.0, 600.0);
        frame.line(Layer::Helpers, Vec3::new(0.0, 0.0, 20.0), Vec3::new(1.0, 0.0, 20.0), 0, 1.0);
        assert!(frame.items.is_empty());

        frame.line(Layer::Helpers, Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 0, 1.0);
        assert_eq!(frame.items.len(), 1);
        assert!(frame.items[0].depth > 0.0);
    }
}
