use glam::Vec3;

use crate::config::FollowDurations;
use crate::controller::{AvatarController, CameraPort, JumpState};
use crate::model::{Facing, Scene};

/// Snapshot of what the debug overlay shows for one frame.
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub dt: f32,
    pub avatar: Vec3,
    pub yaw: f32,
    pub facing: Facing,
    pub jump: JumpState,
    pub camera: Vec3,
    pub look_target: Vec3,
    pub follow: FollowDurations,
    pub intro_active: bool,
    pub seed: u64,
    pub trees: usize,
    pub rocks: usize,
    pub light: Vec3,
    pub sun: Vec3,
}

impl DebugInfo {
    pub fn capture<C: CameraPort>(controller: &AvatarController<C>, scene: &Scene, dt: f32) -> Self {
        let avatar = controller.avatar();
        Self {
            dt,
            avatar: avatar.position,
            yaw: avatar.yaw,
            facing: avatar.facing,
            jump: controller.jump_state(),
            camera: controller.camera().position(),
            look_target: controller.rig().look_target(),
            follow: controller.rig().follow_durations(),
            intro_active: controller.intro_active(),
            seed: scene.seed,
            trees: scene.environment.trees.len(),
            rocks: scene.environment.rocks.len(),
            light: scene.light_position,
            sun: scene.sun_position,
        }
    }
}

const CONTROLS: [&str; 5] = [
    "WASD / arrows - Move",
    "Space - Jump",
    "Right Ctrl - Toggle debug",
    ", - Toggle grid",
    ". - Toggle axes",
];

fn fmt_vec(v: Vec3) -> String {
    format!("x: {:.2} y: {:.2} z: {:.2}", v.x, v.y, v.z)
}

/// Overlay text, one entry per line.
pub fn debug_lines(info: &DebugInfo) -> Vec<String> {
    let fps = if info.dt > 0.0 { 1.0 / info.dt } else { 0.0 };
    let jump = if info.jump.is_airborne() {
        format!("airborne ({:.2} rad)", info.jump.phase)
    } else {
        "grounded".to_string()
    };

    let mut lines = vec![
        format!("FPS: {fps:.0}"),
        format!("Pos: {}", fmt_vec(info.avatar)),
        format!("Yaw: {:.1} deg ({:?})", info.yaw.to_degrees(), info.facing),
        format!("Jump: {jump}"),
        format!("Camera: {}", fmt_vec(info.camera)),
        format!("Look: {}", fmt_vec(info.look_target)),
        format!(
            "Look lag: x: {:.2}s y: {:.2}s z: {:.2}s",
            info.follow.x, info.follow.y, info.follow.z
        ),
        format!("Seed: {}", info.seed),
        format!("Trees: {} Rocks: {}", info.trees, info.rocks),
        format!("Light: {}", fmt_vec(info.light)),
        format!("Sun: {}", fmt_vec(info.sun)),
    ];
    if info.intro_active {
        lines.push("Intro playing".to_string());
    }
    lines.push(String::new());
    lines.push("Controls:".to_string());
    lines.extend(CONTROLS.iter().map(|c| c.to_string()));
    lines
}

/// Lines joined for an HTML overlay element.
pub fn overlay_html(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;"))
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DebugInfo {
        DebugInfo {
            dt: 0.02,
            avatar: Vec3::new(1.0, 0.25, -2.0),
            yaw: std::f32::consts::PI,
            facing: Facing::Left,
            jump: JumpState::default(),
            camera: Vec3::new(1.0, 3.25, 6.0),
            look_target: Vec3::new(1.0, 0.25, -2.0),
            follow: FollowDurations::default(),
            intro_active: false,
            seed: 42,
            trees: 100,
            rocks: 150,
            light: Vec3::new(0.0, 150.0, 200.0),
            sun: Vec3::new(0.0, 15.0, 50.0),
        }
    }

    #[test]
    fn lines_describe_the_avatar() {
        let lines = debug_lines(&info());
        assert_eq!(lines[0], "FPS: 50");
        assert_eq!(lines[1], "Pos: x: 1.00 y: 0.25 z: -2.00");
        assert_eq!(lines[2], "Yaw: 180.0 deg (Left)");
        assert_eq!(lines[3], "Jump: grounded");
        assert!(lines.contains(&"Seed: 42".to_string()));
        assert!(lines.contains(&"Trees: 100 Rocks: 150".to_string()));
        assert!(lines.contains(&"Look lag: x: 0.50s y: 0.50s z: 0.50s".to_string()));
        assert!(lines.contains(&"Light: x: 0.00 y: 150.00 z: 200.00".to_string()));
        assert!(lines.contains(&"Sun: x: 0.00 y: 15.00 z: 50.00".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Intro")));
    }

    #[test]
    fn airborne_and_intro_are_reported() {
        let mut info = info();
        info.dt = 0.0;
        info.intro_active = true;
        info.jump = JumpState {
            enabled: true,
            phase: 0.5,
        };
        let lines = debug_lines(&info);
        assert_eq!(lines[0], "FPS: 0");
        assert_eq!(lines[3], "Jump: airborne (0.50 rad)");
        assert!(lines.contains(&"Intro playing".to_string()));
    }

    #[test]
    fn html_is_escaped() {
        let html = overlay_html(&["a < b".to_string(), "c".to_string()]);
        assert_eq!(html, "a &lt; b<br>c");
    }
}
