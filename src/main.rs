//! Headless run of the avatar controller: plays the intro, then walks a
//! scripted square with a jump, logging the avatar and camera as it goes.
//!
//! Usage: `meadow [config.json]`

use std::env;

use tracing::{error, info};

use meadow::config::Config;
use meadow::controller::{AvatarController, CameraPort};
use meadow::logging;
use meadow::model::{Camera, Facing, MovementIntent, Scene};

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES_PER_SECOND: usize = 60;

/// How long to hold an intent, in seconds.
struct Segment {
    label: &'static str,
    seconds: f32,
    intent: MovementIntent,
}

fn script(intro_seconds: f32) -> Vec<Segment> {
    let walk = |label, facing| Segment {
        label,
        seconds: 1.0,
        intent: MovementIntent::toward(facing),
    };
    vec![
        Segment {
            label: "intro",
            seconds: intro_seconds,
            intent: MovementIntent::default(),
        },
        walk("up", Facing::Up),
        walk("right", Facing::Right),
        walk("down", Facing::Down),
        walk("left", Facing::Left),
        Segment {
            label: "jump right",
            seconds: 1.0,
            intent: MovementIntent {
                jump: true,
                ..MovementIntent::toward(Facing::Right)
            },
        },
        Segment {
            label: "rest",
            seconds: 1.5,
            intent: MovementIntent::default(),
        },
    ]
}

fn main() {
    let loaded = env::args().nth(1).map(|path| (Config::load(&path), path));
    let config = match &loaded {
        Some((Ok(config), _)) => config.clone(),
        _ => Config::default(),
    };
    logging::init(&config.logging);
    match loaded {
        Some((Ok(_), path)) => info!(%path, "config loaded"),
        Some((Err(err), path)) => error!(%path, %err, "config rejected, using defaults"),
        None => info!("no config given, using defaults"),
    }

    let camera = Camera::new(800, 600, &config.camera);
    let mut controller = AvatarController::new(&config.player, &config.camera, camera)
        .with_intro_settle(config.intro.settle);
    let intro_seconds = if config.intro.enabled {
        controller.camera_fall(
            config.intro.start_height,
            config.intro.fall_duration,
            config.intro.delay,
        );
        config.intro.delay + config.intro.fall_duration + config.intro.settle
    } else {
        0.0
    };

    let mut scene = Scene::new(&config.world);
    info!(
        trees = scene.environment.trees.len(),
        rocks = scene.environment.rocks.len(),
        seed = scene.seed,
        "scene ready"
    );

    let mut frame = 0usize;
    for segment in script(intro_seconds) {
        info!(segment = segment.label, seconds = segment.seconds, "segment");
        controller.set_intent(segment.intent);
        let frames = (segment.seconds / FRAME_DT).round() as usize;
        for _ in 0..frames {
            controller.update(FRAME_DT);
            frame += 1;
            scene.update(frame as f64 * FRAME_DT as f64 * 1000.0);

            if frame % FRAMES_PER_SECOND == 0 {
                let avatar = controller.avatar();
                info!(
                    t = controller.elapsed(),
                    position = ?avatar.position,
                    yaw = avatar.yaw.to_degrees(),
                    facing = ?avatar.facing,
                    airborne = controller.jump_state().is_airborne(),
                    camera = ?controller.camera().position(),
                    intro = controller.intro_active(),
                    "tick"
                );
            }
        }
    }

    let avatar = controller.avatar();
    info!(
        frames = frame,
        position = ?avatar.position,
        facing = ?avatar.facing,
        camera = ?controller.camera().position(),
        "done"
    );
}
