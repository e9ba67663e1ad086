use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{HtmlElement, Window};

use crate::controller::{AvatarController, InputProcessor, InputState};
use crate::model::{Camera, Scene};
use crate::ui;
use crate::view::{self, draw::SKY, AvatarStyle, CanvasPainter, Helpers};

/// Longest step fed to the controller, so a backgrounded tab does not jump.
const MAX_DT: f64 = 0.1;

/// Main loop state and per-frame update logic
pub struct FrameLoopContext {
    pub controller: AvatarController<Camera>,
    pub scene: Scene,
    pub input_state: Rc<RefCell<InputState>>,
    pub input_processor: InputProcessor,
    pub painter: CanvasPainter,
    pub overlay: HtmlElement,
    pub avatar_style: AvatarStyle,
    pub last_time: f64,
}

impl FrameLoopContext {
    /// Advance the avatar one frame and redraw.
    pub fn update(&mut self, window: &Window) -> Result<(), JsValue> {
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let dt = ((now - self.last_time) / 1000.0).clamp(0.0, MAX_DT) as f32;
        self.last_time = now;

        self.handle_resize();

        // Extract input data in a minimal scope
        let (intent, helpers, show_debug) = {
            let input = self.input_state.borrow();
            (
                self.input_processor.intent(&input),
                Helpers {
                    grid: input.show_grid,
                    axes: input.show_axes,
                },
                input.show_debug,
            )
        };

        self.controller.set_intent(intent);
        self.controller.update(dt);
        self.scene.update(now);

        let (width, height) = self.painter.size();
        let items = view::build_frame(
            self.controller.camera(),
            &self.scene,
            self.controller.avatar(),
            &self.avatar_style,
            helpers,
            width as f32,
            height as f32,
        );
        self.painter.paint(&items, SKY)?;

        self.draw_overlay(show_debug, dt)
    }

    fn handle_resize(&mut self) {
        let resize = self.input_state.borrow_mut().take_resize();
        if let Some((width, height)) = resize {
            if (width, height) != self.painter.size() {
                tracing::debug!(width, height, "canvas resized");
                self.painter.resize(width, height);
                self.controller.camera_mut().set_aspect(width, height);
            }
        }
    }

    fn draw_overlay(&self, show_debug: bool, dt: f32) -> Result<(), JsValue> {
        let style = self.overlay.style();
        if !show_debug {
            return style.set_property("display", "none");
        }
        style.set_property("display", "block")?;
        let info = ui::DebugInfo::capture(&self.controller, &self.scene, dt);
        self.overlay
            .set_inner_html(&ui::overlay_html(&ui::debug_lines(&info)));
        Ok(())
    }
}
