/// Platform-agnostic input handling
use std::collections::HashSet;

use crate::model::{Facing, MovementIntent};

/// Platform-independent input events. Keys are physical key codes
/// (`KeyboardEvent.code`), so layouts do not change the bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    FocusLost,
    VisibilityChanged { visible: bool },
    Resize { width: u32, height: u32 },
}

/// Held keys plus the debug helpers they toggle.
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub show_debug: bool,
    pub show_grid: bool,
    pub show_axes: bool,
    /// Latest size reported by a resize, until the frame loop applies it.
    pub pending_resize: Option<(u32, u32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event. Toggle keys flip their helper once per press, not per repeat.
    pub fn process_event(&mut self, event: &InputEvent, processor: &InputProcessor) {
        match event {
            InputEvent::KeyDown(code) => {
                if self.pressed_keys.insert(code.clone()) {
                    match processor.toggle_for(code) {
                        Some(Toggle::Debug) => self.show_debug = !self.show_debug,
                        Some(Toggle::Grid) => self.show_grid = !self.show_grid,
                        Some(Toggle::Axes) => self.show_axes = !self.show_axes,
                        None => {}
                    }
                }
            }
            InputEvent::KeyUp(code) => {
                self.pressed_keys.remove(code.as_str());
            }
            InputEvent::FocusLost => self.clear_keys(),
            InputEvent::VisibilityChanged { visible } => {
                if !visible {
                    self.clear_keys();
                }
            }
            InputEvent::Resize { width, height } => {
                self.pending_resize = Some((*width, *height));
            }
        }
    }

    pub fn is_key_pressed(&self, code: &str) -> bool {
        self.pressed_keys.contains(code)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Debug,
    Grid,
    Axes,
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub toggle_debug: String,
    pub toggle_grid: String,
    pub toggle_axes: String,
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: codes(&["KeyW", "ArrowUp"]),
            down: codes(&["KeyS", "ArrowDown"]),
            left: codes(&["KeyA", "ArrowLeft"]),
            right: codes(&["KeyD", "ArrowRight"]),
            jump: codes(&["Space"]),
            toggle_debug: "ControlRight".to_string(),
            toggle_grid: "Comma".to_string(),
            toggle_axes: "Period".to_string(),
        }
    }
}

impl KeyBindings {
    fn for_facing(&self, facing: Facing) -> &[String] {
        match facing {
            Facing::Up => &self.up,
            Facing::Down => &self.down,
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        }
    }

    /// Whether the page should swallow this key's default browser action.
    pub fn is_bound(&self, code: &str) -> bool {
        Facing::ALL
            .iter()
            .flat_map(|f| self.for_facing(*f))
            .chain(&self.jump)
            .any(|c| c == code)
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    fn any_pressed(input: &InputState, keys: &[String]) -> bool {
        keys.iter().any(|k| input.is_key_pressed(k))
    }

    pub fn intent(&self, input: &InputState) -> MovementIntent {
        let mut intent = MovementIntent {
            jump: Self::any_pressed(input, &self.bindings.jump),
            ..MovementIntent::default()
        };
        for facing in Facing::ALL {
            intent.set(facing, Self::any_pressed(input, self.bindings.for_facing(facing)));
        }
        intent
    }

    pub fn toggle_for(&self, code: &str) -> Option<Toggle> {
        if code == self.bindings.toggle_debug {
            Some(Toggle::Debug)
        } else if code == self.bindings.toggle_grid {
            Some(Toggle::Grid)
        } else if code == self.bindings.toggle_axes {
            Some(Toggle::Axes)
        } else {
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut InputState, processor: &InputProcessor, code: &str) {
        state.process_event(&InputEvent::KeyDown(code.to_string()), processor);
    }

    #[test]
    fn wasd_and_arrows_map_to_intent() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();
        press(&mut state, &processor, "KeyW");
        press(&mut state, &processor, "ArrowRight");
        press(&mut state, &processor, "Space");

        let intent = processor.intent(&state);
        assert!(intent.up && intent.right && intent.jump);
        assert!(!intent.down && !intent.left);

        state.process_event(&InputEvent::KeyUp("KeyW".into()), &processor);
        assert!(!processor.intent(&state).up);
    }

    #[test]
    fn toggles_flip_once_per_press() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();
        press(&mut state, &processor, "Comma");
        press(&mut state, &processor, "Comma"); // key repeat
        assert!(state.show_grid);

        state.process_event(&InputEvent::KeyUp("Comma".into()), &processor);
        press(&mut state, &processor, "Comma");
        assert!(!state.show_grid);

        press(&mut state, &processor, "ControlRight");
        press(&mut state, &processor, "Period");
        assert!(state.show_debug && state.show_axes);
    }

    #[test]
    fn focus_loss_and_hiding_release_keys() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();
        press(&mut state, &processor, "KeyA");
        state.process_event(&InputEvent::VisibilityChanged { visible: true }, &processor);
        assert!(processor.intent(&state).left);

        state.process_event(&InputEvent::VisibilityChanged { visible: false }, &processor);
        assert!(processor.intent(&state).is_idle());

        press(&mut state, &processor, "KeyA");
        state.process_event(&InputEvent::FocusLost, &processor);
        assert!(processor.intent(&state).is_idle());
    }

    #[test]
    fn resize_is_taken_once() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();
        state.process_event(&InputEvent::Resize { width: 640, height: 480 }, &processor);
        assert_eq!(state.take_resize(), Some((640, 480)));
        assert_eq!(state.take_resize(), None);
    }

    #[test]
    fn bound_keys_are_reported() {
        let bindings = KeyBindings::default();
        assert!(bindings.is_bound("ArrowDown"));
        assert!(bindings.is_bound("Space"));
        assert!(!bindings.is_bound("KeyQ"));
    }
}
