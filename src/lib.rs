// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, KeyboardEvent, Window};

#[cfg(target_arch = "wasm32")]
use config::Config;
#[cfg(target_arch = "wasm32")]
use controller::{AvatarController, FrameLoopContext, InputEvent, InputProcessor, InputState};
#[cfg(target_arch = "wasm32")]
use model::{Camera, Scene};
#[cfg(target_arch = "wasm32")]
use view::{AvatarStyle, CanvasPainter};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let config = Config::default();
    logging::init(&config.logging);

    let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
    let (width, height) = window_size(&window);
    let (document, canvas) = init_canvas(&window, width, height)?;
    let overlay = init_overlay(&document)?;
    setup_app(&window, &document, canvas, overlay, config)
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
fn setup_app(
    window: &Window,
    document: &Document,
    canvas: HtmlCanvasElement,
    overlay: HtmlElement,
    config: Config,
) -> Result<(), JsValue> {
    let width = canvas.width();
    let height = canvas.height();

    let camera = Camera::new(width, height, &config.camera);
    let mut controller = AvatarController::new(&config.player, &config.camera, camera)
        .with_intro_settle(config.intro.settle);
    if config.intro.enabled {
        controller.camera_fall(
            config.intro.start_height,
            config.intro.fall_duration,
            config.intro.delay,
        );
    }

    let scene = Scene::new(&config.world);
    let input_state = Rc::new(RefCell::new(InputState::new()));
    let input_processor = InputProcessor::default();

    setup_input_listeners(document, window, input_state.clone(), input_processor.clone())?;

    let mut frame_ctx = FrameLoopContext {
        controller,
        scene,
        input_state,
        input_processor,
        painter: CanvasPainter::new(canvas)?,
        overlay,
        avatar_style: AvatarStyle {
            body: config.player.body_color,
            eyes: config.player.eye_color,
        },
        last_time: window.performance().map(|p| p.now()).unwrap_or(0.0),
    };

    // Continuous redraw using requestAnimationFrame
    let f = RcCellCallback::new(window.clone(), {
        let window_for_loop = window.clone();
        move || {
            if let Err(err) = frame_ctx.update(&window_for_loop) {
                tracing::error!(?err, "frame update failed");
            }
        }
    });
    f.start()
}

/// Setup all input event listeners with platform-agnostic abstractions
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    window: &Window,
    input_state: Rc<RefCell<InputState>>,
    input_processor: InputProcessor,
) -> Result<(), JsValue> {
    // Keyboard down
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            // Keep arrows and space from scrolling the page
            if input_processor.bindings().is_bound(&e.code()) {
                e.prevent_default();
            }
            let event = controller::input::wasm::keyboard_event_to_input(&e, true);
            input_state.borrow_mut().process_event(&event, &input_processor);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keyboard up
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let event = controller::input::wasm::keyboard_event_to_input(&e, false);
            input_state.borrow_mut().process_event(&event, &input_processor);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }

    // Focus loss - clear all keys
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            input_state
                .borrow_mut()
                .process_event(&InputEvent::FocusLost, &input_processor);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Visibility change - clear all keys when hidden
    {
        let input_state = input_state.clone();
        let input_processor = input_processor.clone();
        let doc = document.clone();
        let visibility = Closure::wrap(Box::new(move |_e: Event| {
            let event = InputEvent::VisibilityChanged { visible: !doc.hidden() };
            input_state.borrow_mut().process_event(&event, &input_processor);
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
        visibility.forget();
    }

    // Window resize
    {
        let win = window.clone();
        let resize = Closure::wrap(Box::new(move |_e: Event| {
            let (width, height) = window_size(&win);
            input_state
                .borrow_mut()
                .process_event(&InputEvent::Resize { width, height }, &input_processor);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn window_size(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback) as u32
    };
    (
        dim(window.inner_width(), 800.0),
        dim(window.inner_height(), 600.0),
    )
}

#[cfg(target_arch = "wasm32")]
fn init_canvas(
    window: &Window,
    width: u32,
    height: u32,
) -> Result<(Document, HtmlCanvasElement), JsValue> {
    let document = window.document().ok_or_else(|| js_error("no document on window"))?;
    let body = document.body().ok_or_else(|| js_error("no body on document"))?;
    body.style().set_property("margin", "0")?;
    body.style().set_property("overflow", "hidden")?;

    let canvas_el = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    canvas_el.set_width(width);
    canvas_el.set_height(height);
    canvas_el.style().set_property("display", "block")?;
    body.append_child(&canvas_el)?;
    Ok((document, canvas_el))
}

/// Hidden debug panel in the top-left corner.
#[cfg(target_arch = "wasm32")]
fn init_overlay(document: &Document) -> Result<HtmlElement, JsValue> {
    let body = document.body().ok_or_else(|| js_error("no body on document"))?;
    let overlay = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| js_error("failed to create overlay"))?;
    let style = overlay.style();
    for (name, value) in [
        ("position", "absolute"),
        ("top", "8px"),
        ("left", "8px"),
        ("padding", "6px 8px"),
        ("font", "12px monospace"),
        ("background", "rgba(255, 255, 255, 0.7)"),
        ("pointer-events", "none"),
        ("display", "none"),
    ] {
        style.set_property(name, value)?;
    }
    body.append_child(&overlay)?;
    Ok(overlay)
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: Into<String>>(msg: E) -> JsValue {
    JsValue::from_str(&msg.into())
}

#[cfg(target_arch = "wasm32")]
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) -> Result<(), JsValue> {
        let inner = self.inner.clone();
        let window = self.window.clone();
        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();
            // Recursively schedule next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(err) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!(?err, "requestAnimationFrame failed");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            self.window
                .request_animation_frame(cb.as_ref().unchecked_ref())?;
        }
        // Leak the closure to keep it alive
        std::mem::forget(callback);
        Ok(())
    }
}
