use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::draw::{css_color, DrawItem, Shape};

/// Paints draw lists onto a 2D canvas context.
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("2d context has an unexpected type"))?;
        Ok(Self { canvas, ctx })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn paint(&self, items: &[DrawItem], background: u32) -> Result<(), JsValue> {
        let (w, h) = self.size();
        self.ctx.set_fill_style(&JsValue::from_str(&css_color(background)));
        self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

        for item in items {
            match &item.shape {
                Shape::Polygon { points, fill } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    self.ctx.begin_path();
                    self.ctx.move_to(first[0] as f64, first[1] as f64);
                    for p in rest {
                        self.ctx.line_to(p[0] as f64, p[1] as f64);
                    }
                    self.ctx.close_path();
                    self.ctx.set_fill_style(&JsValue::from_str(&css_color(*fill)));
                    self.ctx.fill();
                }
                Shape::Line { from, to, color, width } => {
                    self.ctx.begin_path();
                    self.ctx.move_to(from[0] as f64, from[1] as f64);
                    self.ctx.line_to(to[0] as f64, to[1] as f64);
                    self.ctx.set_stroke_style(&JsValue::from_str(&css_color(*color)));
                    self.ctx.set_line_width(*width as f64);
                    self.ctx.stroke();
                }
                Shape::Disc { center, radius, fill } => {
                    self.ctx.begin_path();
                    self.ctx
                        .arc(center[0] as f64, center[1] as f64, *radius as f64, 0.0, TAU)?;
                    self.ctx.set_fill_style(&JsValue::from_str(&css_color(*fill)));
                    self.ctx.fill();
                }
            }
        }
        Ok(())
    }
}
