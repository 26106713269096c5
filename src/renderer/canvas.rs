//! Canvas 2D presentation surface
//!
//! Draws in logical field coordinates; the viewport scale is applied as the
//! context transform. Overlay panels are plain DOM elements shown and hidden
//! from the view model.

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::PresentationSurface;
use crate::consts::*;
use crate::platform::Viewport;
use crate::sim::{Bird, Obstacle, World};
use crate::view::{Panel, ViewModel, wrap_text};

const SKY_TOP: &str = "#87CEEB";
const SKY_BOTTOM: &str = "#E0F6FF";
const GROUND: &str = "#8B4513";
const PIPE: &str = "#228B22";
const BIRD: &str = "#FFD700";
const OUTLINE: &str = "black";

/// Max width of wrapped overlay text
const OVERLAY_TEXT_WIDTH: f32 = FIELD_WIDTH - 40.0;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    viewport: Viewport,
    /// Panel and text last written to the DOM
    shown: Option<(Option<Panel>, Option<String>)>,
}

impl CanvasSurface {
    /// Wrap a canvas; returns `None` if it has no 2D context
    pub fn new(canvas: HtmlCanvasElement, document: Document) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let viewport = Viewport::fit(canvas.width() as f32, canvas.height() as f32);
        Some(Self {
            canvas,
            ctx,
            document,
            viewport,
            shown: None,
        })
    }

    /// Refit the canvas to a new window size
    pub fn resize(&mut self, window_width: f32, window_height: f32) {
        self.viewport = Viewport::fit(window_width, window_height);
        self.canvas.set_width(self.viewport.width as u32);
        self.canvas.set_height(self.viewport.height as u32);
        log::debug!(
            "Canvas resized to {}x{}",
            self.viewport.width as u32,
            self.viewport.height as u32
        );
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, FIELD_HEIGHT as f64);
        let _ = gradient.add_color_stop(0.0, SKY_TOP);
        let _ = gradient.add_color_stop(1.0, SKY_BOTTOM);
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        ctx.set_fill_style_str(GROUND);
        ctx.fill_rect(
            0.0,
            GROUND_Y as f64,
            FIELD_WIDTH as f64,
            (FIELD_HEIGHT - GROUND_Y) as f64,
        );
    }

    fn draw_obstacle(&self, obstacle: &Obstacle) {
        let ctx = &self.ctx;
        let (x, w) = (obstacle.x as f64, obstacle.width as f64);
        let top = obstacle.gap_top as f64;
        let bottom = obstacle.gap_bottom as f64;
        let bottom_height = FIELD_HEIGHT as f64 - bottom;

        ctx.set_fill_style_str(PIPE);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(2.0);
        ctx.fill_rect(x, 0.0, w, top);
        ctx.stroke_rect(x, 0.0, w, top);
        ctx.fill_rect(x, bottom, w, bottom_height);
        ctx.stroke_rect(x, bottom, w, bottom_height);
    }

    fn draw_bird(&self, bird: &Bird) {
        if !bird.visible() {
            return;
        }
        let ctx = &self.ctx;
        let (w, h) = (bird.size.x as f64, bird.size.y as f64);
        ctx.save();
        let _ = ctx.translate(bird.pos.x as f64 + w / 2.0, bird.pos.y as f64 + h / 2.0);
        let _ = ctx.rotate(bird.tilt as f64 * PI / 180.0);
        ctx.set_fill_style_str(BIRD);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(2.0);
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
        ctx.restore();
    }

    fn draw_hud(&self, view: &ViewModel) {
        let ctx = &self.ctx;
        ctx.set_font("20px 'Press Start 2P'");

        let score_width = self.text_width(&view.score_text) as f64;
        let padding = 10.0;
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
        ctx.fill_rect(10.0 - padding, 10.0, score_width + padding * 2.0, 30.0);
        ctx.set_fill_style_str(OUTLINE);
        let _ = ctx.fill_text(&view.score_text, 10.0, 30.0);

        if let Some(attempts) = &view.attempts_text {
            ctx.set_font("12px 'Press Start 2P'");
            let _ = ctx.fill_text(attempts, 10.0, 58.0);
        }
    }

    fn draw_countdown(&self, seconds: u32) {
        let ctx = &self.ctx;
        let text = seconds.to_string();
        ctx.set_font("40px 'Press Start 2P'");
        let x = FIELD_WIDTH as f64 / 2.0 - self.text_width(&text) as f64 / 2.0;
        ctx.set_fill_style_str("white");
        let _ = ctx.fill_text(&text, x, 300.0);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(4.0);
        let _ = ctx.stroke_text(&text, x, 300.0);
    }

    /// Centered, wrapped text for phases without a DOM panel
    fn draw_overlay_text(&self, text: &str) {
        let ctx = &self.ctx;
        ctx.set_font("16px 'Press Start 2P'");
        ctx.set_fill_style_str(OUTLINE);
        let lines = wrap_text(text, OVERLAY_TEXT_WIDTH, |s| self.text_width(s));
        for (i, line) in lines.iter().enumerate() {
            let x = FIELD_WIDTH as f64 / 2.0 - self.text_width(line) as f64 / 2.0;
            let _ = ctx.fill_text(line, x, 100.0 + i as f64 * 24.0);
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Show exactly the active panel and fill in its text
    fn apply_panels(&mut self, view: &ViewModel) {
        let key = (view.active_panel, view.overlay_text.clone());
        if self.shown.as_ref() == Some(&key) {
            return;
        }

        for panel in Panel::ALL {
            let display = if view.active_panel == Some(panel) { "flex" } else { "none" };
            if let Some(el) = self
                .document
                .get_element_by_id(panel.element_id())
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = el.style().set_property("display", display);
            }
        }

        let text = view.overlay_text.as_deref().unwrap_or_default();
        match view.active_panel {
            Some(Panel::Question) => self.set_text("questionText", text),
            Some(Panel::WrongAnswer) => self.set_text("wrongAnswerText", text),
            Some(Panel::GameOver) => {
                self.set_text("finalScoreText", text);
                let best = view
                    .best_score
                    .map(|s| format!("Best: {}", s))
                    .unwrap_or_default();
                self.set_text("bestScoreText", &best);
            }
            Some(Panel::Start) | None => {}
        }

        self.shown = Some(key);
    }
}

impl PresentationSurface for CanvasSurface {
    fn present(&mut self, world: &World, view: &ViewModel) {
        let vp = self.viewport;
        let _ = self
            .ctx
            .set_transform(vp.scale_x as f64, 0.0, 0.0, vp.scale_y as f64, 0.0, 0.0);
        self.ctx
            .clear_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

        self.draw_background();
        for obstacle in &world.obstacles {
            self.draw_obstacle(obstacle);
        }
        self.draw_bird(&world.bird);
        self.draw_hud(view);

        if let Some(seconds) = view.countdown {
            self.draw_countdown(seconds);
        }
        if view.active_panel.is_none() {
            if let Some(text) = &view.overlay_text {
                self.draw_overlay_text(text);
            }
        }

        self.apply_panels(view);
    }
}
