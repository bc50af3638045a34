//! Drawing interface towards the host
//!
//! The probe describes what to draw; the host's canvas does the drawing.
//! `DisplayList` records the calls instead, for hosts that replay them later
//! and for tests.

use crate::config::ToolColor;
use crate::domain::CanvasPoint;

/// Text box placement relative to the label anchor, in canvas units
pub mod layout {
    /// Gap between the anchor and the value line, added to the font height
    pub const VALUE_GAP: f64 = 5.0;
    /// Gap between the anchor and the coordinates line, added to the font height
    pub const COORDINATES_GAP: f64 = 20.0;
}

/// How a handle marker is drawn
#[derive(Clone, Debug, PartialEq)]
pub struct HandleStyle {
    pub color: ToolColor,
    /// `None` lets the renderer pick its default radius
    pub radius: Option<f64>,
    /// Dash pattern, `None` for a solid outline
    pub line_dash: Option<Vec<f64>>,
}

/// Drawing primitives provided by the viewer
pub trait Renderer {
    /// Open a drawing scope (save canvas state)
    fn begin(&mut self) {}
    /// Close the scope opened by `begin`
    fn end(&mut self) {}
    /// Height of the current label font in canvas units
    fn font_height(&self) -> f64;
    fn draw_handle(&mut self, position: CanvasPoint, style: &HandleStyle);
    fn draw_text_box(&mut self, text: &str, x: f64, y: f64, color: ToolColor);
}

/// Run `f` inside a begin/end scope
pub fn draw<R: Renderer + ?Sized>(renderer: &mut R, f: impl FnOnce(&mut R)) {
    renderer.begin();
    f(renderer);
    renderer.end();
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Begin,
    End,
    Handle {
        position: CanvasPoint,
        style: HandleStyle,
    },
    TextBox {
        text: String,
        x: f64,
        y: f64,
        color: ToolColor,
    },
}

/// Renderer that records draw calls in order
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub font_height: f64,
    pub calls: Vec<DrawCall>,
}

impl DisplayList {
    pub fn new(font_height: f64) -> Self {
        Self {
            font_height,
            calls: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::TextBox { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn handles(&self) -> Vec<CanvasPoint> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Handle { position, .. } => Some(*position),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for DisplayList {
    fn begin(&mut self) {
        self.calls.push(DrawCall::Begin);
    }

    fn end(&mut self) {
        self.calls.push(DrawCall::End);
    }

    fn font_height(&self) -> f64 {
        self.font_height
    }

    fn draw_handle(&mut self, position: CanvasPoint, style: &HandleStyle) {
        self.calls.push(DrawCall::Handle {
            position,
            style: style.clone(),
        });
    }

    fn draw_text_box(&mut self, text: &str, x: f64, y: f64, color: ToolColor) {
        self.calls.push(DrawCall::TextBox {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}
