//! egui adapters for the core viewport transform.
//!
//! The core works in viewport-relative f64 coordinates. The viewer adds the
//! on-screen origin of the canvas area and converts to egui types.

use egui::{Color32, Pos2, Rect, Vec2};
use overlay_core::{CanvasState, Color, ViewportTransform};

/// Convert canvas coordinates to a screen position.
pub fn canvas_to_screen(transform: &ViewportTransform, area: Rect, x: f64, y: f64) -> Pos2 {
    let (sx, sy) = transform.canvas_to_screen(x, y);
    Pos2::new(area.min.x + sx as f32, area.min.y + sy as f32)
}

/// Convert a screen position to canvas coordinates.
pub fn screen_to_canvas(transform: &ViewportTransform, area: Rect, pos: Pos2) -> (f64, f64) {
    transform.screen_to_canvas((pos.x - area.min.x) as f64, (pos.y - area.min.y) as f64)
}

/// Screen position relative to the viewport area, as the core expects it.
pub fn to_viewport(area: Rect, pos: Pos2) -> (f64, f64) {
    ((pos.x - area.min.x) as f64, (pos.y - area.min.y) as f64)
}

/// Screen rectangle covered by the canvas.
pub fn canvas_rect(transform: &ViewportTransform, area: Rect, canvas: &CanvasState) -> Rect {
    let (width, height) = canvas.size();
    Rect::from_two_pos(
        canvas_to_screen(transform, area, 0.0, 0.0),
        canvas_to_screen(transform, area, width, height),
    )
}

/// Screen rectangle of a canvas-space box.
pub fn box_rect(
    transform: &ViewportTransform,
    area: Rect,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Rect {
    Rect::from_min_size(
        canvas_to_screen(transform, area, x, y),
        Vec2::new(
            (width * transform.scale) as f32,
            (height * transform.scale) as f32,
        ),
    )
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
