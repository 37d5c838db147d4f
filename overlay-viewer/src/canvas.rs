//! Canvas rendering for the overlay viewer.

use egui::{Align2, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use overlay_core::config::DRAWER_WIDTH;
use overlay_core::visualizer::GridConfig;
use overlay_core::{
    BlockRender, CanvasState, Color, CutVisualizer, ElementBounds, ViewportTransform,
};
use std::time::Instant;

use crate::theme;
use crate::transform::{box_rect, canvas_rect, canvas_to_screen, color32, to_viewport};

/// What an overlay element shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Label,
    CutVisualizer,
}

/// An element placed on the canvas, in canvas coordinates.
#[derive(Debug, Clone)]
pub struct OverlayElement {
    pub name: String,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayElement {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// A small starter layout; the element catalog itself lives outside the viewer.
pub fn demo_layout(visualizer: &CutVisualizer) -> Vec<OverlayElement> {
    let (grid_width, grid_height) = visualizer.extent();
    vec![
        OverlayElement {
            name: "Score".to_string(),
            kind: ElementKind::Label,
            x: 60.0,
            y: 60.0,
            width: 360.0,
            height: 90.0,
        },
        OverlayElement {
            name: "Accuracy".to_string(),
            kind: ElementKind::Label,
            x: 60.0,
            y: 170.0,
            width: 240.0,
            height: 70.0,
        },
        OverlayElement {
            name: "Cut visualizer".to_string(),
            kind: ElementKind::CutVisualizer,
            x: 1500.0,
            y: 760.0,
            width: grid_width,
            height: grid_height,
        },
    ]
}

/// Screen rect of the edit drawer, pinned to the left of the canvas area.
pub fn drawer_rect(area: Rect) -> Rect {
    Rect::from_min_size(
        area.min,
        Vec2::new((DRAWER_WIDTH as f32).min(area.width()), area.height()),
    )
}

/// Bounds handed to edit mode for `element`.
///
/// `initial_left` is the element's current left edge in viewport
/// coordinates. After re-centering the element sits `EDIT_MARGIN` to the
/// right of the drawer.
pub fn edit_bounds(
    transform: &ViewportTransform,
    area: Rect,
    element: &OverlayElement,
) -> ElementBounds {
    let rect = box_rect(
        transform,
        area,
        element.x,
        element.y,
        element.width,
        element.height,
    );
    let (initial_left, _) = to_viewport(area, rect.min);
    ElementBounds {
        initial_left,
        final_left: theme::EDIT_MARGIN,
        width: element.width,
        height: element.height,
    }
}

/// Render the canvas, its elements and the resize handle.
///
/// Returns the screen rect of the resize handle.
pub fn render_canvas(
    painter: &Painter,
    area: Rect,
    canvas: &CanvasState,
    transform: &ViewportTransform,
    resizing: bool,
) -> Rect {
    let rect = canvas_rect(transform, area, canvas);

    painter.rect_filled(rect, 0.0, theme::CANVAS_FILL);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(theme::CANVAS_STROKE_WIDTH, theme::CANVAS_BORDER),
    );

    painter.text(
        rect.left_top() - Vec2::new(0.0, 6.0),
        Align2::LEFT_BOTTOM,
        canvas.summary(),
        FontId::proportional(13.0),
        theme::SIZE_LABEL,
    );

    let handle = Rect::from_center_size(
        rect.right_bottom(),
        Vec2::splat(theme::RESIZE_HANDLE_SIZE),
    );
    let handle_color = if resizing {
        theme::RESIZE_HANDLE_ACTIVE
    } else {
        theme::RESIZE_HANDLE
    };
    painter.rect_filled(handle, 2.0, handle_color);
    handle
}

/// Render all overlay elements.
pub fn render_elements(
    painter: &Painter,
    area: Rect,
    transform: &ViewportTransform,
    elements: &[OverlayElement],
    visualizer: &CutVisualizer,
    editing: Option<usize>,
    now: Instant,
) {
    for (i, element) in elements.iter().enumerate() {
        let rect = box_rect(
            transform,
            area,
            element.x,
            element.y,
            element.width,
            element.height,
        );

        let (border, width) = if editing == Some(i) {
            (theme::ELEMENT_EDITING_BORDER, theme::EDITING_STROKE_WIDTH)
        } else {
            (theme::ELEMENT_BORDER, theme::ELEMENT_STROKE_WIDTH)
        };

        match element.kind {
            ElementKind::Label => {
                painter.rect_filled(rect, 4.0, theme::ELEMENT_FILL);
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    &element.name,
                    FontId::proportional((18.0 * transform.scale) as f32),
                    theme::ELEMENT_LABEL,
                );
            }
            ElementKind::CutVisualizer => {
                render_visualizer(painter, area, transform, element, visualizer, now);
            }
        }
        painter.rect_stroke(rect, 4.0, Stroke::new(width, border));
    }
}

/// Render the visualizer grid inside its element.
///
/// The grid is laid out in its own logical space; the viewport transform is
/// applied only when mapping to the screen.
fn render_visualizer(
    painter: &Painter,
    area: Rect,
    transform: &ViewportTransform,
    element: &OverlayElement,
    visualizer: &CutVisualizer,
    now: Instant,
) {
    let grid = visualizer.grid();
    let options = visualizer.options();

    if let Some(color) = options
        .grid_color
        .as_deref()
        .and_then(|value| value.parse::<Color>().ok())
    {
        let stroke = Stroke::new(
            (options.grid_border_size * transform.scale) as f32,
            color32(color),
        );
        let pitch = grid.pitch();
        for row in 0..visualizer.rows() {
            for column in 0..visualizer.columns() {
                let rect = box_rect(
                    transform,
                    area,
                    element.x + column as f64 * pitch,
                    element.y + row as f64 * pitch,
                    pitch,
                    pitch,
                );
                painter.rect_stroke(rect, 0.0, stroke);
            }
        }
    }

    for block in visualizer.render(now) {
        let top_left = canvas_to_screen(transform, area, element.x + block.x, element.y + block.y);
        render_block(painter, top_left, transform.scale as f32, grid, &block);
    }
}

/// Draw one note block with its shadow, indicator or dot, and cut line.
fn render_block(painter: &Painter, top_left: Pos2, scale: f32, grid: &GridConfig, block: &BlockRender) {
    let size = block.size as f32 * scale;
    let half = size / 2.0;
    let center = top_left + Vec2::splat(half);
    let angle = (block.rotation_degrees as f32).to_radians();

    let rotate = |local: Vec2| -> Pos2 {
        let (sin, cos) = angle.sin_cos();
        center + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    };
    let quad = |min: Vec2, max: Vec2| -> Vec<Pos2> {
        vec![
            rotate(min),
            rotate(Vec2::new(max.x, min.y)),
            rotate(max),
            rotate(Vec2::new(min.x, max.y)),
        ]
    };

    let colors = block.colors;
    let body = quad(Vec2::splat(-half), Vec2::splat(half));

    if block.filled {
        let depth = Vec2::new(0.0, size * 0.06);
        let shadow: Vec<Pos2> = body.iter().map(|p| *p + depth).collect();
        painter.add(Shape::convex_polygon(
            shadow,
            color32(colors.shadow),
            Stroke::NONE,
        ));
        painter.add(Shape::convex_polygon(
            body,
            color32(colors.note),
            Stroke::NONE,
        ));
    } else {
        painter.add(Shape::closed_line(
            body,
            Stroke::new(theme::MISS_STROKE_WIDTH, color32(colors.note)),
        ));
    }

    if block.show_indicator {
        let indicator = grid.indicator;
        let width = indicator.width as f32 * scale;
        let height = indicator.height as f32 * scale;
        let top = indicator.top_height as f32 * scale;
        let bottom = half - indicator.margin as f32 * scale;

        painter.add(Shape::convex_polygon(
            quad(
                Vec2::new(-width / 2.0, bottom - height),
                Vec2::new(width / 2.0, bottom),
            ),
            color32(colors.indicator),
            Stroke::NONE,
        ));
        painter.add(Shape::convex_polygon(
            quad(
                Vec2::new(-width / 2.0, bottom - height),
                Vec2::new(width / 2.0, bottom - height + top),
            ),
            color32(colors.shadow),
            Stroke::NONE,
        ));
    }

    if block.show_dot {
        let radius = grid.dot.size as f32 * scale / 2.0;
        let offset = Vec2::new(0.0, grid.dot.position as f32 * scale / 2.0);
        painter.circle_filled(center + offset, radius, color32(colors.shadow));
        painter.circle_filled(center, radius, color32(colors.indicator));
    }

    if block.show_cut {
        let reach = half * 1.2;
        painter.line_segment(
            [rotate(Vec2::new(0.0, -reach)), rotate(Vec2::new(0.0, reach))],
            Stroke::new(grid.cut_size as f32 * scale, color32(colors.cut)),
        );
    }
}
