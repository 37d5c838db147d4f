//! Color palette and styling constants for the viewer.

use egui::Color32;

// =============================================================================
// BACKGROUND
// =============================================================================
pub const CANVAS_BG: Color32 = Color32::from_rgb(24, 24, 30);

// =============================================================================
// OVERLAY CANVAS - the stream frame being composed
// =============================================================================
pub const CANVAS_FILL: Color32 = Color32::from_rgb(40, 44, 52);
pub const CANVAS_BORDER: Color32 = Color32::from_rgb(110, 120, 140);
pub const SIZE_LABEL: Color32 = Color32::from_rgb(170, 175, 185);
pub const RESIZE_HANDLE: Color32 = Color32::from_rgb(120, 200, 255);
pub const RESIZE_HANDLE_ACTIVE: Color32 = Color32::from_rgb(255, 220, 80);

// =============================================================================
// ELEMENTS
// =============================================================================
pub const ELEMENT_FILL: Color32 = Color32::from_rgba_premultiplied(70, 80, 100, 120);
pub const ELEMENT_BORDER: Color32 = Color32::from_rgb(140, 150, 170);
pub const ELEMENT_EDITING_BORDER: Color32 = Color32::from_rgb(255, 220, 50);
pub const ELEMENT_LABEL: Color32 = Color32::from_rgb(235, 235, 240);

// =============================================================================
// TEXT
// =============================================================================
pub const DIM_TEXT: Color32 = Color32::from_rgb(140, 145, 150);

// =============================================================================
// STROKE WIDTHS
// =============================================================================
pub const CANVAS_STROKE_WIDTH: f32 = 2.0;
pub const ELEMENT_STROKE_WIDTH: f32 = 1.5;
pub const EDITING_STROKE_WIDTH: f32 = 3.0;
pub const MISS_STROKE_WIDTH: f32 = 2.0;

/// Edge length of the square resize handle in screen pixels.
pub const RESIZE_HANDLE_SIZE: f32 = 14.0;

/// Screen gap kept between the edit drawer and the edited element.
pub const EDIT_MARGIN: f64 = 24.0;

/// Inner padding of the edit drawer.
pub const DRAWER_PADDING: f32 = 8.0;
