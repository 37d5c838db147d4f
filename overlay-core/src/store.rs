//! Session-scoped canvas size and zoom.
//!
//! The store is owned by the editor session. Writers receive `&mut CanvasStore`
//! from the session; renderers only ever see `&CanvasState`.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

/// Logical canvas dimensions and the mirrored viewport zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Width in logical (unscaled) pixels.
    pub width: u32,
    /// Height in logical (unscaled) pixels.
    pub height: u32,
    /// Committed viewport scale.
    pub zoom: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            zoom: 1.0,
        }
    }
}

impl CanvasState {
    /// Canvas size as floats.
    pub fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    /// Header text shown above the canvas.
    pub fn summary(&self) -> String {
        format!(
            "{} x {}, zoom: {}",
            self.width,
            self.height,
            crate::zoom::zoom_label(self.zoom)
        )
    }
}

/// Canvas size requested by a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Build a size from raw pointer-derived dimensions.
    ///
    /// Values are rounded and clamped to at least one pixel.
    pub fn from_raw(width: f64, height: f64) -> Self {
        Self {
            width: to_dimension(width),
            height: to_dimension(height),
        }
    }
}

fn to_dimension(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    raw.round().min(u32::MAX as f64) as u32
}

/// Partial update of the canvas state. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub zoom: Option<f64>,
}

/// Owner of the session's [`CanvasState`].
#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    state: CanvasState,
}

impl CanvasStore {
    /// Create a store seeded with the given state, e.g. one restored from
    /// persisted session data.
    pub fn new(state: CanvasState) -> Self {
        let mut store = Self::default();
        store.apply(CanvasPatch {
            width: Some(state.width),
            height: Some(state.height),
            zoom: Some(state.zoom),
        });
        store
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Current committed zoom.
    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: CanvasPatch) {
        if let Some(width) = patch.width {
            self.state.width = width.max(1);
        }
        if let Some(height) = patch.height {
            self.state.height = height.max(1);
        }
        if let Some(zoom) = patch.zoom {
            if zoom.is_finite() && zoom > 0.0 {
                self.state.zoom = zoom;
            } else {
                tracing::warn!("Ignoring invalid zoom {}", zoom);
            }
        }
    }

    /// Write a new canvas size.
    pub fn set_size(&mut self, size: CanvasSize) {
        self.apply(CanvasPatch {
            width: Some(size.width),
            height: Some(size.height),
            zoom: None,
        });
    }

    /// Write a new committed zoom.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.apply(CanvasPatch {
            zoom: Some(zoom),
            ..Default::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut store = CanvasStore::default();
        store.apply(CanvasPatch {
            width: Some(800),
            ..Default::default()
        });
        assert_eq!(store.state().width, 800);
        assert_eq!(store.state().height, DEFAULT_CANVAS_HEIGHT);
        assert_eq!(store.zoom(), 1.0);
    }

    #[test]
    fn test_size_from_raw_clamps() {
        assert_eq!(
            CanvasSize::from_raw(-20.0, 0.4),
            CanvasSize {
                width: 1,
                height: 1
            }
        );
        assert_eq!(
            CanvasSize::from_raw(640.6, 480.2),
            CanvasSize {
                width: 641,
                height: 480
            }
        );
    }

    #[test]
    fn test_invalid_zoom_ignored() {
        let mut store = CanvasStore::default();
        store.set_zoom(1.5);
        store.set_zoom(f64::NAN);
        store.set_zoom(-1.0);
        assert_eq!(store.zoom(), 1.5);
    }

    #[test]
    fn test_summary() {
        let store = CanvasStore::new(CanvasState {
            width: 800,
            height: 600,
            zoom: 1.5,
        });
        assert_eq!(store.state().summary(), "800 x 600, zoom: 1.5x");
    }
}
