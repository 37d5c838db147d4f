//! Configuration constants and settings for the editor.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Minimum viewport scale.
pub const MIN_SCALE: f64 = 0.5;

/// Maximum viewport scale.
pub const MAX_SCALE: f64 = 3.0;

/// Zoom step handed to the gesture surface per button press.
pub const ZOOM_STEP: f64 = 0.2;

/// Scale multiplier applied per zoom step.
///
/// Tuned by hand against the gesture surface; the effective change of one
/// step is not `1 + ZOOM_STEP`.
pub const ZOOM_MULTIPLIER: f64 = 1.22;

/// Decimal places kept by the zoom normalizer.
pub const SCALE_PRECISION: i32 = 2;

/// Width of the side panel that opens while editing an element.
pub const DRAWER_WIDTH: f64 = 400.0;

/// Fraction of the smaller viewport dimension reserved as margin
/// when computing the initial zoom.
pub const INITIAL_ZOOM_MARGIN: f64 = 0.1;

/// Default canvas width in logical pixels.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1920;

/// Default canvas height in logical pixels.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1080;

/// Default visualizer cell size in logical pixels.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// Default fade time of a cut block in milliseconds.
pub const DEFAULT_FADE_TIME_MS: u64 = 300;

/// Default grid border size in logical pixels.
pub const DEFAULT_GRID_BORDER_SIZE: f64 = 2.0;

/// Default visualizer grid rows (Beat Saber lanes are 3x4).
pub const DEFAULT_GRID_ROWS: usize = 3;

/// Default visualizer grid columns.
pub const DEFAULT_GRID_COLUMNS: usize = 4;

/// Viewport and edit-mode settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower zoom bound.
    pub min_scale: f64,
    /// Upper zoom bound.
    pub max_scale: f64,
    /// Zoom step per button press, in units of [`ZOOM_STEP`].
    pub zoom_step: f64,
    /// Scale multiplier for a press of [`ZOOM_STEP`].
    pub zoom_multiplier: f64,
    /// Side panel width used by edit-mode re-centering.
    pub drawer_width: f64,
    /// Margin fraction for the initial zoom fit.
    pub initial_margin: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
            zoom_multiplier: ZOOM_MULTIPLIER,
            drawer_width: DRAWER_WIDTH,
            initial_margin: INITIAL_ZOOM_MARGIN,
        }
    }
}

impl EditorConfig {
    /// Clamp a scale into `[min_scale, max_scale]`.
    #[inline]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Scale factor of one button press.
    ///
    /// `zoom_multiplier` applies per [`ZOOM_STEP`], so a step of 0.4 zooms by
    /// the multiplier squared. Non-positive steps fall back to the default.
    pub fn step_factor(&self) -> f64 {
        if self.zoom_step.is_finite() && self.zoom_step > 0.0 {
            self.zoom_multiplier.powf(self.zoom_step / ZOOM_STEP)
        } else {
            tracing::debug!("Invalid zoom step {}, using default", self.zoom_step);
            self.zoom_multiplier
        }
    }
}

/// Cut visualizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerOptions {
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub columns: usize,
    /// Edge length of a note block.
    pub cell_size: f64,
    /// Explicit gap between blocks. `None` derives a gap that keeps
    /// rotated blocks inside their cell.
    pub gap: Option<f64>,
    /// Fade duration in milliseconds.
    pub fade_time_ms: u64,
    /// Grid line color, `None` for transparent.
    pub grid_color: Option<String>,
    /// Grid border width.
    pub grid_border_size: f64,
}

impl Default for VisualizerOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            columns: DEFAULT_GRID_COLUMNS,
            cell_size: DEFAULT_CELL_SIZE,
            gap: None,
            fade_time_ms: DEFAULT_FADE_TIME_MS,
            grid_color: None,
            grid_border_size: DEFAULT_GRID_BORDER_SIZE,
        }
    }
}

impl VisualizerOptions {
    /// Fade duration.
    pub fn fade_time(&self) -> Duration {
        Duration::from_millis(self.fade_time_ms)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a is in range [min, max] with epsilon tolerance.
    #[inline]
    pub fn in_range(a: f64, min: f64, max: f64) -> bool {
        a >= min - EPS && a <= max + EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_config_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.zoom_step, 0.2);
        assert_eq!(config.zoom_multiplier, 1.22);
    }

    #[test]
    fn test_partial_config_json_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"maxScale": 4.0}"#).unwrap();
        assert_eq!(config.max_scale, 4.0);
        assert_eq!(config.min_scale, MIN_SCALE);
        assert_eq!(config.drawer_width, DRAWER_WIDTH);
    }

    #[test]
    fn test_clamp_scale() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_scale(0.1), 0.5);
        assert_eq!(config.clamp_scale(12.0), 3.0);
        assert_eq!(config.clamp_scale(1.3), 1.3);
    }

    #[test]
    fn test_step_factor_follows_zoom_step() {
        let config = EditorConfig::default();
        assert!(float_cmp::approx_eq(config.step_factor(), ZOOM_MULTIPLIER));

        let doubled = EditorConfig {
            zoom_step: 0.4,
            ..Default::default()
        };
        assert!(float_cmp::approx_eq(doubled.step_factor(), 1.22 * 1.22));

        let invalid = EditorConfig {
            zoom_step: 0.0,
            ..Default::default()
        };
        assert_eq!(invalid.step_factor(), ZOOM_MULTIPLIER);
    }

    #[test]
    fn test_visualizer_fade_time() {
        let options = VisualizerOptions::default();
        assert_eq!(options.fade_time(), Duration::from_millis(300));
        assert!(options.gap.is_none());
    }
}
