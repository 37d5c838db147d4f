//! Viewport pan/zoom controller.
//!
//! The controller is the only writer of [`ViewportTransform`]. Whenever a
//! scale is committed it is clamped, normalized and mirrored into the
//! [`CanvasStore`] that the caller passes in.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::store::{CanvasState, CanvasStore};
use crate::zoom::normalize;

/// Pan offset and scale applied on top of the canvas for on-screen rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    /// Horizontal pan offset in screen pixels.
    pub position_x: f64,
    /// Vertical pan offset in screen pixels.
    pub position_y: f64,
    /// Scale factor (1.0 = 100%).
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    pub fn new(position_x: f64, position_y: f64, scale: f64) -> Self {
        Self {
            position_x,
            position_y,
            scale,
        }
    }

    /// Convert canvas coordinates to viewport (screen) coordinates.
    ///
    /// Both systems have their origin at the top-left with Y increasing downward.
    pub fn canvas_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.position_x,
            y * self.scale + self.position_y,
        )
    }

    /// Convert viewport (screen) coordinates to canvas coordinates.
    pub fn screen_to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.position_x) / self.scale,
            (y - self.position_y) / self.scale,
        )
    }

    /// Get the zoom level as a percentage string.
    pub fn zoom_percent(&self) -> String {
        format!("{:.0}%", self.scale * 100.0)
    }
}

/// Measured size of the on-screen viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Smaller of the two dimensions.
    pub fn vmin(&self) -> f64 {
        self.width.min(self.height)
    }

    /// True once layout produced a usable measurement.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Last settled pan offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub x: f64,
    pub y: f64,
}

/// One-shot guard for the initial zoom fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitState {
    #[default]
    NotInitialized,
    Initializing,
    Initialized,
}

/// Direction of a button zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Pick the starting zoom that fits the whole canvas in the viewport.
///
/// Each axis gets its own fit ratio against the canvas plus a margin of
/// `initial_margin * vmin`; the smaller ratio wins so both axes fit.
pub fn compute_initial_zoom(
    config: &EditorConfig,
    canvas: &CanvasState,
    viewport: ViewportSize,
) -> f64 {
    let margin = viewport.vmin() * config.initial_margin;
    let (canvas_width, canvas_height) = canvas.size();

    let height_fit = normalize(viewport.height / (canvas_height + margin));
    let width_fit = normalize(viewport.width / (canvas_width + margin));

    let fit = if height_fit > width_fit {
        width_fit
    } else {
        height_fit
    };
    normalize(config.clamp_scale(fit))
}

/// Owner of the viewport transform.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: EditorConfig,
    transform: ViewportTransform,
    viewport: ViewportSize,
    /// False while a canvas resize is in progress.
    enabled: bool,
    /// True between the first move of a drag/pinch and its settle.
    interacting: bool,
    saved: Option<SavedPosition>,
    init: InitState,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            transform: ViewportTransform::default(),
            viewport: ViewportSize::default(),
            enabled: true,
            interacting: false,
            saved: None,
            init: InitState::NotInitialized,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn saved_position(&self) -> Option<SavedPosition> {
        self.saved
    }

    pub fn init_state(&self) -> InitState {
        self.init
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Not dragging, pinching or resizing.
    pub fn is_settled(&self) -> bool {
        self.enabled && !self.interacting
    }

    /// Record a new viewport measurement.
    pub fn set_viewport_size(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Enable or disable gesture handling.
    ///
    /// Disabling abandons any gesture in flight.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.interacting = false;
        }
        self.enabled = enabled;
        tracing::debug!("Viewport gestures {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Jump to an absolute transform. The scale is clamped into bounds.
    pub fn set_transform(&mut self, x: f64, y: f64, scale: f64) {
        self.transform = ViewportTransform::new(x, y, self.config.clamp_scale(scale));
    }

    /// Center the canvas in the viewport at `scale`, or at the current scale.
    pub fn center_view(&mut self, canvas: &CanvasState, scale: Option<f64>) {
        let scale = self.config.clamp_scale(scale.unwrap_or(self.transform.scale));
        let (canvas_width, canvas_height) = canvas.size();
        let x = (self.viewport.width - canvas_width * scale) / 2.0;
        let y = (self.viewport.height - canvas_height * scale) / 2.0;
        self.set_transform(x, y, scale);
    }

    /// Zoom one step around the viewport center.
    ///
    /// Returns false if gestures are disabled.
    pub fn zoom_by(&mut self, direction: ZoomDirection, store: &mut CanvasStore) -> bool {
        if !self.enabled {
            tracing::debug!("Ignoring zoom {:?} while disabled", direction);
            return false;
        }

        let multiplied = match direction {
            ZoomDirection::In => self.transform.scale * self.config.step_factor(),
            ZoomDirection::Out => self.transform.scale / self.config.step_factor(),
        };
        let scale = normalize(self.config.clamp_scale(multiplied));

        self.scale_around(
            scale,
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        );
        store.set_zoom(scale);
        self.save_latest_position();
        true
    }

    pub fn zoom_in(&mut self, store: &mut CanvasStore) -> bool {
        self.zoom_by(ZoomDirection::In, store)
    }

    pub fn zoom_out(&mut self, store: &mut CanvasStore) -> bool {
        self.zoom_by(ZoomDirection::Out, store)
    }

    /// Drag-pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.enabled {
            return false;
        }
        self.interacting = true;
        self.transform.position_x += dx;
        self.transform.position_y += dy;
        true
    }

    /// Pinch/wheel zoom by `factor` around a screen point.
    ///
    /// The scale may overshoot the bounds until the gesture settles.
    pub fn pinch(&mut self, factor: f64, focus_x: f64, focus_y: f64) -> bool {
        if !self.enabled {
            return false;
        }
        if !factor.is_finite() || factor <= 0.0 {
            tracing::debug!("Ignoring pinch factor {}", factor);
            return false;
        }
        self.interacting = true;
        self.scale_around(self.transform.scale * factor, focus_x, focus_y);
        true
    }

    /// Commit the end of an interactive zoom/pan gesture.
    ///
    /// The resulting scale is clamped back into bounds, the pan offset is
    /// saved and the scale is mirrored into the store.
    pub fn on_zoom_settle(&mut self, state: ViewportTransform, store: &mut CanvasStore) -> bool {
        if !self.enabled {
            return false;
        }
        let scale = normalize(self.config.clamp_scale(state.scale));
        self.transform = ViewportTransform::new(state.position_x, state.position_y, scale);
        self.interacting = false;
        self.saved = Some(SavedPosition {
            x: state.position_x,
            y: state.position_y,
        });
        store.set_zoom(scale);
        tracing::debug!(
            "Viewport settled at ({:.1}, {:.1}) x{}",
            state.position_x,
            state.position_y,
            scale
        );
        true
    }

    /// Settle the gesture tracked by this controller.
    pub fn settle(&mut self, store: &mut CanvasStore) -> bool {
        let state = self.transform;
        self.on_zoom_settle(state, store)
    }

    /// Save the current pan offset if the viewport is settled.
    pub fn save_latest_position(&mut self) -> bool {
        if !self.is_settled() {
            tracing::debug!("Not saving position while viewport is in motion");
            return false;
        }
        self.saved = Some(SavedPosition {
            x: self.transform.position_x,
            y: self.transform.position_y,
        });
        true
    }

    /// Fit and center the canvas once per session.
    ///
    /// Returns true only for the call that performed the fit. Calls before
    /// the viewport has been measured leave the guard untouched.
    pub fn initialize(&mut self, store: &mut CanvasStore) -> bool {
        if self.init != InitState::NotInitialized {
            return false;
        }
        if !self.viewport.is_measured() {
            tracing::debug!("Viewport not measured yet, deferring initial zoom");
            return false;
        }

        self.init = InitState::Initializing;

        let zoom = compute_initial_zoom(&self.config, store.state(), self.viewport);
        store.set_zoom(zoom);
        self.center_view(store.state(), Some(zoom));

        self.init = InitState::Initialized;
        self.save_latest_position();

        tracing::info!(
            "Initial zoom {} for {}x{} canvas in {:.0}x{:.0} viewport",
            zoom,
            store.state().width,
            store.state().height,
            self.viewport.width,
            self.viewport.height
        );
        true
    }

    fn scale_around(&mut self, scale: f64, focus_x: f64, focus_y: f64) {
        let (canvas_x, canvas_y) = self.transform.screen_to_canvas(focus_x, focus_y);
        self.transform.scale = scale;
        self.transform.position_x = focus_x - canvas_x * scale;
        self.transform.position_y = focus_y - canvas_y * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;

    fn measured(width: f64, height: f64) -> ViewportController {
        let mut controller = ViewportController::default();
        controller.set_viewport_size(ViewportSize::new(width, height));
        controller
    }

    #[test]
    fn test_roundtrip_conversion() {
        let transform = ViewportTransform::new(50.0, 30.0, 2.0);
        let (sx, sy) = transform.canvas_to_screen(100.0, 50.0);
        let (x, y) = transform.screen_to_canvas(sx, sy);
        assert!(approx_eq(x, 100.0));
        assert!(approx_eq(y, 50.0));
    }

    #[test]
    fn test_zoom_step_setting_scales_press() {
        let mut store = CanvasStore::default();
        let mut controller = measured(1600.0, 900.0);
        controller.zoom_by(ZoomDirection::In, &mut store);
        assert_eq!(store.zoom(), 1.22);

        let config = EditorConfig {
            zoom_step: 0.4,
            ..Default::default()
        };
        let mut store = CanvasStore::default();
        let mut controller = ViewportController::new(config);
        controller.set_viewport_size(ViewportSize::new(1600.0, 900.0));
        controller.zoom_by(ZoomDirection::In, &mut store);
        // 1.22^2 = 1.4884
        assert_eq!(store.zoom(), 1.49);
        assert_eq!(controller.transform().scale, 1.49);
    }

    #[test]
    fn test_initial_zoom_picks_limiting_axis() {
        let config = EditorConfig {
            initial_margin: 0.0,
            ..Default::default()
        };
        let canvas = CanvasState {
            width: 800,
            height: 600,
            zoom: 1.0,
        };
        let zoom = compute_initial_zoom(&config, &canvas, ViewportSize::new(1600.0, 900.0));
        assert_eq!(zoom, 1.5);
        assert!(800.0 * zoom <= 1600.0);
        assert!(600.0 * zoom <= 900.0);
    }

    #[test]
    fn test_initial_zoom_with_margin() {
        let canvas = CanvasState {
            width: 1920,
            height: 1080,
            zoom: 1.0,
        };
        // vmin 900 -> margin 90; width 1600/2010 = 0.80, height 900/1170 = 0.77
        let zoom = compute_initial_zoom(
            &EditorConfig::default(),
            &canvas,
            ViewportSize::new(1600.0, 900.0),
        );
        assert_eq!(zoom, 0.77);
    }

    #[test]
    fn test_initial_zoom_clamped() {
        let canvas = CanvasState {
            width: 10,
            height: 10,
            zoom: 1.0,
        };
        let zoom = compute_initial_zoom(
            &EditorConfig::default(),
            &canvas,
            ViewportSize::new(1600.0, 900.0),
        );
        assert_eq!(zoom, 3.0);
    }

    #[test]
    fn test_center_view() {
        let mut controller = measured(1000.0, 800.0);
        let canvas = CanvasState {
            width: 400,
            height: 200,
            zoom: 1.0,
        };
        controller.center_view(&canvas, Some(2.0));
        let t = controller.transform();
        assert!(approx_eq(t.position_x, 100.0));
        assert!(approx_eq(t.position_y, 200.0));
        assert!(approx_eq(t.scale, 2.0));
    }

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut controller = measured(1000.0, 800.0);
        let mut store = CanvasStore::default();
        for _ in 0..20 {
            controller.zoom_in(&mut store);
            assert!(controller.transform().scale <= 3.0);
        }
        assert_eq!(controller.transform().scale, 3.0);
        assert_eq!(store.zoom(), 3.0);
    }

    #[test]
    fn test_zoom_keeps_center_fixed() {
        let mut controller = measured(1000.0, 800.0);
        let mut store = CanvasStore::default();
        controller.set_transform(120.0, -40.0, 1.0);
        let before = controller.transform().screen_to_canvas(500.0, 400.0);
        controller.zoom_in(&mut store);
        let after = controller.transform().screen_to_canvas(500.0, 400.0);
        assert!(approx_eq(before.0, after.0));
        assert!(approx_eq(before.1, after.1));
    }

    #[test]
    fn test_disabled_ignores_gestures() {
        let mut controller = measured(1000.0, 800.0);
        let mut store = CanvasStore::default();
        controller.set_transform(10.0, 20.0, 1.0);
        controller.set_enabled(false);

        assert!(!controller.pan_by(50.0, 50.0));
        assert!(!controller.pinch(2.0, 0.0, 0.0));
        assert!(!controller.zoom_in(&mut store));
        assert!(!controller.on_zoom_settle(ViewportTransform::new(0.0, 0.0, 2.0), &mut store));

        assert_eq!(*controller.transform(), ViewportTransform::new(10.0, 20.0, 1.0));
        assert_eq!(store.zoom(), 1.0);
    }

    #[test]
    fn test_settle_clamps_overshoot() {
        let mut controller = measured(1000.0, 800.0);
        let mut store = CanvasStore::default();
        controller.pinch(5.0, 0.0, 0.0);
        assert!(controller.transform().scale > 3.0);
        controller.settle(&mut store);
        assert_eq!(controller.transform().scale, 3.0);
        assert_eq!(store.zoom(), 3.0);
    }

    #[test]
    fn test_position_not_saved_mid_drag() {
        let mut controller = measured(1000.0, 800.0);
        let mut store = CanvasStore::default();
        controller.set_transform(5.0, 6.0, 1.0);
        controller.save_latest_position();

        controller.pan_by(100.0, 0.0);
        assert!(!controller.save_latest_position());
        assert_eq!(controller.saved_position(), Some(SavedPosition { x: 5.0, y: 6.0 }));

        controller.settle(&mut store);
        assert_eq!(controller.saved_position(), Some(SavedPosition { x: 105.0, y: 6.0 }));
    }

    #[test]
    fn test_initialize_runs_once() {
        let mut controller = measured(1600.0, 900.0);
        let mut store = CanvasStore::default();

        assert!(controller.initialize(&mut store));
        assert_eq!(controller.init_state(), InitState::Initialized);
        let fitted = store.zoom();

        controller.zoom_in(&mut store);
        assert!(!controller.initialize(&mut store));
        assert!(!controller.initialize(&mut store));
        assert_ne!(store.zoom(), fitted);
    }

    #[test]
    fn test_initialize_waits_for_measurement() {
        let mut controller = ViewportController::default();
        let mut store = CanvasStore::default();
        assert!(!controller.initialize(&mut store));
        assert_eq!(controller.init_state(), InitState::NotInitialized);

        controller.set_viewport_size(ViewportSize::new(1280.0, 720.0));
        assert!(controller.initialize(&mut store));
        assert!(controller.saved_position().is_some());
    }
}
