//! Editor session: the single owner of canvas and viewport state.
//!
//! Every input is an [`EditorEvent`] applied in dispatch order. Components
//! that only render get read-only views through the accessors.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::edit::{EditModePolicy, ElementBounds};
use crate::resize::ResizeCoordinator;
use crate::store::{CanvasSize, CanvasState, CanvasStore};
use crate::viewport::{
    InitState, SavedPosition, ViewportController, ViewportSize, ViewportTransform, ZoomDirection,
};
use crate::zoom::normalize;

/// A discrete input to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    /// First layout of the viewport; triggers the one-time zoom fit.
    Mount { width: f64, height: f64 },
    /// Viewport size changed after mount.
    ViewportResized { width: f64, height: f64 },
    ZoomIn,
    ZoomOut,
    Pan { dx: f64, dy: f64 },
    Pinch { factor: f64, focus_x: f64, focus_y: f64 },
    /// End of the current drag/pinch.
    Settle,
    /// Gesture end reported with an explicit resulting transform.
    ZoomStop {
        position_x: f64,
        position_y: f64,
        scale: f64,
    },
    CenterView,
    ToggleFullscreen,
    ResizeStart,
    Resize { width: f64, height: f64 },
    ResizeStop,
    EditStart(ElementBounds),
    EditEnd,
}

/// Serializable view of the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub canvas: CanvasState,
    pub transform: ViewportTransform,
    pub saved_position: Option<SavedPosition>,
    pub init_state: InitState,
    pub resizing: bool,
    pub editing: bool,
    pub fullscreen: bool,
}

/// Owns the store, the viewport controller, the resize coordinator and the
/// edit-mode policy for one editing session.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    store: CanvasStore,
    viewport: ViewportController,
    resize: ResizeCoordinator,
    edit: EditModePolicy,
    fullscreen: bool,
}

impl EditorSession {
    /// Start a session from restored canvas state.
    ///
    /// The restored zoom is clamped into the configured bounds and becomes
    /// the starting viewport scale.
    pub fn new(config: EditorConfig, canvas: CanvasState) -> Self {
        let zoom = normalize(config.clamp_scale(canvas.zoom));
        if zoom != canvas.zoom {
            tracing::warn!("Restored zoom {} outside bounds, using {}", canvas.zoom, zoom);
        }

        let mut viewport = ViewportController::new(config);
        viewport.set_transform(0.0, 0.0, zoom);
        Self {
            store: CanvasStore::new(CanvasState { zoom, ..canvas }),
            viewport,
            ..Default::default()
        }
    }

    pub fn canvas(&self) -> &CanvasState {
        self.store.state()
    }

    pub fn transform(&self) -> &ViewportTransform {
        self.viewport.transform()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_resizing()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            canvas: *self.canvas(),
            transform: *self.transform(),
            saved_position: self.viewport.saved_position(),
            init_state: self.viewport.init_state(),
            resizing: self.is_resizing(),
            editing: self.is_editing(),
            fullscreen: self.fullscreen,
        }
    }

    /// Apply one event. Returns false if the event was ignored.
    pub fn dispatch(&mut self, event: EditorEvent) -> bool {
        tracing::trace!("Dispatch {:?}", event);
        match event {
            EditorEvent::Mount { width, height } => {
                self.viewport
                    .set_viewport_size(ViewportSize::new(width, height));
                self.viewport.initialize(&mut self.store)
            }
            EditorEvent::ViewportResized { width, height } => {
                self.viewport
                    .set_viewport_size(ViewportSize::new(width, height));
                true
            }
            EditorEvent::ZoomIn => self.viewport.zoom_by(ZoomDirection::In, &mut self.store),
            EditorEvent::ZoomOut => self.viewport.zoom_by(ZoomDirection::Out, &mut self.store),
            EditorEvent::Pan { dx, dy } => self.viewport.pan_by(dx, dy),
            EditorEvent::Pinch {
                factor,
                focus_x,
                focus_y,
            } => self.viewport.pinch(factor, focus_x, focus_y),
            EditorEvent::Settle => self.viewport.settle(&mut self.store),
            EditorEvent::ZoomStop {
                position_x,
                position_y,
                scale,
            } => self.viewport.on_zoom_settle(
                ViewportTransform::new(position_x, position_y, scale),
                &mut self.store,
            ),
            EditorEvent::CenterView => {
                self.viewport.center_view(self.store.state(), None);
                true
            }
            EditorEvent::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                true
            }
            EditorEvent::ResizeStart => {
                self.resize.start(&mut self.viewport);
                true
            }
            EditorEvent::Resize { width, height } => {
                let resizing = self.resize.is_resizing();
                self.resize
                    .on_resize(CanvasSize::from_raw(width, height), &mut self.store);
                resizing
            }
            EditorEvent::ResizeStop => {
                let resizing = self.resize.is_resizing();
                self.resize.stop(&mut self.viewport, &self.store);
                resizing
            }
            EditorEvent::EditStart(bounds) => {
                self.edit
                    .on_edit(true, Some(bounds), &mut self.viewport, &self.store);
                true
            }
            EditorEvent::EditEnd => {
                let editing = self.edit.is_editing();
                self.edit.on_edit(false, None, &mut self.viewport, &self.store);
                editing
            }
        }
    }

    /// Apply events in order and return how many were handled.
    pub fn dispatch_all<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = EditorEvent>,
    {
        events
            .into_iter()
            .map(|event| self.dispatch(event))
            .filter(|handled| *handled)
            .count()
    }
}
