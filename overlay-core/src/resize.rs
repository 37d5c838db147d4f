//! Canvas resize coordination.
//!
//! While a resize handle is being dragged the viewport must not react to
//! gestures, otherwise the handle and the pan fight over the same pointer.

use serde::{Deserialize, Serialize};

use crate::store::{CanvasSize, CanvasStore};
use crate::viewport::ViewportController;

/// Resize state machine: `Idle -> Resizing -> Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        /// Last size written to the store.
        last: Option<CanvasSize>,
    },
}

/// Tracks an in-progress manual resize of the canvas.
#[derive(Debug, Clone, Default)]
pub struct ResizeCoordinator {
    state: ResizeState,
}

impl ResizeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Begin a resize and suspend viewport gestures.
    pub fn start(&mut self, viewport: &mut ViewportController) {
        if self.is_resizing() {
            return;
        }
        self.state = ResizeState::Resizing { last: None };
        viewport.set_enabled(false);
        tracing::debug!("Canvas resize started");
    }

    /// Write an intermediate size. Every frame is applied, no debouncing.
    pub fn on_resize(&mut self, size: CanvasSize, store: &mut CanvasStore) {
        let ResizeState::Resizing { last } = &mut self.state else {
            tracing::debug!("Ignoring resize to {}x{} outside a resize", size.width, size.height);
            return;
        };
        *last = Some(size);
        store.set_size(size);
    }

    /// Finish the resize, re-enable gestures and re-center the canvas.
    pub fn stop(&mut self, viewport: &mut ViewportController, store: &CanvasStore) {
        let ResizeState::Resizing { last } = self.state else {
            tracing::debug!("Ignoring resize stop while idle");
            return;
        };
        self.state = ResizeState::Idle;
        viewport.set_enabled(true);
        viewport.center_view(store.state(), None);

        if let Some(size) = last {
            tracing::info!("Canvas resized to {}x{}", size.width, size.height);
        }
    }
}
