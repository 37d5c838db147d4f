//! Edit-mode re-centering.
//!
//! Opening the editor for an element slides a side panel over the viewport.
//! The viewport is shifted so the element stays visible next to the panel,
//! and the user's own framing is put back when editing ends.

use serde::{Deserialize, Serialize};

use crate::store::CanvasStore;
use crate::viewport::{InitState, ViewportController};

/// Horizontal placement of the element being edited, plus its size.
///
/// `initial_left` is the element's rendered left edge before the edit UI
/// opened, `final_left` after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBounds {
    pub initial_left: f64,
    pub final_left: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Tracks whether an element is being edited.
#[derive(Debug, Clone, Default)]
pub struct EditModePolicy {
    editing: bool,
}

impl EditModePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// React to the element editor opening (`true`) or closing (`false`).
    pub fn on_edit(
        &mut self,
        editing: bool,
        bounds: Option<ElementBounds>,
        viewport: &mut ViewportController,
        store: &CanvasStore,
    ) {
        match (editing, bounds) {
            (true, Some(bounds)) => self.enter(bounds, viewport, store),
            (true, None) => {
                tracing::warn!("Edit requested without element bounds, keeping viewport");
                self.editing = true;
            }
            (false, _) => self.leave(viewport, store),
        }
    }

    /// Shift the viewport so the edited element sits beside the side panel.
    ///
    /// The zoom never changes here. The saved framing is only captured when
    /// coming from a settled, non-editing viewport.
    pub fn enter(
        &mut self,
        bounds: ElementBounds,
        viewport: &mut ViewportController,
        store: &CanvasStore,
    ) {
        if !self.editing {
            viewport.save_latest_position();
        }
        self.editing = true;

        let pan = *viewport.transform();
        let new_x =
            bounds.final_left + pan.position_x - bounds.initial_left + viewport.config().drawer_width;
        let new_y = pan.position_y;

        viewport.set_transform(new_x, new_y, store.zoom());
        tracing::debug!(
            "Entered edit mode, viewport moved from {:.1} to {:.1}",
            pan.position_x,
            new_x
        );
    }

    /// Restore the framing saved before editing began.
    pub fn leave(&mut self, viewport: &mut ViewportController, store: &CanvasStore) {
        if !self.editing {
            return;
        }
        self.editing = false;

        if viewport.init_state() != InitState::Initialized {
            return;
        }
        if let Some(saved) = viewport.saved_position() {
            viewport.set_transform(saved.x, saved.y, store.zoom());
            tracing::debug!("Left edit mode, restored ({:.1}, {:.1})", saved.x, saved.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DRAWER_WIDTH;
    use crate::viewport::ViewportSize;

    fn initialized() -> (EditModePolicy, ViewportController, CanvasStore) {
        let mut viewport = ViewportController::default();
        viewport.set_viewport_size(ViewportSize::new(1600.0, 900.0));
        let mut store = CanvasStore::default();
        viewport.initialize(&mut store);
        (EditModePolicy::new(), viewport, store)
    }

    #[test]
    fn test_enter_shifts_by_displacement_and_drawer() {
        let (mut edit, mut viewport, store) = initialized();
        let before = *viewport.transform();

        edit.enter(
            ElementBounds {
                initial_left: 300.0,
                final_left: 120.0,
                ..Default::default()
            },
            &mut viewport,
            &store,
        );

        let after = viewport.transform();
        assert_eq!(after.position_x, 120.0 + before.position_x - 300.0 + DRAWER_WIDTH);
        assert_eq!(after.position_y, before.position_y);
        assert_eq!(after.scale, before.scale);
    }

    #[test]
    fn test_enter_leave_restores() {
        let (mut edit, mut viewport, store) = initialized();
        let before = *viewport.transform();

        edit.on_edit(
            true,
            Some(ElementBounds {
                initial_left: 10.0,
                final_left: 700.0,
                width: 200.0,
                height: 80.0,
            }),
            &mut viewport,
            &store,
        );
        assert_ne!(*viewport.transform(), before);

        edit.on_edit(false, None, &mut viewport, &store);
        assert_eq!(*viewport.transform(), before);
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_switching_elements_keeps_original_framing() {
        let (mut edit, mut viewport, store) = initialized();
        let before = *viewport.transform();
        let bounds = ElementBounds {
            initial_left: 0.0,
            final_left: 50.0,
            ..Default::default()
        };

        edit.enter(bounds, &mut viewport, &store);
        edit.enter(bounds, &mut viewport, &store);
        edit.leave(&mut viewport, &store);

        assert_eq!(*viewport.transform(), before);
    }

    #[test]
    fn test_leave_before_initialization_does_nothing() {
        let mut viewport = ViewportController::default();
        let store = CanvasStore::default();
        let mut edit = EditModePolicy::new();
        viewport.set_transform(1.0, 1.0, 1.0);

        edit.enter(ElementBounds::default(), &mut viewport, &store);
        let during = *viewport.transform();
        edit.leave(&mut viewport, &store);

        assert_eq!(*viewport.transform(), during);
    }
}
