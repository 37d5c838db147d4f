//! overlay-core - Canvas transform and cut visualizer engine for stream
//! overlay editing.
//!
//! The crate keeps a fixed-size logical canvas consistent with a pan/zoom
//! viewport, interactive canvas resizing and an edit mode that temporarily
//! re-frames the viewport around one element. Alongside it, the cut
//! visualizer turns a stream of scored note events into a grid of fading
//! blocks.
//!
//! # Example
//!
//! ```
//! use overlay_core::{EditorEvent, EditorSession};
//!
//! let mut session = EditorSession::default();
//! session.dispatch(EditorEvent::Mount { width: 1600.0, height: 900.0 });
//! session.dispatch(EditorEvent::ZoomIn);
//! assert!(session.canvas().zoom <= overlay_core::config::MAX_SCALE);
//! ```

pub mod config;
pub mod edit;
pub mod error;
pub mod replay;
pub mod resize;
pub mod session;
pub mod store;
pub mod viewport;
pub mod visualizer;
pub mod zoom;

// Re-exports for convenience
pub use config::{EditorConfig, VisualizerOptions};
pub use edit::{EditModePolicy, ElementBounds};
pub use error::{ErrorCode, OverlayError, Result};
pub use replay::{load_script, ReplayScript, TimedCut};
pub use resize::{ResizeCoordinator, ResizeState};
pub use session::{EditorEvent, EditorSession, SessionSnapshot};
pub use store::{CanvasPatch, CanvasSize, CanvasState, CanvasStore};
pub use viewport::{
    compute_initial_zoom, InitState, SavedPosition, ViewportController, ViewportSize,
    ViewportTransform, ZoomDirection,
};
pub use visualizer::{
    BlockRender, Color, CutDirection, CutQuality, CutVisualizer, GridConfig, NoteCutEvent,
};
pub use zoom::normalize;
