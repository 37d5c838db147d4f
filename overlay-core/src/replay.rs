//! Replay files: recorded editor gestures and timed cut events.
//!
//! ```json
//! {
//!   "canvas": { "width": 800, "height": 600, "zoom": 1.0 },
//!   "events": [{ "type": "mount", "width": 1600, "height": 900 }, { "type": "zoomIn" }],
//!   "cuts": [{ "atMs": 0, "row": 0, "column": 1, "quality": "good", "color": "#c81e1e", "timestamp": 0 }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{EditorConfig, VisualizerOptions};
use crate::error::{OverlayError, Result};
use crate::session::{EditorEvent, EditorSession};
use crate::store::CanvasState;
use crate::visualizer::{CutVisualizer, NoteCutEvent};

/// A cut event delivered `at_ms` after replay start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedCut {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: NoteCutEvent,
}

/// Contents of a replay file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplayScript {
    pub config: EditorConfig,
    pub canvas: CanvasState,
    pub events: Vec<EditorEvent>,
    pub visualizer: VisualizerOptions,
    pub cuts: Vec<TimedCut>,
}

/// Outcome of feeding cuts into a visualizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CutReplayStats {
    pub applied: usize,
    pub rejected: usize,
}

impl ReplayScript {
    /// Parse a script from JSON text.
    pub fn from_json(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| OverlayError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Run the editor events through a fresh session.
    pub fn run_session(&self) -> (EditorSession, usize) {
        let mut session = EditorSession::new(self.config, self.canvas);
        let handled = session.dispatch_all(self.events.iter().copied());
        tracing::info!("Replayed {} of {} editor events", handled, self.events.len());
        (session, handled)
    }

    /// Feed every cut due at or before `until` into a fresh visualizer.
    pub fn run_cuts(&self, start: Instant, until: Duration) -> (CutVisualizer, CutReplayStats) {
        let mut visualizer = CutVisualizer::new(self.visualizer.clone());
        let due = self
            .cuts
            .iter()
            .filter(|cut| Duration::from_millis(cut.at_ms) <= until);
        let stats = feed_cuts(&mut visualizer, due, start);
        (visualizer, stats)
    }
}

/// Apply cuts in order at `start + at_ms`. Rejected events are counted and
/// skipped.
pub fn feed_cuts<'a, I>(visualizer: &mut CutVisualizer, cuts: I, start: Instant) -> CutReplayStats
where
    I: IntoIterator<Item = &'a TimedCut>,
{
    let mut stats = CutReplayStats::default();
    for cut in cuts {
        match visualizer.apply(cut.event, start + Duration::from_millis(cut.at_ms)) {
            Ok(_) => stats.applied += 1,
            Err(_) => stats.rejected += 1,
        }
    }
    stats
}

/// Load a replay script from disk.
pub fn load_script(path: &Path) -> Result<ReplayScript> {
    if !path.exists() {
        return Err(OverlayError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(OverlayError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let script = ReplayScript::from_json(path, &content)?;
    tracing::debug!(
        "Loaded {}: {} events, {} cuts",
        path.display(),
        script.events.len(),
        script.cuts.len()
    );
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let err = load_script(Path::new("/nonexistent/replay.json")).unwrap_err();
        assert!(matches!(err, OverlayError::FileNotFound { .. }));
    }

    #[test]
    fn test_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();
        let err = load_script(file.path()).unwrap_err();
        assert!(matches!(err, OverlayError::EmptyFile { .. }));
    }

    #[test]
    fn test_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"events": [{{"type": "warp"}}]}}"#).unwrap();
        let err = load_script(file.path()).unwrap_err();
        assert_eq!(err.code_value(), -3);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let script = ReplayScript::from_json(Path::new("inline"), "{}").unwrap();
        assert_eq!(script, ReplayScript::default());
    }

    #[test]
    fn test_run_cuts_until() {
        let script = ReplayScript::from_json(
            Path::new("inline"),
            r##"{"cuts": [
                {"atMs": 0, "row": 0, "column": 0, "quality": "good", "color": "#ff0000", "timestamp": 0},
                {"atMs": 100, "row": 9, "column": 0, "quality": "bad", "color": "#0000ff", "timestamp": 100},
                {"atMs": 900, "row": 1, "column": 1, "quality": "miss", "color": "#0000ff", "timestamp": 900}
            ]}"##,
        )
        .unwrap();

        let (visualizer, stats) = script.run_cuts(Instant::now(), Duration::from_millis(500));
        assert_eq!(stats, CutReplayStats { applied: 1, rejected: 1 });
        assert!(visualizer.event_at(1, 1).is_none());
    }
}
