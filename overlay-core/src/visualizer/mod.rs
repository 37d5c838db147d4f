//! Cut visualizer: a fixed grid of fading note blocks.
//!
//! Every cell keeps the latest event for its position and owns a fade timer.
//! A new event at a cell replaces the timer with a fresh token, so there is
//! never more than one pending fade per cell and no global animation tick.
//! Time is passed in by the caller, which keeps rendering deterministic.

pub mod color;
pub mod event;
pub mod grid;

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::VisualizerOptions;
use crate::error::{OverlayError, Result};

pub use color::{cut_color, indicator_color, lighten, shadow_color, Color};
pub use event::{CutDirection, CutQuality, NoteCutEvent};
pub use grid::GridConfig;

/// Fade animation of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimer {
    /// Identifies the event that started this fade.
    pub token: u64,
    pub started_at: Instant,
    pub duration: Duration,
}

impl FadeTimer {
    /// Opacity at `now`, falling linearly from 1 to 0.
    pub fn opacity(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (1.0 - elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

#[derive(Debug, Clone, Default)]
struct CellSlot {
    event: Option<NoteCutEvent>,
    fade: Option<FadeTimer>,
}

/// Colors of one rendered block, already faded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockColors {
    pub note: Color,
    pub shadow: Color,
    pub indicator: Color,
    pub cut: Color,
}

impl BlockColors {
    /// Derive all block colors from the event's base color.
    pub fn from_base(base: Color) -> Self {
        Self {
            note: base,
            shadow: shadow_color(base),
            indicator: indicator_color(base),
            cut: cut_color(base),
        }
    }

    fn with_opacity(self, opacity: f64) -> Self {
        Self {
            note: self.note.with_opacity(opacity),
            shadow: self.shadow.with_opacity(opacity),
            indicator: self.indicator.with_opacity(opacity),
            cut: self.cut.with_opacity(opacity),
        }
    }
}

/// Everything a painter needs to draw one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRender {
    pub row: usize,
    pub column: usize,
    /// Top-left of the block in logical grid space.
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation_degrees: f64,
    pub opacity: f64,
    pub quality: CutQuality,
    pub direction: CutDirection,
    pub colors: BlockColors,
    pub filled: bool,
    pub show_indicator: bool,
    pub show_dot: bool,
    pub show_cut: bool,
}

/// Fixed R×C grid of independently fading cells.
#[derive(Debug, Clone)]
pub struct CutVisualizer {
    options: VisualizerOptions,
    grid: GridConfig,
    cells: Vec<CellSlot>,
    next_token: u64,
}

impl Default for CutVisualizer {
    fn default() -> Self {
        Self::new(VisualizerOptions::default())
    }
}

impl CutVisualizer {
    pub fn new(options: VisualizerOptions) -> Self {
        let grid = GridConfig::from_options(&options);
        let cells = vec![CellSlot::default(); options.rows * options.columns];
        Self {
            options,
            grid,
            cells,
            next_token: 0,
        }
    }

    pub fn options(&self) -> &VisualizerOptions {
        &self.options
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.options.rows
    }

    pub fn columns(&self) -> usize {
        self.options.columns
    }

    /// Total grid extent in logical pixels.
    pub fn extent(&self) -> (f64, f64) {
        self.grid.extent(self.rows(), self.columns())
    }

    /// Record an event and restart the fade of its cell.
    ///
    /// Returns the token of the new fade. Positions outside the grid are
    /// rejected.
    pub fn apply(&mut self, event: NoteCutEvent, now: Instant) -> Result<u64> {
        let index = self.index(event.row, event.column).ok_or_else(|| {
            tracing::warn!(
                "Rejecting cut event at ({}, {}) outside {}x{} grid",
                event.row,
                event.column,
                self.rows(),
                self.columns()
            );
            OverlayError::CellOutOfBounds {
                row: event.row,
                column: event.column,
                rows: self.rows(),
                columns: self.columns(),
            }
        })?;

        self.next_token += 1;
        let token = self.next_token;
        let slot = &mut self.cells[index];

        if let Some(previous) = slot.fade {
            if !previous.is_expired(now) {
                tracing::debug!(
                    "Cell ({}, {}) fade {} interrupted by {}",
                    event.row,
                    event.column,
                    previous.token,
                    token
                );
            }
        }

        slot.event = Some(event);
        slot.fade = Some(FadeTimer {
            token,
            started_at: now,
            duration: self.options.fade_time(),
        });
        Ok(token)
    }

    /// Apply a full `rows x columns` grid of latest events.
    ///
    /// Only cells whose event differs from the stored one restart their fade.
    /// Returns the number of restarted cells.
    pub fn apply_snapshot(&mut self, note_cuts: &[Vec<Option<NoteCutEvent>>], now: Instant) -> Result<usize> {
        let mismatch = note_cuts.len() != self.rows()
            || note_cuts.iter().any(|row| row.len() != self.columns());
        if mismatch {
            let got_columns = note_cuts
                .iter()
                .map(Vec::len)
                .find(|len| *len != self.columns())
                .unwrap_or(self.columns());
            return Err(OverlayError::GridShapeMismatch {
                rows: self.rows(),
                columns: self.columns(),
                got_rows: note_cuts.len(),
                got_columns,
            });
        }

        let mut restarted = 0;
        for (row, cells) in note_cuts.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let Some(event) = cell else {
                    continue;
                };
                // Snapshot positions are authoritative over the event's own fields.
                let event = NoteCutEvent {
                    row,
                    column,
                    ..*event
                };
                if self.event_at(row, column) == Some(&event) {
                    continue;
                }
                self.apply(event, now)?;
                restarted += 1;
            }
        }
        Ok(restarted)
    }

    /// Latest event recorded at a position. Persists after the fade ends.
    pub fn event_at(&self, row: usize, column: usize) -> Option<&NoteCutEvent> {
        self.index(row, column)
            .and_then(|i| self.cells[i].event.as_ref())
    }

    /// Current fade timer of a position.
    pub fn fade_at(&self, row: usize, column: usize) -> Option<FadeTimer> {
        self.index(row, column).and_then(|i| self.cells[i].fade)
    }

    /// Whether any cell is still fading.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.cells
            .iter()
            .filter_map(|slot| slot.fade)
            .any(|fade| !fade.is_expired(now))
    }

    /// Render one cell, or `None` if it is empty or its fade has ended.
    pub fn render_cell(&self, row: usize, column: usize, now: Instant) -> Option<BlockRender> {
        let slot = &self.cells[self.index(row, column)?];
        let event = slot.event?;
        let fade = slot.fade?;
        if fade.is_expired(now) {
            return None;
        }

        let opacity = fade.opacity(now);
        let (x, y) = self.grid.cell_origin(row, column);
        let filled = event.quality.is_filled();

        Some(BlockRender {
            row,
            column,
            x,
            y,
            size: self.grid.cell_size,
            rotation_degrees: event.direction.rotation_degrees(),
            opacity,
            quality: event.quality,
            direction: event.direction,
            colors: BlockColors::from_base(event.color).with_opacity(opacity),
            filled,
            show_indicator: filled && !event.direction.is_dot(),
            show_dot: filled && event.direction.is_dot(),
            show_cut: event.quality.shows_cut(),
        })
    }

    /// Render every visible block in row-major order.
    pub fn render(&self, now: Instant) -> Vec<BlockRender> {
        (0..self.rows())
            .flat_map(|row| (0..self.columns()).map(move |column| (row, column)))
            .filter_map(|(row, column)| self.render_cell(row, column, now))
            .collect()
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows() && column < self.columns()).then(|| row * self.columns() + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> VisualizerOptions {
        VisualizerOptions {
            rows: 3,
            columns: 4,
            ..Default::default()
        }
    }

    fn cut(row: usize, column: usize, quality: CutQuality) -> NoteCutEvent {
        NoteCutEvent {
            row,
            column,
            quality,
            color: Color::rgb(200, 30, 30),
            timestamp: 0,
            direction: CutDirection::Down,
        }
    }

    #[test]
    fn test_fade_opacity() {
        let start = Instant::now();
        let fade = FadeTimer {
            token: 1,
            started_at: start,
            duration: Duration::from_millis(300),
        };
        assert_eq!(fade.opacity(start), 1.0);
        assert!((fade.opacity(start + Duration::from_millis(150)) - 0.5).abs() < 1e-9);
        assert_eq!(fade.opacity(start + Duration::from_millis(400)), 0.0);
        assert!(fade.is_expired(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_cells_are_independent() {
        let mut visualizer = CutVisualizer::new(options());
        let start = Instant::now();
        visualizer.apply(cut(0, 0, CutQuality::Good), start).unwrap();
        let before = visualizer.render(start + Duration::from_millis(50));

        visualizer
            .apply(cut(2, 3, CutQuality::Bad), start + Duration::from_millis(50))
            .unwrap();
        let after = visualizer.render(start + Duration::from_millis(50));

        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!((after[1].row, after[1].column), (2, 3));
    }

    #[test]
    fn test_overwrite_restarts_fade() {
        let mut visualizer = CutVisualizer::new(options());
        let start = Instant::now();
        let first = visualizer.apply(cut(1, 1, CutQuality::Good), start).unwrap();

        let later = start + Duration::from_millis(200);
        let second = visualizer.apply(cut(1, 1, CutQuality::Miss), later).unwrap();
        assert_ne!(first, second);

        let fade = visualizer.fade_at(1, 1).unwrap();
        assert_eq!(fade.token, second);
        assert_eq!(fade.started_at, later);

        let block = visualizer.render_cell(1, 1, later).unwrap();
        assert_eq!(block.opacity, 1.0);
        assert_eq!(block.quality, CutQuality::Miss);
        // Still visible past the first event's expiry.
        assert!(visualizer
            .render_cell(1, 1, start + Duration::from_millis(350))
            .is_some());
    }

    #[test]
    fn test_expired_block_hidden_but_state_kept() {
        let mut visualizer = CutVisualizer::new(options());
        let start = Instant::now();
        visualizer.apply(cut(0, 2, CutQuality::Good), start).unwrap();

        let end = start + Duration::from_millis(300);
        assert!(visualizer.render(end).is_empty());
        assert!(!visualizer.is_animating(end));
        assert!(visualizer.event_at(0, 2).is_some());
    }

    #[test]
    fn test_out_of_grid_rejected() {
        let mut visualizer = CutVisualizer::new(options());
        let err = visualizer
            .apply(cut(3, 0, CutQuality::Good), Instant::now())
            .unwrap_err();
        assert!(matches!(err, OverlayError::CellOutOfBounds { row: 3, .. }));
    }

    #[test]
    fn test_quality_drives_shape() {
        let mut visualizer = CutVisualizer::new(options());
        let now = Instant::now();
        visualizer.apply(cut(0, 0, CutQuality::Good), now).unwrap();
        visualizer.apply(cut(0, 1, CutQuality::Bad), now).unwrap();
        visualizer.apply(cut(0, 2, CutQuality::Miss), now).unwrap();
        visualizer
            .apply(
                NoteCutEvent {
                    direction: CutDirection::Any,
                    ..cut(0, 3, CutQuality::Good)
                },
                now,
            )
            .unwrap();

        let blocks = visualizer.render(now);
        assert!(blocks[0].show_cut && blocks[0].show_indicator);
        assert!(!blocks[1].show_cut && blocks[1].show_indicator);
        assert!(!blocks[2].filled && !blocks[2].show_indicator);
        assert!(blocks[3].show_dot && !blocks[3].show_indicator);
    }

    #[test]
    fn test_colors_derived_from_base() {
        let mut visualizer = CutVisualizer::new(options());
        let now = Instant::now();
        visualizer.apply(cut(0, 0, CutQuality::Good), now).unwrap();
        let block = visualizer.render_cell(0, 0, now).unwrap();
        assert_eq!(block.colors.note, Color::rgb(200, 30, 30));
        assert_eq!(block.colors.cut, cut_color(Color::rgb(200, 30, 30)));
    }

    #[test]
    fn test_snapshot_restarts_only_changed_cells() {
        let mut visualizer = CutVisualizer::new(options());
        let start = Instant::now();
        let mut grid = vec![vec![None; 4]; 3];
        grid[0][0] = Some(cut(0, 0, CutQuality::Good));
        assert_eq!(visualizer.apply_snapshot(&grid, start).unwrap(), 1);

        grid[1][2] = Some(cut(1, 2, CutQuality::Bad));
        let later = start + Duration::from_millis(100);
        assert_eq!(visualizer.apply_snapshot(&grid, later).unwrap(), 1);
        assert_eq!(visualizer.fade_at(0, 0).unwrap().started_at, start);
        assert_eq!(visualizer.fade_at(1, 2).unwrap().started_at, later);
    }

    #[test]
    fn test_snapshot_shape_mismatch() {
        let mut visualizer = CutVisualizer::new(options());
        let grid = vec![vec![None; 3]; 3];
        let err = visualizer.apply_snapshot(&grid, Instant::now()).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::GridShapeMismatch {
                got_columns: 3,
                ..
            }
        ));
    }
}
