//! Block geometry derived from the cell size.

use serde::Serialize;

use crate::config::VisualizerOptions;

/// Gap factor that keeps a 45° rotated square inside its cell.
const ROTATION_GAP_FACTOR: f64 = std::f64::consts::SQRT_2 - 1.08;

/// Direction indicator bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorGeometry {
    pub height: f64,
    pub width: f64,
    pub top_height: f64,
    pub margin: f64,
}

/// Dot drawn on any-direction notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DotGeometry {
    pub size: f64,
    pub position: f64,
}

/// Shape and sizing shared by every block in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub cell_size: f64,
    pub indicator: IndicatorGeometry,
    pub dot: DotGeometry,
    /// Thickness of the cut line.
    pub cut_size: f64,
    /// Padding on each side of a block.
    pub note_padding: f64,
    pub border_size: f64,
}

impl GridConfig {
    /// Derive the geometry for `cell_size` and an optional explicit `gap`.
    pub fn new(cell_size: f64, gap: Option<f64>, border_size: f64) -> Self {
        let gap = gap.unwrap_or(ROTATION_GAP_FACTOR * cell_size);
        Self {
            cell_size,
            indicator: IndicatorGeometry {
                height: cell_size * 0.2,
                width: cell_size * 0.56,
                top_height: cell_size * 0.1,
                margin: cell_size * 0.22,
            },
            dot: DotGeometry {
                size: cell_size * 0.2,
                position: cell_size * 0.1,
            },
            cut_size: cell_size * 0.05,
            note_padding: gap / 2.0,
            border_size,
        }
    }

    pub fn from_options(options: &VisualizerOptions) -> Self {
        Self::new(options.cell_size, options.gap, options.grid_border_size)
    }

    /// Distance between the origins of two neighbouring cells.
    pub fn pitch(&self) -> f64 {
        self.cell_size + 2.0 * self.note_padding
    }

    /// Top-left of the block at (row, column) in logical grid space.
    pub fn cell_origin(&self, row: usize, column: usize) -> (f64, f64) {
        (
            column as f64 * self.pitch() + self.note_padding,
            row as f64 * self.pitch() + self.note_padding,
        )
    }

    /// Total grid extent as (width, height).
    pub fn extent(&self, rows: usize, columns: usize) -> (f64, f64) {
        (columns as f64 * self.pitch(), rows as f64 * self.pitch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::float_cmp::approx_eq;

    #[test]
    fn test_default_padding_fits_rotation() {
        let grid = GridConfig::new(50.0, None, 2.0);
        assert!(approx_eq(grid.note_padding, (2f64.sqrt() - 1.08) * 50.0 / 2.0));
        // Rotated diagonal overshoot per side must fit inside the padding.
        let overshoot = (50.0 * 2f64.sqrt() - 50.0) / 2.0;
        assert!(grid.pitch() - 50.0 >= overshoot * 0.8);
    }

    #[test]
    fn test_explicit_gap() {
        let grid = GridConfig::new(50.0, Some(10.0), 2.0);
        assert_eq!(grid.note_padding, 5.0);
        assert_eq!(grid.pitch(), 60.0);
        assert_eq!(grid.cell_origin(2, 3), (185.0, 125.0));
        assert_eq!(grid.extent(3, 4), (240.0, 180.0));
    }

    #[test]
    fn test_proportional_geometry() {
        let grid = GridConfig::new(100.0, Some(0.0), 2.0);
        assert!(approx_eq(grid.indicator.width, 56.0));
        assert!(approx_eq(grid.indicator.margin, 22.0));
        assert!(approx_eq(grid.dot.size, 20.0));
        assert!(approx_eq(grid.cut_size, 5.0));
    }
}
