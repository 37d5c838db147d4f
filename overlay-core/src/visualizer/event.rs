//! Scored note cut events delivered by the score source.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// How well a note was cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CutQuality {
    /// Right saber, right direction, enough swing.
    Good,
    /// Note was hit but the cut was wrong (direction, saber or speed).
    Bad,
    /// Note passed without being cut.
    Miss,
}

impl CutQuality {
    /// Whether the cut line is drawn across the block.
    pub fn shows_cut(self) -> bool {
        matches!(self, CutQuality::Good)
    }

    /// Whether the block body is filled (a miss is outline only).
    pub fn is_filled(self) -> bool {
        !matches!(self, CutQuality::Miss)
    }
}

/// Required cut direction of the note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    /// Dot note, any direction is accepted.
    #[default]
    Any,
}

impl CutDirection {
    /// Rotation of the block in degrees, clockwise, with `Down` as 0.
    pub fn rotation_degrees(self) -> f64 {
        match self {
            CutDirection::Down | CutDirection::Any => 0.0,
            CutDirection::DownLeft => 45.0,
            CutDirection::Left => 90.0,
            CutDirection::UpLeft => 135.0,
            CutDirection::Up => 180.0,
            CutDirection::UpRight => 225.0,
            CutDirection::Right => 270.0,
            CutDirection::DownRight => 315.0,
        }
    }

    pub fn is_dot(self) -> bool {
        matches!(self, CutDirection::Any)
    }
}

/// A single scored note, keyed by grid position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCutEvent {
    pub row: usize,
    pub column: usize,
    pub quality: CutQuality,
    /// Base block color (saber color).
    pub color: Color,
    /// Score source timestamp in milliseconds.
    pub timestamp: u64,
    #[serde(default)]
    pub direction: CutDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_defaults_direction() {
        let event: NoteCutEvent = serde_json::from_str(
            r##"{"row": 1, "column": 2, "quality": "good", "color": "#ff0000", "timestamp": 1200}"##,
        )
        .unwrap();
        assert_eq!(event.direction, CutDirection::Any);
        assert_eq!(event.quality, CutQuality::Good);
        assert_eq!(event.color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_rotation_is_multiple_of_45() {
        for direction in [
            CutDirection::Up,
            CutDirection::DownRight,
            CutDirection::Left,
            CutDirection::Any,
        ] {
            assert_eq!(direction.rotation_degrees() % 45.0, 0.0);
        }
    }

    #[test]
    fn test_quality_shape() {
        assert!(CutQuality::Good.shows_cut());
        assert!(!CutQuality::Bad.shows_cut());
        assert!(CutQuality::Bad.is_filled());
        assert!(!CutQuality::Miss.is_filled());
    }
}
