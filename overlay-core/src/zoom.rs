//! Zoom scale normalization.
//!
//! Repeated multiplicative zooming drifts by tiny float amounts. Scales are
//! rounded to a fixed precision before they are stored so that two visually
//! identical zoom levels also compare equal.

use crate::config::SCALE_PRECISION;

/// Round a raw zoom factor to [`SCALE_PRECISION`] decimal places.
///
/// Non-finite input maps to `1.0`.
pub fn normalize(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 1.0;
    }
    let factor = 10f64.powi(SCALE_PRECISION);
    (raw * factor).round() / factor
}

/// Format a scale the way the canvas header shows it, e.g. `1.22x`.
pub fn zoom_label(scale: f64) -> String {
    format!("{}x", normalize(scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(normalize(1.2345), 1.23);
        assert_eq!(normalize(1.225_1), 1.23);
        assert_eq!(normalize(0.5), 0.5);
        assert_eq!(normalize(3.0), 3.0);
    }

    #[test]
    fn test_idempotent() {
        let mut raw = 0.37;
        while raw < 4.0 {
            let once = normalize(raw);
            assert_eq!(normalize(once), once, "not idempotent for {}", raw);
            raw = raw * 1.0731 + 0.0013;
        }
    }

    #[test]
    fn test_drift_collapses() {
        let drifted = 1.0 * 1.22 / 1.22 * 1.22 / 1.22;
        assert_eq!(normalize(drifted), 1.0);
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(normalize(f64::NAN), 1.0);
        assert_eq!(normalize(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_zoom_label() {
        assert_eq!(zoom_label(1.2199999), "1.22x");
        assert_eq!(zoom_label(2.0), "2x");
    }
}
