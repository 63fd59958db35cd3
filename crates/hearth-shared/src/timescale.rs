//! Exponential time scale for the hold and fade-out sliders.
//!
//! A slider step `v` maps to `1.2^v` milliseconds, so low steps give fine
//! control and high steps cover seconds with a few movements.

use crate::constants::{TIME_SCALE_BASE, TIME_SLIDER_MAX, TIME_SLIDER_MIN};

const TIME_UNITS: [(&str, f64); 5] = [
    ("d", 86_400_000.0),
    ("h", 3_600_000.0),
    ("m", 60_000.0),
    ("s", 1_000.0),
    ("ms", 1.0),
];

/// Unrounded duration in milliseconds for a slider step.
pub fn slider_scale(step: u32) -> f64 {
    TIME_SCALE_BASE.powi(step as i32)
}

/// Duration in whole milliseconds sent to the backend for a slider step.
pub fn slider_to_millis(step: u32) -> u64 {
    slider_scale(step).floor() as u64
}

/// Largest slider step whose duration does not exceed `ms`.
///
/// Several low steps floor to the same millisecond value, so this is not an
/// inverse of [`slider_to_millis`]; it only guarantees that the step maps
/// back to the same wire value.
pub fn millis_to_slider(ms: u64) -> u32 {
    (TIME_SLIDER_MIN..=TIME_SLIDER_MAX)
        .rev()
        .find(|step| slider_to_millis(*step) <= ms)
        .unwrap_or(TIME_SLIDER_MIN)
}

/// Human readable label for a duration, e.g. `6.19ms` or `1.50s`.
pub fn format_duration(ms: f64) -> String {
    for (unit, value) in TIME_UNITS {
        if ms >= value {
            return format!("{:.2}{}", ms / value, unit);
        }
    }

    "0ms".to_string()
}

/// Map a level sample onto a 0-100 progress scale.
pub fn level_percent(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_to_millis() {
        assert_eq!(slider_to_millis(0), 1);
        assert_eq!(slider_to_millis(10), 6);
        assert_eq!(slider_to_millis(20), 38);
        assert_eq!(slider_to_millis(40), 1469);
    }

    #[test]
    fn test_millis_to_slider_maps_back_to_same_wire_value() {
        for step in TIME_SLIDER_MIN..=TIME_SLIDER_MAX {
            let ms = slider_to_millis(step);
            assert_eq!(slider_to_millis(millis_to_slider(ms)), ms, "step {step}");
        }
    }

    #[test]
    fn test_millis_to_slider_bounds() {
        assert_eq!(millis_to_slider(0), TIME_SLIDER_MIN);
        assert_eq!(millis_to_slider(u64::MAX), TIME_SLIDER_MAX);
        assert_eq!(millis_to_slider(6), 10);
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0.5), "0ms");
        assert_eq!(format_duration(1.0), "1.00ms");
        assert_eq!(format_duration(slider_scale(10)), "6.19ms");
        assert_eq!(format_duration(1_500.0), "1.50s");
        assert_eq!(format_duration(90_000.0), "1.50m");
        assert_eq!(format_duration(7_200_000.0), "2.00h");
        assert_eq!(format_duration(86_400_000.0), "1.00d");
    }

    #[test]
    fn test_level_percent() {
        assert_eq!(level_percent(0.5, 1.0), 50.0);
        assert_eq!(level_percent(0.2, 0.0), 0.0);
    }
}
