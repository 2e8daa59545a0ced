use crate::control::config::ControlConfig;

/// Linear map from speed to volume between the pause threshold and
/// `speed_for_max_volume_kmh`. The threshold itself maps to the minimum.
///
/// An inverted volume range (`min > max`) is used as given, so volume then
/// falls with speed. The result is always within `0..=100`.
pub fn volume_for_speed(config: &ControlConfig, speed_kmh: f64) -> u8 {
    let min = config.min_volume_percent;
    let max = config.max_volume_percent;
    let threshold = config.pause_threshold_kmh;
    let full = config.speed_for_max_volume_kmh;

    if speed_kmh <= threshold {
        return min;
    }
    // Covers full <= threshold too, so the span below is never zero.
    if speed_kmh >= full {
        return max;
    }

    let span = full - threshold;
    if span <= f64::EPSILON {
        return max;
    }

    let ratio = (speed_kmh - threshold) / span;
    let volume = f64::from(min) + (f64::from(max) - f64::from(min)) * ratio;
    volume.round().clamp(0.0, 100.0) as u8
}
