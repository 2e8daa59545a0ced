/// Tunables of the speed-to-volume loop. Edited at runtime through the
/// engine setters, which apply the same clamping as [`clamp_percent`] and
/// [`clamp_kmh`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    pub enabled: bool,
    pub dynamic_mode: bool,
    pub pause_threshold_kmh: f64,
    pub min_volume_percent: u8,
    pub max_volume_percent: u8,
    pub speed_for_max_volume_kmh: f64,
    /// Overwritten with the device volume once at startup.
    pub default_volume_percent: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dynamic_mode: true,
            pause_threshold_kmh: 0.5,
            min_volume_percent: 30,
            max_volume_percent: 100,
            speed_for_max_volume_kmh: 30.0,
            default_volume_percent: 70,
        }
    }
}

pub fn clamp_percent(percent: i32) -> u8 {
    percent.clamp(0, 100) as u8
}

/// Negative and NaN speeds collapse to zero.
pub fn clamp_kmh(kmh: f64) -> f64 {
    kmh.max(0.0)
}
