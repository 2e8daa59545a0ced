#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMessage {
    Quit,
    ToggleEnabled,
    ToggleDynamicMode,

    // Relative adjustments
    PauseThreshold(f64),
    SpeedForMaxVolume(f64),
    DefaultVolume(i32),
    MinVolume(i32),
    MaxVolume(i32),
}
