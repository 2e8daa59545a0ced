use std::fmt;

use crate::control::config::ControlConfig;

/// The engine's own belief about playback. It is never reconciled with what
/// the platform actually plays, so a manual pause outside the engine leaves
/// `is_music_playing` stale until the engine acts again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub current_speed_kmh: f64,
    pub is_music_playing: bool,
    pub was_paused_by_engine: bool,
}

impl EngineState {
    pub fn phase(&self) -> Phase {
        match (self.is_music_playing, self.was_paused_by_engine) {
            (true, _) => Phase::Playing,
            (false, true) => Phase::PausedByEngine,
            (false, false) => Phase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    PausedByEngine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Disabled,
    ActiveDynamic,
    ActiveNormal,
}

impl Status {
    pub fn from_config(config: &ControlConfig) -> Self {
        match (config.enabled, config.dynamic_mode) {
            (false, _) => Status::Disabled,
            (true, true) => Status::ActiveDynamic,
            (true, false) => Status::ActiveNormal,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Disabled => f.write_str("Disabled"),
            Status::ActiveDynamic => f.write_str("Active – Dynamic Mode"),
            Status::ActiveNormal => f.write_str("Active – Normal Mode"),
        }
    }
}

/// Point-in-time copy of everything a caller may read from the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSnapshot {
    pub config: ControlConfig,
    pub state: EngineState,
    pub last_volume_percent: Option<u8>,
}

impl EngineSnapshot {
    pub fn status(&self) -> Status {
        Status::from_config(&self.config)
    }

    pub fn current_speed(&self) -> f64 {
        self.state.current_speed_kmh
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_dynamic_mode(&self) -> bool {
        self.config.dynamic_mode
    }

    pub fn pause_threshold(&self) -> f64 {
        self.config.pause_threshold_kmh
    }

    pub fn min_volume(&self) -> u8 {
        self.config.min_volume_percent
    }

    pub fn max_volume(&self) -> u8 {
        self.config.max_volume_percent
    }

    pub fn speed_for_max_volume(&self) -> f64 {
        self.config.speed_for_max_volume_kmh
    }

    pub fn default_volume(&self) -> u8 {
        self.config.default_volume_percent
    }

    pub fn is_music_playing(&self) -> bool {
        self.state.is_music_playing
    }

    pub fn was_paused_by_engine(&self) -> bool {
        self.state.was_paused_by_engine
    }
}
