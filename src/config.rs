use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::{
    control::config::{ControlConfig, clamp_kmh, clamp_percent},
    playback::local::{DEFAULT_VOLUME_STEPS, MAX_VOLUME_STEPS},
};

const ENABLED: &str = "VELOVOLUME_ENABLED";
const DYNAMIC: &str = "VELOVOLUME_DYNAMIC";
const PAUSE_THRESHOLD: &str = "VELOVOLUME_PAUSE_THRESHOLD_KMH";
const MIN_VOLUME: &str = "VELOVOLUME_MIN_VOLUME";
const MAX_VOLUME: &str = "VELOVOLUME_MAX_VOLUME";
const SPEED_FOR_MAX: &str = "VELOVOLUME_SPEED_FOR_MAX_KMH";
const SOURCE: &str = "VELOVOLUME_SOURCE";
const CONSTANT_KMH: &str = "VELOVOLUME_CONSTANT_KMH";
const SEED: &str = "VELOVOLUME_SEED";
const SAMPLE_INTERVAL: &str = "VELOVOLUME_SAMPLE_INTERVAL_MS";
const SINK: &str = "VELOVOLUME_SINK";
const TRACK: &str = "VELOVOLUME_TRACK";
const VOLUME_STEPS: &str = "VELOVOLUME_VOLUME_STEPS";
const HEADLESS: &str = "VELOVOLUME_HEADLESS";
const READ_PLAYBACK_STATE: &str = "VELOVOLUME_READ_PLAYBACK_STATE";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: expected {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Simulated,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Local,
    Log,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub control: ControlConfig,
    pub source: SourceKind,
    pub constant_kmh: f64,
    /// Random per run when unset.
    pub seed: Option<u64>,
    pub sample_interval: Duration,
    pub sink: SinkKind,
    pub track: Option<PathBuf>,
    pub volume_steps: u32,
    pub headless: bool,
    /// Seed the engine's playing belief from the sink at startup.
    pub read_playback_state: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            control: ControlConfig::default(),
            source: SourceKind::Simulated,
            constant_kmh: 25.0,
            seed: None,
            sample_interval: Duration::from_secs(1),
            sink: SinkKind::Local,
            track: None,
            volume_steps: DEFAULT_VOLUME_STEPS,
            headless: false,
            read_playback_state: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);
        let mut config = AppConfig::default();
        let control = &mut config.control;

        if let Some(enabled) = env.flag(ENABLED)? {
            control.enabled = enabled;
        }
        if let Some(dynamic) = env.flag(DYNAMIC)? {
            control.dynamic_mode = dynamic;
        }
        if let Some(kmh) = env.parse::<f64>(PAUSE_THRESHOLD, "a speed in km/h")? {
            control.pause_threshold_kmh = clamp_kmh(kmh);
        }
        if let Some(kmh) = env.parse::<f64>(SPEED_FOR_MAX, "a speed in km/h")? {
            control.speed_for_max_volume_kmh = clamp_kmh(kmh);
        }
        if let Some(percent) = env.parse::<i32>(MIN_VOLUME, "a percentage")? {
            control.min_volume_percent = clamp_percent(percent);
        }
        if let Some(percent) = env.parse::<i32>(MAX_VOLUME, "a percentage")? {
            control.max_volume_percent = clamp_percent(percent);
        }

        if let Some(source) = env.get(SOURCE) {
            config.source = match source.to_ascii_lowercase().as_str() {
                "simulated" => SourceKind::Simulated,
                "constant" => SourceKind::Constant,
                _ => return Err(invalid(SOURCE, source, "simulated or constant")),
            };
        }
        if let Some(kmh) = env.parse::<f64>(CONSTANT_KMH, "a speed in km/h")? {
            config.constant_kmh = clamp_kmh(kmh);
        }
        config.seed = env.parse::<u64>(SEED, "an unsigned integer")?;
        if let Some(ms) = env.parse::<u64>(SAMPLE_INTERVAL, "milliseconds")? {
            if ms == 0 {
                return Err(invalid(SAMPLE_INTERVAL, "0".to_string(), "milliseconds > 0"));
            }
            config.sample_interval = Duration::from_millis(ms);
        }

        if let Some(sink) = env.get(SINK) {
            config.sink = match sink.to_ascii_lowercase().as_str() {
                "local" => SinkKind::Local,
                "log" => SinkKind::Log,
                _ => return Err(invalid(SINK, sink, "local or log")),
            };
        }
        config.track = env.get(TRACK).map(PathBuf::from);
        if let Some(steps) = env.parse::<u32>(VOLUME_STEPS, "a step count")? {
            config.volume_steps = steps.clamp(1, MAX_VOLUME_STEPS);
        }
        if let Some(headless) = env.flag(HEADLESS)? {
            config.headless = headless;
        }
        if let Some(read) = env.flag(READ_PLAYBACK_STATE)? {
            config.read_playback_state = read;
        }

        Ok(config)
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse<T: FromStr>(
        &self,
        key: &'static str,
        expected: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|value| value.parse::<T>().map_err(|_| invalid(key, value, expected)))
            .transpose()
    }

    fn flag(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|value| match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(invalid(key, value, "true or false")),
            })
            .transpose()
    }
}

fn invalid(key: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        expected,
    }
}
