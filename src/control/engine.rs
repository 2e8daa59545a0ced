use tracing::{debug, info};

use crate::control::{
    commands::{Effect, Notification, PlaybackCommand},
    config::{ControlConfig, clamp_kmh, clamp_percent},
    state::{EngineSnapshot, EngineState, Status},
    volume::volume_for_speed,
};

/// Hysteresis state machine that turns speed samples into playback
/// commands. Every operation returns the effects it produced, in order;
/// the caller is responsible for dispatching them.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ControlConfig,
    state: EngineState,
    last_volume: Option<u8>,
}

impl Engine {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            state: EngineState::default(),
            last_volume: None,
        }
    }

    /// Seeds the playing belief once at startup.
    pub fn with_music_playing(mut self, playing: bool) -> Self {
        self.state.is_music_playing = playing;
        self
    }

    pub fn on_speed_sample(&mut self, speed_kmh: f64) -> Vec<Effect> {
        self.state.current_speed_kmh = speed_kmh;
        let mut effects = vec![Effect::Notify(Notification::SpeedChanged(speed_kmh))];

        if !self.config.enabled {
            return effects;
        }

        debug!(
            speed_kmh,
            dynamic = self.config.dynamic_mode,
            "speed sample"
        );

        if self.config.dynamic_mode {
            self.apply_dynamic(speed_kmh, &mut effects);
        }

        effects.push(Effect::Notify(Notification::StatusChanged));
        effects
    }

    fn apply_dynamic(&mut self, speed_kmh: f64, effects: &mut Vec<Effect>) {
        if speed_kmh < self.config.pause_threshold_kmh {
            if self.state.is_music_playing {
                self.state.is_music_playing = false;
                self.state.was_paused_by_engine = true;
                info!(speed_kmh, "rider stopped, pausing music");
                effects.push(Effect::Command(PlaybackCommand::Pause));
            }
            let min = self.config.min_volume_percent;
            self.push_volume(min, effects);
        } else {
            if self.state.was_paused_by_engine && !self.state.is_music_playing {
                self.state.is_music_playing = true;
                self.state.was_paused_by_engine = false;
                info!(speed_kmh, "rider moving, resuming music");
                effects.push(Effect::Command(PlaybackCommand::Resume));
            }
            let target = self.volume_for_speed(speed_kmh);
            self.push_volume(target, effects);
        }
    }

    fn push_volume(&mut self, percent: u8, effects: &mut Vec<Effect>) {
        self.last_volume = Some(percent);
        effects.push(Effect::Command(PlaybackCommand::SetVolume(percent)));
    }

    pub fn volume_for_speed(&self, speed_kmh: f64) -> u8 {
        volume_for_speed(&self.config, speed_kmh)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Vec<Effect> {
        self.config.enabled = enabled;
        info!("engine {}", if enabled { "enabled" } else { "disabled" });
        vec![Effect::Notify(Notification::StatusChanged)]
    }

    /// Leaving dynamic mode restores the default volume right away without
    /// touching playback. Entering it waits for the next sample.
    pub fn set_dynamic_mode(&mut self, dynamic: bool) -> Vec<Effect> {
        self.config.dynamic_mode = dynamic;
        let mut effects = Vec::with_capacity(2);
        if dynamic {
            info!("switched to dynamic mode");
        } else {
            info!("switched to normal mode");
            let default = self.config.default_volume_percent;
            self.push_volume(default, &mut effects);
        }
        effects.push(Effect::Notify(Notification::StatusChanged));
        effects
    }

    pub fn set_pause_threshold(&mut self, kmh: f64) -> Vec<Effect> {
        self.config.pause_threshold_kmh = clamp_kmh(kmh);
        info!(kmh = self.config.pause_threshold_kmh, "pause threshold set");
        Vec::new()
    }

    pub fn set_speed_for_max_volume(&mut self, kmh: f64) -> Vec<Effect> {
        self.config.speed_for_max_volume_kmh = clamp_kmh(kmh);
        info!(
            kmh = self.config.speed_for_max_volume_kmh,
            "speed for max volume set"
        );
        Vec::new()
    }

    pub fn set_default_volume(&mut self, percent: i32) -> Vec<Effect> {
        self.config.default_volume_percent = clamp_percent(percent);
        let mut effects = Vec::new();
        if !self.config.dynamic_mode {
            let default = self.config.default_volume_percent;
            self.push_volume(default, &mut effects);
        }
        effects
    }

    /// Each bound is clamped on its own; `min > max` is kept as given.
    pub fn set_volume_range(&mut self, min: i32, max: i32) -> Vec<Effect> {
        self.config.min_volume_percent = clamp_percent(min);
        self.config.max_volume_percent = clamp_percent(max);
        info!(
            min = self.config.min_volume_percent,
            max = self.config.max_volume_percent,
            "volume range set"
        );
        Vec::new()
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn status(&self) -> Status {
        Status::from_config(&self.config)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config: self.config.clone(),
            state: self.state.clone(),
            last_volume_percent: self.last_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::state::Phase;

    fn playing_engine() -> Engine {
        Engine::new(ControlConfig::default()).with_music_playing(true)
    }

    fn commands(effects: &[Effect]) -> Vec<PlaybackCommand> {
        effects.iter().filter_map(Effect::as_command).collect()
    }

    fn count(effects: &[Effect], cmd: PlaybackCommand) -> usize {
        commands(effects).into_iter().filter(|c| *c == cmd).count()
    }

    #[test]
    fn sample_records_speed_and_notifies() {
        let mut engine = playing_engine();
        let effects = engine.on_speed_sample(12.0);

        assert_eq!(engine.state().current_speed_kmh, 12.0);
        assert_eq!(
            effects.first(),
            Some(&Effect::Notify(Notification::SpeedChanged(12.0)))
        );
        assert_eq!(
            effects.last(),
            Some(&Effect::Notify(Notification::StatusChanged))
        );
    }

    #[test]
    fn stopping_pauses_and_drops_to_min() {
        let mut engine = playing_engine();
        let effects = engine.on_speed_sample(0.2);

        assert_eq!(
            commands(&effects),
            vec![PlaybackCommand::Pause, PlaybackCommand::SetVolume(30)]
        );
        assert!(!engine.state().is_music_playing);
        assert!(engine.state().was_paused_by_engine);
        assert_eq!(engine.state().phase(), Phase::PausedByEngine);
    }

    #[test]
    fn hysteresis_pauses_once_and_resumes_once() {
        let mut engine = playing_engine();
        let mut all = Vec::new();

        let first = engine.on_speed_sample(1.0);
        assert_eq!(count(&first, PlaybackCommand::Pause), 0);
        all.extend(first);

        let second = engine.on_speed_sample(0.2);
        assert_eq!(count(&second, PlaybackCommand::Pause), 1);
        all.extend(second);

        let third = engine.on_speed_sample(1.0);
        assert_eq!(count(&third, PlaybackCommand::Resume), 1);
        all.extend(third);

        assert_eq!(count(&all, PlaybackCommand::Pause), 1);
        assert_eq!(count(&all, PlaybackCommand::Resume), 1);
        assert_eq!(engine.state().phase(), Phase::Playing);
    }

    #[test]
    fn repeated_stop_samples_pause_only_once() {
        let mut engine = playing_engine();
        let mut all = Vec::new();
        for _ in 0..4 {
            all.extend(engine.on_speed_sample(0.0));
        }
        assert_eq!(count(&all, PlaybackCommand::Pause), 1);
        assert_eq!(count(&all, PlaybackCommand::SetVolume(30)), 4);
    }

    #[test]
    fn same_sample_twice_while_playing_is_idempotent() {
        let mut engine = playing_engine();
        let first = engine.on_speed_sample(15.25);
        let second = engine.on_speed_sample(15.25);

        assert_eq!(commands(&first), vec![PlaybackCommand::SetVolume(65)]);
        assert_eq!(commands(&first), commands(&second));
    }

    #[test]
    fn moving_without_engine_pause_never_resumes() {
        let mut engine = Engine::new(ControlConfig::default());
        let effects = engine.on_speed_sample(20.0);
        assert_eq!(count(&effects, PlaybackCommand::Resume), 0);
        assert_eq!(engine.state().phase(), Phase::Idle);
    }

    #[test]
    fn idle_belief_never_pauses() {
        let mut engine = Engine::new(ControlConfig::default());
        let effects = engine.on_speed_sample(0.0);
        assert_eq!(commands(&effects), vec![PlaybackCommand::SetVolume(30)]);
        assert!(!engine.state().was_paused_by_engine);
    }

    #[test]
    fn disabled_engine_only_reports_speed() {
        let mut engine = playing_engine();
        engine.set_enabled(false);

        for speed in [0.0, 0.2, 15.0, 60.0] {
            let effects = engine.on_speed_sample(speed);
            assert!(commands(&effects).is_empty());
            assert_eq!(
                effects,
                vec![Effect::Notify(Notification::SpeedChanged(speed))]
            );
        }
        assert!(engine.state().is_music_playing);
        assert_eq!(engine.state().current_speed_kmh, 60.0);
    }

    #[test]
    fn set_enabled_only_notifies() {
        let mut engine = playing_engine();
        assert_eq!(
            engine.set_enabled(false),
            vec![Effect::Notify(Notification::StatusChanged)]
        );
        assert_eq!(engine.status(), Status::Disabled);
    }

    #[test]
    fn normal_mode_issues_no_commands() {
        let mut engine = playing_engine();
        engine.set_dynamic_mode(false);

        let effects = engine.on_speed_sample(0.0);
        assert!(commands(&effects).is_empty());
        assert_eq!(
            effects.last(),
            Some(&Effect::Notify(Notification::StatusChanged))
        );
    }

    #[test]
    fn leaving_dynamic_mode_restores_default_volume() {
        let mut engine = playing_engine();
        engine.set_default_volume(55);
        engine.on_speed_sample(0.1);

        let effects = engine.set_dynamic_mode(false);
        assert_eq!(
            effects,
            vec![
                Effect::Command(PlaybackCommand::SetVolume(55)),
                Effect::Notify(Notification::StatusChanged),
            ]
        );

        let mut later = Vec::new();
        for speed in [0.0, 10.0, 0.0, 25.0] {
            later.extend(engine.on_speed_sample(speed));
        }
        assert!(commands(&later).is_empty());
        assert!(engine.state().was_paused_by_engine);
    }

    #[test]
    fn reentering_dynamic_mode_waits_for_next_sample() {
        let mut engine = playing_engine();
        engine.on_speed_sample(0.1);
        engine.set_dynamic_mode(false);

        assert_eq!(
            engine.set_dynamic_mode(true),
            vec![Effect::Notify(Notification::StatusChanged)]
        );

        let effects = engine.on_speed_sample(15.25);
        assert_eq!(
            commands(&effects),
            vec![PlaybackCommand::Resume, PlaybackCommand::SetVolume(65)]
        );
    }

    #[test]
    fn default_volume_applies_immediately_only_in_normal_mode() {
        let mut engine = playing_engine();
        assert!(engine.set_default_volume(40).is_empty());
        assert_eq!(engine.config().default_volume_percent, 40);

        engine.set_dynamic_mode(false);
        assert_eq!(
            engine.set_default_volume(250),
            vec![Effect::Command(PlaybackCommand::SetVolume(100))]
        );
        assert_eq!(engine.snapshot().last_volume_percent, Some(100));
    }

    #[test]
    fn threshold_change_applies_on_next_sample() {
        let mut engine = playing_engine();
        assert!(engine.set_pause_threshold(5.0).is_empty());
        assert_eq!(engine.config().pause_threshold_kmh, 5.0);

        let effects = engine.on_speed_sample(3.0);
        assert_eq!(count(&effects, PlaybackCommand::Pause), 1);

        engine.set_pause_threshold(-2.0);
        assert_eq!(engine.config().pause_threshold_kmh, 0.0);
    }

    #[test]
    fn volume_range_is_clamped_but_not_reordered() {
        let mut engine = playing_engine();
        assert!(engine.set_volume_range(120, -10).is_empty());
        assert_eq!(engine.config().min_volume_percent, 100);
        assert_eq!(engine.config().max_volume_percent, 0);

        let effects = engine.on_speed_sample(40.0);
        assert_eq!(commands(&effects), vec![PlaybackCommand::SetVolume(0)]);
    }

    #[test]
    fn degenerate_ramp_is_safe() {
        let mut engine = playing_engine();
        engine.set_pause_threshold(8.0);
        engine.set_speed_for_max_volume(8.0);

        assert_eq!(
            commands(&engine.on_speed_sample(8.0)),
            vec![PlaybackCommand::SetVolume(30)]
        );
        assert_eq!(
            commands(&engine.on_speed_sample(9.0)),
            vec![PlaybackCommand::SetVolume(100)]
        );
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut engine = playing_engine();
        engine.on_speed_sample(0.0);
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.current_speed(), 0.0);
        assert!(!snapshot.is_music_playing());
        assert!(snapshot.was_paused_by_engine());
        assert_eq!(snapshot.last_volume_percent, Some(30));
        assert_eq!(snapshot.status(), Status::ActiveDynamic);
    }
}
