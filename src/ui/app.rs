use std::sync::Arc;

use color_eyre::eyre::Result;
use flume::Receiver;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, SinkKind, SourceKind},
    control::{controller::EngineHandle, error::ControlError, system::ControlSystem},
    event::events::Event,
    playback::{PlaybackSink, broadcast::BroadcastSink, local::LocalPlayer, log::LogSink},
    sensor::{SensorStatus, SpeedSource, constant::ConstantSource, simulated::SimulatedRide},
    ui::{
        input::InputHandler,
        message::AppMessage,
        tui::{TerminalEvent, Tui},
    },
};

/// What the dashboard shows besides the engine snapshot.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub speed_kmh: f64,
    pub sensor: Option<SensorStatus>,
    pub source_ended: bool,
    pub last_error: Option<String>,
}

pub struct App {
    pub system: ControlSystem,
    pub handle: EngineHandle,
    pub event_rx: Receiver<Event>,
    pub view: ViewState,
    pub headless: bool,
    pub should_quit: bool,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let sink = build_sink(&config);
        let control = config.control.clone();
        let mut system = if config.read_playback_state {
            ControlSystem::start_with_playback_state(control, sink, event_tx).await
        } else {
            ControlSystem::start(control, sink, event_tx).await
        };
        system.attach_source(build_source(&config));
        let handle = system.handle();

        Ok(Self {
            system,
            handle,
            event_rx,
            view: ViewState::default(),
            headless: config.headless,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let result = if self.headless {
            self.run_headless().await
        } else {
            self.run_dashboard().await
        };
        self.system.shutdown();
        result
    }

    async fn run_dashboard(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let event_rx = self.event_rx.clone();
        while !self.should_quit {
            tui.draw(|f| f.render_widget(&*self, f.area()))?;

            tokio::select! {
                Some(evt) = tui.next_event() => self.handle_terminal_event(evt)?,
                Ok(evt) = event_rx.recv_async() => self.on_event(evt),
                else => break,
            }
            while let Ok(evt) = event_rx.try_recv() {
                self.on_event(evt);
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn run_headless(&mut self) -> Result<()> {
        info!("running headless, press Ctrl-C to stop");
        let event_rx = self.event_rx.clone();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                evt = event_rx.recv_async() => match evt {
                    Ok(evt) => self.on_event(evt),
                    Err(_) => break,
                },
            }
        }
        Ok(())
    }

    fn handle_terminal_event(&mut self, evt: TerminalEvent) -> Result<()> {
        if let TerminalEvent::Key(key) = evt {
            if let Some(msg) = InputHandler::handle_key(key) {
                self.update(msg)?;
            }
        }
        Ok(())
    }

    pub fn on_event(&mut self, evt: Event) {
        match evt {
            Event::SpeedChanged(kmh) => self.view.speed_kmh = kmh,
            Event::StatusChanged => {
                if self.headless {
                    let snapshot = self.handle.snapshot();
                    info!(
                        status = %snapshot.status(),
                        speed = format_args!("{:.1} km/h", snapshot.current_speed()),
                        volume = ?snapshot.last_volume_percent,
                        "status"
                    );
                }
            }
            Event::SensorChanged(status) => {
                self.view.sensor = Some(status);
                self.view.source_ended = false;
            }
            Event::SourceEnded => self.view.source_ended = true,
            Event::SinkFailed(e) => self.view.last_error = Some(e),
        }
    }

    /// Turns a key-level request into an engine setter, relative to the
    /// latest snapshot.
    pub fn update(&mut self, msg: AppMessage) -> Result<(), ControlError> {
        let snapshot = self.handle.snapshot();
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::ToggleEnabled => self.handle.set_enabled(!snapshot.is_enabled())?,
            AppMessage::ToggleDynamicMode => {
                self.handle.set_dynamic_mode(!snapshot.is_dynamic_mode())?
            }
            AppMessage::PauseThreshold(delta) => self
                .handle
                .set_pause_threshold(snapshot.pause_threshold() + delta)?,
            AppMessage::SpeedForMaxVolume(delta) => self
                .handle
                .set_speed_for_max_volume(snapshot.speed_for_max_volume() + delta)?,
            AppMessage::DefaultVolume(delta) => self
                .handle
                .set_default_volume(i32::from(snapshot.default_volume()) + delta)?,
            AppMessage::MinVolume(delta) => self.handle.set_volume_range(
                i32::from(snapshot.min_volume()) + delta,
                i32::from(snapshot.max_volume()),
            )?,
            AppMessage::MaxVolume(delta) => self.handle.set_volume_range(
                i32::from(snapshot.min_volume()),
                i32::from(snapshot.max_volume()) + delta,
            )?,
        }
        Ok(())
    }
}

fn build_sink(config: &AppConfig) -> Arc<dyn PlaybackSink> {
    match config.sink {
        SinkKind::Log => Arc::new(LogSink::default()),
        SinkKind::Local => match LocalPlayer::open(config.track.as_deref(), config.volume_steps) {
            Ok(player) => {
                let player = Arc::new(player);
                let sink = BroadcastSink::new(player.clone());
                sink.register(player);
                Arc::new(sink)
            }
            Err(e) => {
                warn!(error = %e, "local playback unavailable, falling back to log sink");
                Arc::new(LogSink::default())
            }
        },
    }
}

fn build_source(config: &AppConfig) -> Box<dyn SpeedSource> {
    match config.source {
        SourceKind::Constant => Box::new(ConstantSource::new(
            config.constant_kmh,
            config.sample_interval,
        )),
        SourceKind::Simulated => {
            let seed = config.seed.unwrap_or_else(rand::random);
            info!(seed, "simulating ride");
            Box::new(SimulatedRide::new(seed, config.sample_interval))
        }
    }
}
