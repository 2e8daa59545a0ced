use flume::{Receiver, Sender};
use tokio::sync::{oneshot, watch};
use tracing::{debug, warn};

use crate::{
    control::{
        commands::{Effect, Notification, PlaybackCommand},
        engine::Engine,
        error::ControlError,
        state::EngineSnapshot,
    },
    event::events::Event,
};

#[derive(Debug)]
pub enum ControlMessage {
    Speed(f64),
    SetEnabled(bool),
    SetDynamicMode(bool),
    SetPauseThreshold(f64),
    SetSpeedForMaxVolume(f64),
    SetDefaultVolume(i32),
    SetVolumeRange { min: i32, max: i32 },
    Flush(oneshot::Sender<()>),
}

/// What the controller hands to the sink worker.
#[derive(Debug)]
pub enum SinkMessage {
    Apply(PlaybackCommand),
    Flush(oneshot::Sender<()>),
}

/// Cloneable entry point into the control loop. Every mutation is queued
/// and applied by the single controller task in the order it was sent.
#[derive(Clone)]
pub struct EngineHandle {
    tx: Sender<ControlMessage>,
    snapshot: watch::Receiver<EngineSnapshot>,
}

impl EngineHandle {
    fn send(&self, msg: ControlMessage) -> Result<(), ControlError> {
        self.tx.send(msg).map_err(|_| ControlError::EngineStopped)
    }

    pub fn push_speed(&self, speed_kmh: f64) -> Result<(), ControlError> {
        self.send(ControlMessage::Speed(speed_kmh))
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), ControlError> {
        self.send(ControlMessage::SetEnabled(enabled))
    }

    pub fn set_dynamic_mode(&self, dynamic: bool) -> Result<(), ControlError> {
        self.send(ControlMessage::SetDynamicMode(dynamic))
    }

    pub fn set_pause_threshold(&self, kmh: f64) -> Result<(), ControlError> {
        self.send(ControlMessage::SetPauseThreshold(kmh))
    }

    pub fn set_speed_for_max_volume(&self, kmh: f64) -> Result<(), ControlError> {
        self.send(ControlMessage::SetSpeedForMaxVolume(kmh))
    }

    pub fn set_default_volume(&self, percent: i32) -> Result<(), ControlError> {
        self.send(ControlMessage::SetDefaultVolume(percent))
    }

    pub fn set_volume_range(&self, min: i32, max: i32) -> Result<(), ControlError> {
        self.send(ControlMessage::SetVolumeRange { min, max })
    }

    /// Resolves once everything sent before it has been applied, including
    /// the playback commands it produced.
    pub async fn flush(&self) -> Result<(), ControlError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControlMessage::Flush(reply_tx))?;
        reply_rx.await.map_err(|_| ControlError::EngineStopped)
    }

    /// Latest published state. Never blocks and never mutates.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.borrow().clone()
    }

    pub async fn changed(&mut self) -> Result<EngineSnapshot, ControlError> {
        self.snapshot
            .changed()
            .await
            .map_err(|_| ControlError::EngineStopped)?;
        Ok(self.snapshot.borrow_and_update().clone())
    }
}

pub struct ControlLoop {
    engine: Engine,
    rx: Receiver<ControlMessage>,
    sink_tx: Sender<SinkMessage>,
    event_tx: Sender<Event>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
}

impl ControlLoop {
    pub fn new(
        engine: Engine,
        sink_tx: Sender<SinkMessage>,
        event_tx: Sender<Event>,
    ) -> (Self, EngineHandle) {
        let (tx, rx) = flume::unbounded();
        let (snapshot_tx, snapshot) = watch::channel(engine.snapshot());

        let control = Self {
            engine,
            rx,
            sink_tx,
            event_tx,
            snapshot_tx,
        };

        (control, EngineHandle { tx, snapshot })
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        while let Ok(msg) = self.rx.recv_async().await {
            self.handle_message(msg);
        }
        debug!("control loop finished");
    }

    fn handle_message(&mut self, msg: ControlMessage) {
        let effects = match msg {
            ControlMessage::Speed(kmh) => self.engine.on_speed_sample(kmh),
            ControlMessage::SetEnabled(enabled) => self.engine.set_enabled(enabled),
            ControlMessage::SetDynamicMode(dynamic) => self.engine.set_dynamic_mode(dynamic),
            ControlMessage::SetPauseThreshold(kmh) => self.engine.set_pause_threshold(kmh),
            ControlMessage::SetSpeedForMaxVolume(kmh) => {
                self.engine.set_speed_for_max_volume(kmh)
            }
            ControlMessage::SetDefaultVolume(percent) => self.engine.set_default_volume(percent),
            ControlMessage::SetVolumeRange { min, max } => {
                self.engine.set_volume_range(min, max)
            }
            ControlMessage::Flush(reply) => {
                if let Err(flume::SendError(SinkMessage::Flush(reply))) =
                    self.sink_tx.send(SinkMessage::Flush(reply))
                {
                    let _ = reply.send(());
                }
                return;
            }
        };

        self.snapshot_tx.send_replace(self.engine.snapshot());
        self.dispatch(effects);
    }

    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Command(cmd) => {
                    if self.sink_tx.send(SinkMessage::Apply(cmd)).is_err() {
                        warn!(?cmd, "playback sink is gone, dropping command");
                    }
                }
                Effect::Notify(Notification::SpeedChanged(kmh)) => {
                    let _ = self.event_tx.send(Event::SpeedChanged(kmh));
                }
                Effect::Notify(Notification::StatusChanged) => {
                    let _ = self.event_tx.send(Event::StatusChanged);
                }
            }
        }
    }
}
