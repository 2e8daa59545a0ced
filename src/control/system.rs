use std::sync::Arc;

use flume::Sender;
use tracing::{info, warn};

use crate::{
    control::{
        config::ControlConfig,
        controller::{ControlLoop, EngineHandle},
        engine::Engine,
    },
    event::events::Event,
    playback::{PlaybackSink, worker::run_sink_worker},
    sensor::{SpeedSource, pump},
    util::task::TaskSet,
};

/// Composition root of the control loop: the controller task, the sink
/// worker and any attached speed source.
pub struct ControlSystem {
    handle: EngineHandle,
    event_tx: Sender<Event>,
    tasks: TaskSet,
}

impl ControlSystem {
    /// Reads the sink once to seed the default volume. The engine starts
    /// believing nothing is playing.
    pub async fn start(
        config: ControlConfig,
        sink: Arc<dyn PlaybackSink>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self::launch(config, sink, event_tx, false).await
    }

    /// Like [`ControlSystem::start`], but also seeds the playing belief from
    /// the sink. It is still never reconciled afterwards.
    pub async fn start_with_playback_state(
        config: ControlConfig,
        sink: Arc<dyn PlaybackSink>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self::launch(config, sink, event_tx, true).await
    }

    async fn launch(
        mut config: ControlConfig,
        sink: Arc<dyn PlaybackSink>,
        event_tx: Sender<Event>,
        read_playing: bool,
    ) -> Self {
        match sink.current_volume().await {
            Ok(volume) => config.default_volume_percent = volume,
            Err(e) => warn!(error = %e, "could not read device volume, keeping default"),
        }
        let playing = if read_playing {
            sink.is_playing().await.unwrap_or_else(|e| {
                warn!(error = %e, "could not read playback state");
                false
            })
        } else {
            false
        };
        info!(
            default_volume = config.default_volume_percent,
            playing, "starting control loop"
        );

        let engine = Engine::new(config).with_music_playing(playing);
        let (sink_tx, sink_rx) = flume::unbounded();
        let (control, handle) = ControlLoop::new(engine, sink_tx, event_tx.clone());

        let mut tasks = TaskSet::new();
        tasks.spawn("control", control.run());
        tasks.spawn("sink", run_sink_worker(sink, sink_rx, event_tx.clone()));

        Self {
            handle,
            event_tx,
            tasks,
        }
    }

    /// Starts feeding `source` into the engine, replacing any previous one.
    pub fn attach_source(&mut self, mut source: Box<dyn SpeedSource>) {
        let handle = self.handle.clone();
        let event_tx = self.event_tx.clone();
        self.tasks.spawn("source", async move {
            if let Err(e) = pump(source.as_mut(), &handle, &event_tx).await {
                warn!(error = %e, "speed source stopped");
            }
        });
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    pub fn is_source_running(&self) -> bool {
        self.tasks.is_running("source")
    }

    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }
}
