use std::sync::Arc;

use flume::{Receiver, Sender};
use tracing::{debug, warn};

use crate::{
    control::{commands::PlaybackCommand, controller::SinkMessage, error::SinkError},
    event::events::Event,
    playback::PlaybackSink,
};

pub async fn apply(sink: &dyn PlaybackSink, cmd: PlaybackCommand) -> Result<(), SinkError> {
    match cmd {
        PlaybackCommand::SetVolume(percent) => sink.set_volume(percent).await,
        PlaybackCommand::Pause => sink.pause().await,
        PlaybackCommand::Resume => sink.resume().await,
    }
}

/// Applies commands one at a time, in order. Each is tried once; failures
/// are logged and reported, never retried.
pub async fn run_sink_worker(
    sink: Arc<dyn PlaybackSink>,
    rx: Receiver<SinkMessage>,
    event_tx: Sender<Event>,
) {
    while let Ok(msg) = rx.recv_async().await {
        match msg {
            SinkMessage::Apply(cmd) => {
                if let Err(e) = apply(sink.as_ref(), cmd).await {
                    warn!(?cmd, error = %e, "playback command failed");
                    let _ = event_tx.send(Event::SinkFailed(e.to_string()));
                }
            }
            SinkMessage::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
    debug!("sink worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct FailingSink {
        calls: Mutex<Vec<PlaybackCommand>>,
    }

    #[async_trait]
    impl PlaybackSink for FailingSink {
        async fn set_volume(&self, percent: u8) -> Result<(), SinkError> {
            self.calls.lock().unwrap().push(PlaybackCommand::SetVolume(percent));
            Ok(())
        }

        async fn pause(&self) -> Result<(), SinkError> {
            self.calls.lock().unwrap().push(PlaybackCommand::Pause);
            Err(SinkError::SessionError("gone".to_string()))
        }

        async fn resume(&self) -> Result<(), SinkError> {
            self.calls.lock().unwrap().push(PlaybackCommand::Resume);
            Ok(())
        }

        async fn current_volume(&self) -> Result<u8, SinkError> {
            Ok(0)
        }

        async fn is_playing(&self) -> Result<bool, SinkError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn applies_in_order_and_reports_failures_once() {
        let sink = Arc::new(FailingSink::default());
        let (tx, rx) = flume::unbounded();
        let (event_tx, event_rx) = flume::unbounded();
        let worker = tokio::spawn(run_sink_worker(sink.clone(), rx, event_tx));

        tx.send(SinkMessage::Apply(PlaybackCommand::Pause)).unwrap();
        tx.send(SinkMessage::Apply(PlaybackCommand::SetVolume(30))).unwrap();
        tx.send(SinkMessage::Apply(PlaybackCommand::Resume)).unwrap();
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(SinkMessage::Flush(reply_tx)).unwrap();
        reply_rx.await.unwrap();

        assert_eq!(
            *sink.calls.lock().unwrap(),
            vec![
                PlaybackCommand::Pause,
                PlaybackCommand::SetVolume(30),
                PlaybackCommand::Resume,
            ]
        );
        let events: Vec<Event> = event_rx.drain().collect();
        assert_eq!(events, vec![Event::SinkFailed("Media session error: gone".to_string())]);

        drop(tx);
        worker.await.unwrap();
    }
}
