use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    control::error::SinkError,
    playback::{
        MediaSession, PlaybackSink, VolumeStream, level_to_percent, percent_to_level,
    },
};

/// Sends transport commands to every active session and volume changes to
/// a shared stepped output.
pub struct BroadcastSink {
    volume: Arc<dyn VolumeStream>,
    sessions: RwLock<Vec<Arc<dyn MediaSession>>>,
}

impl BroadcastSink {
    pub fn new(volume: Arc<dyn VolumeStream>) -> Self {
        Self {
            volume,
            sessions: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, session: Arc<dyn MediaSession>) {
        debug!(name = session.name(), "media session registered");
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.push(session);
        }
    }

    pub fn unregister(&self, name: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|s| s.name() != name);
        }
    }

    pub fn active_sessions(&self) -> Vec<Arc<dyn MediaSession>> {
        self.sessions
            .read()
            .map(|sessions| sessions.iter().filter(|s| s.is_active()).cloned().collect())
            .unwrap_or_default()
    }

    fn for_each_active<F>(&self, action: &str, apply: F) -> Result<(), SinkError>
    where
        F: Fn(&dyn MediaSession) -> Result<(), SinkError>,
    {
        let mut first_error = None;
        for session in self.active_sessions() {
            if let Err(e) = apply(session.as_ref()) {
                warn!(name = session.name(), error = %e, "failed to {action} session");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl PlaybackSink for BroadcastSink {
    async fn set_volume(&self, percent: u8) -> Result<(), SinkError> {
        let max = self.volume.max_level();
        let level = percent_to_level(percent, max);
        self.volume.set_level(level)?;
        debug!("volume set to {percent}% (level {level}/{max})");
        Ok(())
    }

    async fn pause(&self) -> Result<(), SinkError> {
        self.for_each_active("pause", |s| s.pause())?;
        info!("music paused");
        Ok(())
    }

    async fn resume(&self) -> Result<(), SinkError> {
        self.for_each_active("resume", |s| s.play())?;
        info!("music resumed");
        Ok(())
    }

    async fn current_volume(&self) -> Result<u8, SinkError> {
        Ok(level_to_percent(self.volume.level(), self.volume.max_level()))
    }

    async fn is_playing(&self) -> Result<bool, SinkError> {
        Ok(self.active_sessions().iter().any(|s| s.is_playing()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct FakeStream {
        max: u32,
        level: AtomicU32,
    }

    impl VolumeStream for FakeStream {
        fn max_level(&self) -> u32 {
            self.max
        }

        fn level(&self) -> u32 {
            self.level.load(Ordering::Relaxed)
        }

        fn set_level(&self, level: u32) -> Result<(), SinkError> {
            self.level.store(level, Ordering::Relaxed);
            Ok(())
        }
    }

    struct FakeSession {
        name: String,
        active: bool,
        playing: AtomicBool,
        broken: bool,
    }

    impl FakeSession {
        fn new(name: &str, active: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                active,
                playing: AtomicBool::new(true),
                broken: false,
            })
        }
    }

    impl MediaSession for FakeSession {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::Relaxed)
        }

        fn pause(&self) -> Result<(), SinkError> {
            if self.broken {
                return Err(SinkError::SessionError(self.name.clone()));
            }
            self.playing.store(false, Ordering::Relaxed);
            Ok(())
        }

        fn play(&self) -> Result<(), SinkError> {
            self.playing.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    fn sink(level: u32) -> (BroadcastSink, Arc<FakeStream>) {
        let stream = Arc::new(FakeStream {
            max: 15,
            level: AtomicU32::new(level),
        });
        (BroadcastSink::new(stream.clone()), stream)
    }

    #[tokio::test]
    async fn pause_reaches_every_active_session() {
        let (sink, _) = sink(10);
        let a = FakeSession::new("a", true);
        let b = FakeSession::new("b", true);
        let idle = FakeSession::new("idle", false);
        sink.register(a.clone());
        sink.register(b.clone());
        sink.register(idle.clone());

        sink.pause().await.unwrap();
        assert!(!a.is_playing());
        assert!(!b.is_playing());
        assert!(idle.is_playing());
        assert!(!sink.is_playing().await.unwrap());

        sink.resume().await.unwrap();
        assert!(a.is_playing() && b.is_playing());
    }

    #[tokio::test]
    async fn failing_session_does_not_stop_the_others() {
        let (sink, _) = sink(10);
        let broken = Arc::new(FakeSession {
            name: "broken".to_string(),
            active: true,
            playing: AtomicBool::new(true),
            broken: true,
        });
        let ok = FakeSession::new("ok", true);
        sink.register(broken);
        sink.register(ok.clone());

        let result = sink.pause().await;
        assert_eq!(result, Err(SinkError::SessionError("broken".to_string())));
        assert!(!ok.is_playing());
    }

    #[tokio::test]
    async fn volume_is_quantized_to_steps() {
        let (sink, stream) = sink(0);
        sink.set_volume(65).await.unwrap();
        assert_eq!(stream.level(), 9);
        assert_eq!(sink.current_volume().await.unwrap(), 60);
    }

    #[tokio::test]
    async fn unregister_removes_session() {
        let (sink, _) = sink(0);
        sink.register(FakeSession::new("a", true));
        sink.unregister("a");
        assert!(sink.active_sessions().is_empty());
        assert!(!sink.is_playing().await.unwrap());
    }
}
