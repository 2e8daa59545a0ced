use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::{control::error::SinkError, playback::PlaybackSink};

/// Dry-run sink: remembers what it was told and logs it.
#[derive(Debug)]
pub struct LogSink {
    volume: AtomicU8,
    playing: AtomicBool,
}

impl LogSink {
    pub fn new(volume: u8, playing: bool) -> Self {
        Self {
            volume: AtomicU8::new(volume.min(100)),
            playing: AtomicBool::new(playing),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(70, true)
    }
}

#[async_trait]
impl PlaybackSink for LogSink {
    async fn set_volume(&self, percent: u8) -> Result<(), SinkError> {
        let percent = percent.min(100);
        let previous = self.volume.swap(percent, Ordering::Relaxed);
        if previous != percent {
            info!("volume {previous}% -> {percent}%");
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), SinkError> {
        self.playing.store(false, Ordering::Relaxed);
        info!("pause");
        Ok(())
    }

    async fn resume(&self) -> Result<(), SinkError> {
        self.playing.store(true, Ordering::Relaxed);
        info!("resume");
        Ok(())
    }

    async fn current_volume(&self) -> Result<u8, SinkError> {
        Ok(self.volume.load(Ordering::Relaxed))
    }

    async fn is_playing(&self) -> Result<bool, SinkError> {
        Ok(self.playing.load(Ordering::Relaxed))
    }
}
