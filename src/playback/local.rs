use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use rodio::{Decoder, OutputStream, Sink, Source, source::SineWave};
use tracing::info;

use crate::{
    control::error::SinkError,
    playback::{
        MediaSession, VolumeStream,
        device::{construct_sink, setup_device_config},
    },
};

pub const DEFAULT_VOLUME_STEPS: u32 = 15;
pub const MAX_VOLUME_STEPS: u32 = 1000;
const TONE_HZ: f32 = 440.0;
const TONE_GAIN: f32 = 0.05;

/// A player on the local output device. It loops the given track, or a
/// quiet tone when there is none, and exposes both transport and volume.
pub struct LocalPlayer {
    _stream: OutputStream,
    sink: Arc<Sink>,
    steps: u32,
}

impl LocalPlayer {
    pub fn open(track: Option<&Path>, steps: u32) -> Result<Self, SinkError> {
        let (device, stream_config, sample_format) = setup_device_config()?;
        let (stream, sink) = construct_sink(device, &stream_config, sample_format)?;

        match track {
            Some(path) => {
                let file = File::open(path).map_err(|e| {
                    SinkError::DecodingError(format!("{}: {e}", path.display()))
                })?;
                let decoder = Decoder::builder()
                    .with_data(BufReader::new(file))
                    .with_gapless(true)
                    .build()
                    .map_err(|e| SinkError::DecodingError(e.to_string()))?;
                info!(track = %path.display(), "looping local track");
                sink.append(decoder.repeat_infinite());
            }
            None => {
                info!("no track configured, playing test tone");
                sink.append(SineWave::new(TONE_HZ).amplify(TONE_GAIN));
            }
        }

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            steps: steps.clamp(1, MAX_VOLUME_STEPS),
        })
    }
}

impl MediaSession for LocalPlayer {
    fn name(&self) -> &str {
        "local"
    }

    fn is_active(&self) -> bool {
        !self.sink.empty()
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty() && !self.sink.is_paused()
    }

    fn pause(&self) -> Result<(), SinkError> {
        self.sink.pause();
        Ok(())
    }

    fn play(&self) -> Result<(), SinkError> {
        self.sink.play();
        Ok(())
    }
}

impl VolumeStream for LocalPlayer {
    fn max_level(&self) -> u32 {
        self.steps
    }

    fn level(&self) -> u32 {
        (self.sink.volume() * self.steps as f32).round() as u32
    }

    fn set_level(&self, level: u32) -> Result<(), SinkError> {
        let level = level.min(self.steps);
        self.sink.set_volume(level as f32 / self.steps as f32);
        Ok(())
    }
}
