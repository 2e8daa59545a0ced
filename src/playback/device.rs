use rodio::{
    Device, DeviceTrait, OutputStream, OutputStreamBuilder, Sink,
    cpal::{
        BufferSize, SampleFormat, SampleRate, StreamConfig, default_host,
        traits::HostTrait,
    },
};

use crate::control::error::SinkError;

const FALLBACK_SAMPLE_RATE: u32 = 48000;
const BUFFER_FRAMES: u32 = 4096;

pub fn setup_device_config() -> Result<(Device, StreamConfig, SampleFormat), SinkError> {
    let host = default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| SinkError::DeviceError("no default output device".to_string()))?;

    let best = device
        .supported_output_configs()
        .ok()
        .and_then(|configs| configs.max_by_key(|cfg| cfg.max_sample_rate().0));

    let (config, sample_format) = match best {
        Some(cfg) => (
            StreamConfig {
                channels: cfg.channels(),
                sample_rate: cfg.max_sample_rate(),
                buffer_size: BufferSize::Fixed(BUFFER_FRAMES),
            },
            cfg.sample_format(),
        ),
        None => (
            StreamConfig {
                channels: 2,
                sample_rate: SampleRate(FALLBACK_SAMPLE_RATE),
                buffer_size: BufferSize::Fixed(BUFFER_FRAMES),
            },
            SampleFormat::F32,
        ),
    };

    Ok((device, config, sample_format))
}

pub fn construct_sink(
    device: Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
) -> Result<(OutputStream, Sink), SinkError> {
    let stream = OutputStreamBuilder::default()
        .with_buffer_size(config.buffer_size)
        .with_sample_rate(config.sample_rate.0)
        .with_device(device)
        .with_sample_format(sample_format)
        .open_stream_or_fallback()
        .map_err(|e| SinkError::DeviceError(e.to_string()))?;
    let sink = Sink::connect_new(stream.mixer());

    Ok((stream, sink))
}
