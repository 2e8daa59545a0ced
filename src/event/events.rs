use crate::sensor::SensorStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Engine notifications
    SpeedChanged(f64),
    StatusChanged,

    // Sensor
    SensorChanged(SensorStatus),
    SourceEnded,

    // Playback sink
    SinkFailed(String),
}
