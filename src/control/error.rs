use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Control engine has stopped")]
    EngineStopped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Audio output device error: {0}")]
    DeviceError(String),

    #[error("Media session error: {0}")]
    SessionError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}
