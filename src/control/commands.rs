#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    SetVolume(u8),
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    SpeedChanged(f64),
    StatusChanged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Command(PlaybackCommand),
    Notify(Notification),
}

impl Effect {
    pub fn as_command(&self) -> Option<PlaybackCommand> {
        match self {
            Effect::Command(cmd) => Some(*cmd),
            Effect::Notify(_) => None,
        }
    }
}
