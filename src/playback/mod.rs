pub mod broadcast;
pub mod device;
pub mod local;
pub mod log;
pub mod worker;

use async_trait::async_trait;

use crate::control::error::SinkError;

/// Where the engine's commands end up. Implementations apply them to every
/// playback session they know about.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    async fn set_volume(&self, percent: u8) -> Result<(), SinkError>;
    async fn pause(&self) -> Result<(), SinkError>;
    async fn resume(&self) -> Result<(), SinkError>;

    /// Read once at startup to seed the default volume.
    async fn current_volume(&self) -> Result<u8, SinkError>;
    /// Only consulted when startup is asked to trust the sink's transport.
    async fn is_playing(&self) -> Result<bool, SinkError>;
}

/// Transport controls of a single player.
pub trait MediaSession: Send + Sync {
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
    fn is_playing(&self) -> bool;
    fn pause(&self) -> Result<(), SinkError>;
    fn play(&self) -> Result<(), SinkError>;
}

/// An output volume with a fixed number of discrete steps.
pub trait VolumeStream: Send + Sync {
    fn max_level(&self) -> u32;
    fn level(&self) -> u32;
    fn set_level(&self, level: u32) -> Result<(), SinkError>;
}

pub fn percent_to_level(percent: u8, max_level: u32) -> u32 {
    let level = u64::from(max_level) * u64::from(percent.min(100)) / 100;
    level as u32
}

/// Falls back to 50% when the stream reports no steps at all.
pub fn level_to_percent(level: u32, max_level: u32) -> u8 {
    if max_level == 0 {
        return 50;
    }
    (u64::from(level.min(max_level)) * 100 / u64::from(max_level)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_maps_onto_steps() {
        assert_eq!(percent_to_level(0, 15), 0);
        assert_eq!(percent_to_level(30, 15), 4);
        assert_eq!(percent_to_level(65, 15), 9);
        assert_eq!(percent_to_level(100, 15), 15);
        assert_eq!(percent_to_level(100, 0), 0);
    }

    #[test]
    fn steps_map_back_to_percent() {
        assert_eq!(level_to_percent(15, 15), 100);
        assert_eq!(level_to_percent(7, 15), 46);
        assert_eq!(level_to_percent(20, 15), 100);
        assert_eq!(level_to_percent(3, 0), 50);
    }

    #[test]
    fn huge_step_counts_do_not_overflow() {
        assert_eq!(level_to_percent(u32::MAX, u32::MAX), 100);
        assert_eq!(level_to_percent(50_000_000, 50_000_000), 100);
        assert_eq!(percent_to_level(65, 50_000_000), 32_500_000);
        assert_eq!(percent_to_level(100, u32::MAX), u32::MAX);
        assert_eq!(percent_to_level(250, 10), 10);
    }
}
