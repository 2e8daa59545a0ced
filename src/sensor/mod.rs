pub mod constant;
pub mod simulated;

use async_trait::async_trait;
use flume::Sender;
use tracing::{debug, info, warn};

use crate::{
    control::{controller::EngineHandle, error::ControlError},
    event::events::Event,
};

pub const MPS_TO_KMH: f64 = 3.6;

/// One update from a speed sensor. Streaming values are in metres per
/// second; a data point without a value counts as standing still.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorState {
    Idle,
    Searching,
    NotAvailable,
    Streaming(Option<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Idle,
    Searching,
    NotAvailable,
    Streaming,
}

impl SensorState {
    pub fn status(&self) -> SensorStatus {
        match self {
            SensorState::Idle => SensorStatus::Idle,
            SensorState::Searching => SensorStatus::Searching,
            SensorState::NotAvailable => SensorStatus::NotAvailable,
            SensorState::Streaming(_) => SensorStatus::Streaming,
        }
    }
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SensorStatus::Idle => "idle",
            SensorStatus::Searching => "searching",
            SensorStatus::NotAvailable => "not available",
            SensorStatus::Streaming => "streaming",
        };
        f.write_str(label)
    }
}

#[async_trait]
pub trait SpeedSource: Send {
    /// `None` once the source has nothing more to report.
    async fn next_state(&mut self) -> Option<SensorState>;
}

pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * MPS_TO_KMH
}

/// Readings the engine can take: negative speeds become zero, NaN and
/// infinities are rejected.
pub fn sanitize_kmh(kmh: f64) -> Option<f64> {
    kmh.is_finite().then(|| kmh.max(0.0))
}

/// Feeds a source into the engine until either side goes away.
pub async fn pump<S>(
    source: &mut S,
    handle: &EngineHandle,
    event_tx: &Sender<Event>,
) -> Result<(), ControlError>
where
    S: SpeedSource + ?Sized,
{
    let mut last_status = None;

    while let Some(state) = source.next_state().await {
        let status = state.status();
        if last_status != Some(status) {
            info!(%status, "speed sensor state changed");
            let _ = event_tx.send(Event::SensorChanged(status));
            last_status = Some(status);
        }

        match state {
            SensorState::Streaming(mps) => {
                let raw = mps_to_kmh(mps.unwrap_or(0.0));
                match sanitize_kmh(raw) {
                    Some(kmh) => handle.push_speed(kmh)?,
                    None => warn!(raw, "dropping invalid speed reading"),
                }
            }
            other => debug!(?other, "no speed reading"),
        }
    }

    info!("speed source ended");
    let _ = event_tx.send(Event::SourceEnded);
    Ok(())
}
