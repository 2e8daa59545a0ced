use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior};

use crate::sensor::{MPS_TO_KMH, SensorState, SpeedSource};

/// Reports the same speed at a fixed cadence. Stands in for a sensor when
/// none is attached.
pub struct ConstantSource {
    speed_mps: f64,
    interval: Interval,
    remaining: Option<usize>,
}

impl ConstantSource {
    pub fn new(speed_kmh: f64, period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            speed_mps: speed_kmh / MPS_TO_KMH,
            interval,
            remaining: None,
        }
    }

    pub fn take(mut self, samples: usize) -> Self {
        self.remaining = Some(samples);
        self
    }
}

#[async_trait]
impl SpeedSource for ConstantSource {
    async fn next_state(&mut self) -> Option<SensorState> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        self.interval.tick().await;
        Some(SensorState::Streaming(Some(self.speed_mps)))
    }
}
