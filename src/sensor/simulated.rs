use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::time::{Interval, MissedTickBehavior};

use crate::sensor::{MPS_TO_KMH, SensorState, SpeedSource};

const SEARCH_TICKS: u32 = 3;
const CRUISE_KMH: std::ops::Range<f64> = 16.0..34.0;
const CRUISE_TICKS: std::ops::Range<u32> = 20..60;
const STOP_TICKS: std::ops::Range<u32> = 5..15;
const JITTER_KMH: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    Searching(u32),
    Accelerating { target: f64 },
    Cruising { target: f64, remaining: u32 },
    Braking,
    Stopped(u32),
}

/// A looping ride: find the sensor, pull away, cruise, stop at a light,
/// wait, repeat. The same seed always produces the same ride.
pub struct SimulatedRide {
    rng: StdRng,
    leg: Leg,
    speed_kmh: f64,
    interval: Interval,
}

impl SimulatedRide {
    pub fn new(seed: u64, period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            rng: StdRng::seed_from_u64(seed),
            leg: Leg::Searching(SEARCH_TICKS),
            speed_kmh: 0.0,
            interval,
        }
    }

    fn step(&mut self) -> SensorState {
        match self.leg {
            Leg::Searching(0) => {
                self.leg = Leg::Accelerating {
                    target: self.rng.random_range(CRUISE_KMH),
                };
                self.step()
            }
            Leg::Searching(n) => {
                self.leg = Leg::Searching(n - 1);
                SensorState::Searching
            }
            Leg::Accelerating { target } => {
                self.speed_kmh += self.rng.random_range(1.5..3.5);
                if self.speed_kmh >= target {
                    self.speed_kmh = target;
                    self.leg = Leg::Cruising {
                        target,
                        remaining: self.rng.random_range(CRUISE_TICKS),
                    };
                }
                self.streaming()
            }
            Leg::Cruising { target, remaining } => {
                let jitter = self.rng.random_range(-JITTER_KMH..JITTER_KMH);
                self.speed_kmh = (target + jitter).max(0.0);
                self.leg = match remaining {
                    0 => Leg::Braking,
                    n => Leg::Cruising {
                        target,
                        remaining: n - 1,
                    },
                };
                self.streaming()
            }
            Leg::Braking => {
                self.speed_kmh -= self.rng.random_range(3.0..6.0);
                if self.speed_kmh <= 0.0 {
                    self.speed_kmh = 0.0;
                    self.leg = Leg::Stopped(self.rng.random_range(STOP_TICKS));
                }
                self.streaming()
            }
            Leg::Stopped(0) => {
                self.leg = Leg::Accelerating {
                    target: self.rng.random_range(CRUISE_KMH),
                };
                self.step()
            }
            Leg::Stopped(n) => {
                self.leg = Leg::Stopped(n - 1);
                self.streaming()
            }
        }
    }

    fn streaming(&self) -> SensorState {
        SensorState::Streaming(Some(self.speed_kmh / MPS_TO_KMH))
    }
}

#[async_trait]
impl SpeedSource for SimulatedRide {
    async fn next_state(&mut self) -> Option<SensorState> {
        self.interval.tick().await;
        Some(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::mps_to_kmh;

    fn ride(seed: u64, ticks: usize) -> Vec<SensorState> {
        let mut ride = SimulatedRide::new(seed, Duration::from_secs(1));
        (0..ticks).map(|_| ride.step()).collect()
    }

    fn speeds(states: &[SensorState]) -> Vec<f64> {
        states
            .iter()
            .filter_map(|s| match s {
                SensorState::Streaming(Some(mps)) => Some(mps_to_kmh(*mps)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn starts_by_searching() {
        let states = ride(7, 4);
        assert_eq!(&states[..3], &[SensorState::Searching; 3]);
        assert!(matches!(states[3], SensorState::Streaming(Some(_))));
    }

    #[tokio::test]
    async fn same_seed_same_ride() {
        assert_eq!(ride(42, 200), ride(42, 200));
    }

    #[tokio::test]
    async fn never_reports_negative_speed() {
        let speeds = speeds(&ride(3, 1_000));
        assert!(speeds.iter().all(|kmh| *kmh >= 0.0));
        assert!(speeds.iter().all(|kmh| *kmh < CRUISE_KMH.end + JITTER_KMH));
    }

    #[tokio::test]
    async fn ride_includes_stops_and_riding() {
        let speeds = speeds(&ride(11, 1_000));
        assert!(speeds.iter().any(|kmh| *kmh == 0.0));
        assert!(speeds.iter().any(|kmh| *kmh > CRUISE_KMH.start - JITTER_KMH));
    }
}
