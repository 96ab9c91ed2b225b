//! Background drift of the simulated point's present value.

use crate::SharedPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::watch;

/// Source of the delta added to the present value each tick.
pub trait Perturbation: Send + 'static {
    fn next_delta(&mut self) -> f32;
}

/// Uniform delta in `[-range, range]`.
#[derive(Debug, Clone)]
pub struct UniformPerturbation {
    rng: StdRng,
    range: f32,
}

impl UniformPerturbation {
    pub fn new(range: f32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            range,
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(range: f32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range,
        }
    }
}

impl Perturbation for UniformPerturbation {
    fn next_delta(&mut self) -> f32 {
        if self.range.is_nan() || self.range <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.range..=self.range)
    }
}

/// Replays a fixed list of deltas, then yields zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPerturbation {
    deltas: VecDeque<f32>,
}

impl ScriptedPerturbation {
    pub fn new(deltas: impl IntoIterator<Item = f32>) -> Self {
        Self {
            deltas: deltas.into_iter().collect(),
        }
    }
}

impl Perturbation for ScriptedPerturbation {
    fn next_delta(&mut self) -> f32 {
        self.deltas.pop_front().unwrap_or(0.0)
    }
}

/// Sleeps one interval, then perturbs the point, until shut down.
pub struct ValueSimulator<P> {
    point: SharedPoint,
    source: P,
    interval: Duration,
}

impl<P: Perturbation> ValueSimulator<P> {
    pub fn new(point: SharedPoint, source: P, interval: Duration) -> Self {
        Self {
            point,
            source,
            interval,
        }
    }

    pub fn point(&self) -> &SharedPoint {
        &self.point
    }

    /// One step without sleeping. Returns the new present value.
    pub fn tick(&mut self) -> f32 {
        let delta = self.source.next_delta();
        let value = self.point.offset(delta);
        log::debug!("{} -> {value:.3} (delta {delta:+.3})", self.point.name());
        value
    }

    /// Runs until `shutdown` carries `true` or its sender is dropped. A
    /// pending sleep is abandoned on shutdown, so no tick lands after it.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(self.interval) => {
                    self.tick();
                }
            }
        }
    }
}
