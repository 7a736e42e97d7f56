//! Source of the placeholder `velocity_score`.
//!
//! Escalation velocity is not modelled yet; the score is a random draw in
//! `[0, 1)`. It goes through this trait so tests and replays can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const MAX_BELOW_ONE: f64 = 1.0 - f64::EPSILON;

pub trait VelocitySource: Send + Sync {
    /// A value in `[0, 1)`.
    fn sample(&self) -> f64;
}

/// Thread-local OS-seeded RNG. Used by the server.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngVelocity;

impl VelocitySource for ThreadRngVelocity {
    fn sample(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug)]
pub struct SeededVelocity {
    rng: Mutex<StdRng>,
}

impl SeededVelocity {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl VelocitySource for SeededVelocity {
    fn sample(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.random::<f64>()
    }
}

/// Always the same value (clamped into `[0, 1)`).
#[derive(Debug, Clone, Copy)]
pub struct FixedVelocity(pub f64);

impl VelocitySource for FixedVelocity {
    fn sample(&self) -> f64 {
        self.0.clamp(0.0, MAX_BELOW_ONE)
    }
}
