//! Progress animation shown while a lesson plan is being generated.
//!
//! Purely cosmetic: the backend reports no progress, so the bar eases
//! towards [`MAX_PROGRESS`] and a rotating teaching tip fills the wait.

use std::time::{Duration, Instant};

use rand::Rng;

/// The bar never claims completion before the response arrives.
pub const MAX_PROGRESS: f64 = 0.95;

/// How long each tip stays on screen.
pub const FACT_INTERVAL: Duration = Duration::from_secs(4);

// Seconds for the bar to cover ~63% of its range.
const PROGRESS_TIME_CONSTANT: f64 = 20.0;

pub const FACTS: &[&str] = &[
    "Retrieval practice beats re-reading for long-term memory.",
    "Spacing review sessions over days improves retention.",
    "Clear learning objectives help students know what success looks like.",
    "Short formative checks reveal misconceptions before the final assessment.",
    "Pairing words with visuals strengthens understanding.",
    "Students remember more when they explain ideas in their own words.",
    "Hands-on activities turn abstract ideas into concrete experience.",
    "Connecting new topics to prior knowledge speeds up learning.",
];

const STAGES: &[(f64, &str)] = &[
    (0.0, "Searching for educational content"),
    (0.25, "Reading source material"),
    (0.5, "Drafting learning objectives"),
    (0.75, "Assembling exercises and assessment"),
];

/// Animation state for one submission.
#[derive(Debug, Clone)]
pub struct LoadingTicker {
    started: Instant,
    fact_offset: usize,
}

impl LoadingTicker {
    /// Start a ticker at a random tip.
    pub fn start(now: Instant) -> Self {
        let fact_offset = rand::rng().random_range(0..FACTS.len());
        Self::with_offset(now, fact_offset)
    }

    pub fn with_offset(now: Instant, fact_offset: usize) -> Self {
        Self {
            started: now,
            fact_offset: fact_offset % FACTS.len(),
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Fraction in `[0, MAX_PROGRESS)`, non-decreasing in `now`.
    pub fn progress(&self, now: Instant) -> f64 {
        let t = self.elapsed(now).as_secs_f64();
        MAX_PROGRESS * (1.0 - (-t / PROGRESS_TIME_CONSTANT).exp())
    }

    /// The tip to show at `now`.
    pub fn fact(&self, now: Instant) -> &'static str {
        let steps = (self.elapsed(now).as_millis() / FACT_INTERVAL.as_millis()) as usize;
        FACTS[(self.fact_offset + steps) % FACTS.len()]
    }

    /// A status line matching the current bar position.
    pub fn stage(&self, now: Instant) -> &'static str {
        let p = self.progress(now) / MAX_PROGRESS;
        STAGES
            .iter()
            .rev()
            .find(|(threshold, _)| p >= *threshold)
            .map(|(_, label)| *label)
            .unwrap_or(STAGES[0].1)
    }
}
