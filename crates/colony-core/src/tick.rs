use crate::{rng, AgentId, SplitMix64};

/// Per-tick inputs supplied by the host loop.
///
/// `now_seconds` is the monotonic simulation clock; `dt_seconds` is the step since the previous
/// tick. Acts must never read wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub now_seconds: f64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            now_seconds: tick as f64 * dt_seconds as f64,
            seed,
        }
    }

    /// The context of the following tick, advancing the clock by `dt_seconds`.
    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            dt_seconds: self.dt_seconds,
            now_seconds: self.now_seconds + self.dt_seconds as f64,
            seed: self.seed,
        }
    }

    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
