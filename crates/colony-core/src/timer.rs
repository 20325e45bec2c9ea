#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Countdown driven by the simulation clock.
///
/// A repeating timer stays triggered for exactly one `update` call after it fires: the next
/// `update` clears the flag and starts counting again. A one-shot timer latches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timer {
    target_seconds: f32,
    elapsed_seconds: f32,
    triggered: bool,
    trigger_once: bool,
}

impl Timer {
    pub fn new(target_seconds: f32, trigger_once: bool) -> Self {
        Self {
            target_seconds: target_seconds.max(0.0),
            elapsed_seconds: 0.0,
            triggered: false,
            trigger_once,
        }
    }

    /// Start in the triggered state (e.g. "may summon immediately").
    pub fn pre_triggered(mut self) -> Self {
        self.triggered = true;
        self
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    pub fn target_seconds(&self) -> f32 {
        self.target_seconds
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }

    /// Clear the trigger and restart the countdown with a new target.
    pub fn reset(&mut self, target_seconds: f32) {
        self.target_seconds = target_seconds.max(0.0);
        self.elapsed_seconds = 0.0;
        self.triggered = false;
    }

    /// Advance by `dt_seconds`; returns whether the timer is triggered afterwards.
    pub fn update(&mut self, dt_seconds: f32) -> bool {
        if self.triggered {
            if self.trigger_once {
                return true;
            }
            self.triggered = false;
            self.elapsed_seconds = 0.0;
        }

        self.elapsed_seconds += dt_seconds.max(0.0);
        if self.elapsed_seconds >= self.target_seconds {
            self.triggered = true;
        }
        self.triggered
    }
}
