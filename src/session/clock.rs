//! Chess-style game clock
//!
//! The clock never reads wall time on its own: the owner charges elapsed
//! time to the side to move and the clock reports when a flag falls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Color;

/// Base time per side plus a per-move increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    pub base: Duration,
    pub increment: Duration,
}

impl TimeControl {
    pub fn new(base: Duration, increment: Duration) -> Self {
        Self { base, increment }
    }

    /// Sudden death: no increment
    pub fn minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60), Duration::ZERO)
    }
}

/// Remaining time per side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    control: TimeControl,
    remaining: [Duration; 2],
}

impl GameClock {
    pub fn new(control: TimeControl) -> Self {
        Self {
            control,
            remaining: [control.base; 2],
        }
    }

    pub fn control(&self) -> TimeControl {
        self.control
    }

    #[inline]
    pub fn remaining(&self, color: Color) -> Duration {
        self.remaining[color.index()]
    }

    /// Charge `elapsed` to `color`. Returns `true` if its flag fell.
    pub fn charge(&mut self, color: Color, elapsed: Duration) -> bool {
        let left = &mut self.remaining[color.index()];
        *left = left.saturating_sub(elapsed);
        left.is_zero()
    }

    /// Credit the increment after a completed move
    pub fn add_increment(&mut self, color: Color) {
        self.remaining[color.index()] += self.control.increment;
    }

    #[inline]
    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining(color).is_zero()
    }
}
