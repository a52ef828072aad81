//! Time-boxed offset animation for the page strip
//!
//! A new transition always starts from the offset currently on screen, so it
//! supersedes whatever was in flight. Zero-duration transitions land at once.

use std::time::{Duration, Instant};

use super::controller::Transition;

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    EaseInOut,
    Linear,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            // Cubic ease-in-out
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Animated strip offset
#[derive(Debug, Clone)]
pub struct Motion {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl Motion {
    /// A strip resting at `offset`
    pub fn at_rest(offset: f64, now: Instant) -> Self {
        Self {
            from: offset,
            to: offset,
            started: now,
            duration: Duration::ZERO,
            easing: Easing::EaseInOut,
        }
    }

    /// Start playing `transition` from wherever the strip is at `now`
    pub fn start(&mut self, transition: &Transition, now: Instant) {
        self.from = self.offset_at(now);
        self.to = transition.offset;
        self.started = now;
        self.duration = transition.duration;
        self.easing = transition.easing;
    }

    /// Pin the strip to a live drag position
    pub fn follow(&mut self, offset: f64, now: Instant) {
        *self = Self::at_rest(offset, now);
    }

    /// Offset displayed at `now`
    pub fn offset_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Offset the strip is heading to
    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.duration.is_zero() || now.saturating_duration_since(self.started) >= self.duration
    }
}
