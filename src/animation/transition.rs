/*
 * Interpolation curves.
 */

use crate::error::{PlatformError, Result};
use std::time::Duration;

/*
 * An interpolation toward `target` over `duration`. The velocity ramps up
 * linearly for `acceleration_ratio` of the duration, holds, then ramps down for
 * `deceleration_ratio`. The start value is whatever the variable holds when the
 * transition begins.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    duration: f64,
    target: f64,
    acceleration_ratio: f64,
    deceleration_ratio: f64,
}

impl Transition {
    pub fn accelerate_decelerate(
        duration: Duration,
        target: f64,
        acceleration_ratio: f64,
        deceleration_ratio: f64,
    ) -> Result<Self> {
        if !target.is_finite() {
            return Err(PlatformError::Animation(format!(
                "transition target {target} is not finite"
            )));
        }
        let ratio_ok = |r: f64| (0.0..=1.0).contains(&r);
        if !ratio_ok(acceleration_ratio)
            || !ratio_ok(deceleration_ratio)
            || acceleration_ratio + deceleration_ratio > 1.0
        {
            return Err(PlatformError::Animation(format!(
                "invalid acceleration/deceleration ratios {acceleration_ratio}/{deceleration_ratio}"
            )));
        }
        Ok(Self {
            duration: duration.as_secs_f64(),
            target,
            acceleration_ratio,
            deceleration_ratio,
        })
    }

    pub fn instantaneous(target: f64) -> Result<Self> {
        Self::accelerate_decelerate(Duration::ZERO, target, 0.0, 0.0)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Normalized progress in [0, 1] for normalized time `u`.
    pub fn progress(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let a = self.acceleration_ratio;
        let d = self.deceleration_ratio;
        let peak = 1.0 / (1.0 - a / 2.0 - d / 2.0);
        if u < a {
            peak * u * u / (2.0 * a)
        } else if u <= 1.0 - d {
            peak * (u - a / 2.0)
        } else {
            let rest = 1.0 - u;
            1.0 - peak * rest * rest / (2.0 * d)
        }
    }

    /// Value `elapsed` seconds into the transition when starting from `from`.
    pub fn sample(&self, from: f64, elapsed: f64) -> f64 {
        if self.duration <= 0.0 || elapsed >= self.duration {
            return self.target;
        }
        if elapsed <= 0.0 {
            return from;
        }
        from + (self.target - from) * self.progress(elapsed / self.duration)
    }
}
