/*
 * Building blocks shared by the per-kind palettes: the state colors, the
 * animation timings and the validation helper that turns an optional config
 * field into a required palette value.
 */

use crate::error::{PlatformError, Result};
use crate::styling_primitives::Color;
use crate::types::ControlKind;

use std::time::Duration;

pub const DEFAULT_HOVER_DOWN_DURATION: Duration = Duration::from_millis(150);
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(200);
pub const DEFAULT_ACCELERATION_RATIO: f64 = 0.3;
pub const DEFAULT_DECELERATION_RATIO: f64 = 0.3;

/// Fill and border color of a widget in one visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateColors {
    pub fill: Color,
    pub border: Color,
}

impl StateColors {
    pub const fn new(fill: Color, border: Color) -> Self {
        Self { fill, border }
    }

    /// The six color channel targets in (fill r, g, b, border r, g, b) order.
    pub fn channel_targets(&self) -> [f64; 6] {
        [
            self.fill.r as f64,
            self.fill.g as f64,
            self.fill.b as f64,
            self.border.r as f64,
            self.border.g as f64,
            self.border.b as f64,
        ]
    }
}

/// Durations and curve shape of the state transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTimings {
    /// Used for every transition except the flash pulse.
    pub hover_down: Duration,
    /// Length of each of the two flash legs.
    pub flash: Duration,
    pub acceleration_ratio: f64,
    pub deceleration_ratio: f64,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            hover_down: DEFAULT_HOVER_DOWN_DURATION,
            flash: DEFAULT_FLASH_DURATION,
            acceleration_ratio: DEFAULT_ACCELERATION_RATIO,
            deceleration_ratio: DEFAULT_DECELERATION_RATIO,
        }
    }
}

impl AnimationTimings {
    pub fn validate(&self, kind: ControlKind) -> Result<()> {
        let ratio_ok = |r: f64| r.is_finite() && (0.0..=1.0).contains(&r);
        if !ratio_ok(self.acceleration_ratio)
            || !ratio_ok(self.deceleration_ratio)
            || self.acceleration_ratio + self.deceleration_ratio > 1.0
        {
            return Err(PlatformError::InvalidConfiguration(format!(
                "{kind} palette: acceleration/deceleration ratios {}/{} must lie in [0, 1] and sum to at most 1",
                self.acceleration_ratio, self.deceleration_ratio
            )));
        }
        Ok(())
    }

    pub fn for_transition(&self, flash: bool) -> TransitionTiming {
        TransitionTiming {
            duration: if flash { self.flash } else { self.hover_down },
            acceleration_ratio: self.acceleration_ratio,
            deceleration_ratio: self.deceleration_ratio,
        }
    }
}

/// Timing of one scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    pub duration: Duration,
    pub acceleration_ratio: f64,
    pub deceleration_ratio: f64,
}

/// Unwraps a required palette field or reports which one is missing.
pub(crate) fn require<T: Clone>(value: &Option<T>, kind: ControlKind, field: &str) -> Result<T> {
    value.clone().ok_or_else(|| {
        PlatformError::InvalidConfiguration(format!("{kind} palette is missing `{field}`"))
    })
}
