/*
 * Collaborator traits for the animation engine and the time sources behind it.
 */

use crate::animation::storyboard::Storyboard;
use crate::animation::transition::Transition;
use crate::error::Result;

use slotmap::new_key_type;
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Animation time in seconds since the time source's origin.
pub type Seconds = f64;

new_key_type! {
    /// Handle to an animation variable owned by a clock service.
    pub struct VariableId;
}

/// How a variable's sampled value is rounded before it is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    #[default]
    None,
    Floor,
    Nearest,
}

impl RoundingMode {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::None => value,
            RoundingMode::Floor => value.floor(),
            RoundingMode::Nearest => value.round(),
        }
    }
}

/// Whether any scheduled interpolation is still pending after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerStatus {
    Idle,
    Busy,
}

/// The animation manager + timer half of the clock service.
pub trait AnimationClockService {
    /// Current animation time.
    fn now(&self) -> Result<Seconds>;

    fn create_variable(&self, initial: f64) -> Result<VariableId>;

    /// Clamps every value the variable reports to `[lower, upper]`.
    fn set_bounds(&self, variable: VariableId, lower: f64, upper: f64) -> Result<()>;

    fn set_rounding(&self, variable: VariableId, rounding: RoundingMode) -> Result<()>;

    fn release_variable(&self, variable: VariableId) -> Result<()>;

    /// Commits every transition in `storyboard`, with the storyboard's
    /// beginning anchored at `at`.
    fn schedule(&self, storyboard: Storyboard, at: Seconds) -> Result<()>;

    /// Advances all variables to `now` and reports whether work remains.
    fn update(&self, now: Seconds) -> Result<ManagerStatus>;

    /// Value of `variable` as of the most recent update, bounded and rounded.
    fn current_value(&self, variable: VariableId) -> Result<f64>;

    /// True once no scheduled interpolation is pending as of the last update.
    fn is_idle(&self) -> Result<bool>;

    /// True after the service has been torn down; owners skip releasing
    /// their variables in that case.
    fn is_shut_down(&self) -> bool;
}

/// Factory for interpolations that storyboards attach to variables.
pub trait TransitionLibrary {
    fn accelerate_decelerate(
        &self,
        duration: Duration,
        target: f64,
        acceleration_ratio: f64,
        deceleration_ratio: f64,
    ) -> Result<Transition>;

    fn instantaneous(&self, target: f64) -> Result<Transition>;
}

/// Monotonic time in seconds.
pub trait TimeSource {
    fn seconds(&self) -> Seconds;
}

/// Wall-clock time source anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn seconds(&self) -> Seconds {
        self.origin.elapsed().as_secs_f64()
    }
}

/*
 * Time source that only moves when told to. Used to step animations
 * deterministically, e.g. when replaying a recorded interaction.
 */
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: Cell<Seconds>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: Seconds) {
        self.now.set(seconds);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_secs_f64());
    }
}

impl TimeSource for ManualTimeSource {
    fn seconds(&self) -> Seconds {
        self.now.get()
    }
}
