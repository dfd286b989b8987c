/*
 * Animation clock service
 *
 * The widget core drives every visual transition through two collaborators:
 *
 * - `AnimationClockService`: monotonic time, animation variables, storyboard
 *   scheduling and per-variable sampling.
 * - `TransitionLibrary`: builds interpolations (accelerate/decelerate curves)
 *   that storyboards attach to variables.
 *
 * `SoftwareAnimationManager` implements both in-process. It only advances when
 * `AnimationClockService::update` is called, which the widgets do from their
 * repaint timer.
 */

pub mod clock;
pub mod manager;
pub mod storyboard;
pub mod transition;

pub use clock::{
    AnimationClockService, ManagerStatus, ManualTimeSource, RoundingMode, Seconds,
    SystemTimeSource, TimeSource, TransitionLibrary, VariableId,
};
pub use manager::SoftwareAnimationManager;
pub use storyboard::{KeyframeId, StartAt, Storyboard, StoryboardEntry};
pub use transition::Transition;
