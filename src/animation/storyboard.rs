/*
 * Storyboards group transitions so they can be committed atomically.
 */

use crate::animation::clock::VariableId;
use crate::animation::transition::Transition;
use crate::error::{PlatformError, Result};

/// A point in a storyboard defined by the end of an earlier transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyframeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAt {
    Beginning,
    Keyframe(KeyframeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryboardEntry {
    pub variable: VariableId,
    pub transition: Transition,
    pub start: StartAt,
}

/*
 * A set of transitions that is scheduled as one unit. Entries either start at
 * the storyboard's beginning or at a keyframe; a keyframe is pinned to the end
 * of the entries that existed when it was added, so a second group of
 * transitions can start exactly when the first group finishes.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storyboard {
    entries: Vec<StoryboardEntry>,
    keyframes: Vec<f64>,
}

impl Storyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transition(&mut self, variable: VariableId, transition: Transition) {
        self.entries.push(StoryboardEntry {
            variable,
            transition,
            start: StartAt::Beginning,
        });
    }

    /// Adds a keyframe at the latest end time of every entry added so far.
    pub fn add_keyframe_at_end(&mut self) -> KeyframeId {
        let end = self
            .entries
            .iter()
            .map(|entry| self.offset_of(entry.start) + entry.transition.duration())
            .fold(0.0, f64::max);
        self.keyframes.push(end);
        KeyframeId(self.keyframes.len() - 1)
    }

    pub fn add_transition_at_keyframe(
        &mut self,
        variable: VariableId,
        transition: Transition,
        keyframe: KeyframeId,
    ) -> Result<()> {
        if keyframe.0 >= self.keyframes.len() {
            return Err(PlatformError::Animation(format!(
                "keyframe {} does not belong to this storyboard",
                keyframe.0
            )));
        }
        self.entries.push(StoryboardEntry {
            variable,
            transition,
            start: StartAt::Keyframe(keyframe),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[StoryboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seconds from the storyboard's beginning to `start`.
    pub fn offset_of(&self, start: StartAt) -> f64 {
        match start {
            StartAt::Beginning => 0.0,
            StartAt::Keyframe(KeyframeId(index)) => self.keyframes.get(index).copied().unwrap_or(0.0),
        }
    }

    /// Total length of the storyboard in seconds.
    pub fn duration(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| self.offset_of(entry.start) + entry.transition.duration())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::time::Duration;

    fn ms_transition(ms: u64, target: f64) -> Transition {
        Transition::accelerate_decelerate(Duration::from_millis(ms), target, 0.0, 0.0).unwrap()
    }

    #[test]
    fn keyframe_is_pinned_to_the_longest_prior_entry() {
        let mut vars: SlotMap<VariableId, ()> = SlotMap::with_key();
        let a = vars.insert(());
        let b = vars.insert(());
        let mut storyboard = Storyboard::new();
        storyboard.add_transition(a, ms_transition(100, 1.0));
        storyboard.add_transition(b, ms_transition(250, 1.0));
        let keyframe = storyboard.add_keyframe_at_end();
        storyboard
            .add_transition_at_keyframe(a, ms_transition(100, 0.0), keyframe)
            .unwrap();

        assert!((storyboard.offset_of(StartAt::Keyframe(keyframe)) - 0.25).abs() < 1e-12);
        assert!((storyboard.duration() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn foreign_keyframe_is_rejected() {
        let mut vars: SlotMap<VariableId, ()> = SlotMap::with_key();
        let a = vars.insert(());
        let mut other = Storyboard::new();
        other.add_transition(a, ms_transition(10, 1.0));
        let foreign = other.add_keyframe_at_end();

        let mut storyboard = Storyboard::new();
        assert!(
            storyboard
                .add_transition_at_keyframe(a, ms_transition(10, 0.0), foreign)
                .is_err()
        );
    }
}
