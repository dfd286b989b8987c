/*
 * In-process animation manager
 *
 * Owns every animation variable and the interpolation segments scheduled on
 * them. Nothing moves on its own: values are recomputed only when
 * `AnimationClockService::update` is called, so a window timer decides the
 * sampling cadence.
 *
 * Scheduling a storyboard on a variable that is still animating does not cancel
 * the earlier storyboard outright. The earlier segments keep running up to the
 * start of the new ones and are cut there; the new segments then continue from
 * whatever value the variable had reached. The most recently scheduled target
 * therefore wins once the manager goes idle.
 */

use crate::animation::clock::{
    AnimationClockService, ManagerStatus, RoundingMode, Seconds, TimeSource, TransitionLibrary,
    VariableId,
};
use crate::animation::storyboard::Storyboard;
use crate::animation::transition::Transition;
use crate::error::{PlatformError, Result};

use slotmap::SlotMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Segment {
    start: Seconds,
    transition: Transition,
    cut_at: Seconds,
}

impl Segment {
    fn end(&self) -> Seconds {
        (self.start + self.transition.duration()).min(self.cut_at)
    }

    fn value_at(&self, from: f64, time: Seconds) -> f64 {
        let natural_end = self.start + self.transition.duration();
        if time >= natural_end && self.cut_at >= natural_end {
            return self.transition.target();
        }
        let clamped = time.min(self.end());
        self.transition.sample(from, clamped - self.start)
    }
}

#[derive(Debug, Clone)]
struct Variable {
    // Value once every folded segment has completed.
    settled: f64,
    current: f64,
    lower: f64,
    upper: f64,
    rounding: RoundingMode,
    segments: Vec<Segment>,
}

impl Variable {
    fn new(initial: f64) -> Self {
        Self {
            settled: initial,
            current: initial,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            rounding: RoundingMode::None,
            segments: Vec::new(),
        }
    }

    fn raw_value_at(&self, time: Seconds) -> f64 {
        let mut value = self.settled;
        for segment in &self.segments {
            if time < segment.start {
                break;
            }
            value = segment.value_at(value, time);
        }
        value
    }

    fn report(&self, raw: f64) -> f64 {
        self.rounding.apply(raw.clamp(self.lower, self.upper))
    }

    fn advance(&mut self, time: Seconds) {
        let finished = self
            .segments
            .iter()
            .take_while(|segment| segment.end() <= time)
            .count();
        for segment in self.segments.drain(..finished) {
            self.settled = segment.value_at(self.settled, segment.end());
        }
        self.current = self.report(self.raw_value_at(time));
    }

    fn supersede_from(&mut self, start: Seconds) {
        self.segments.retain(|segment| segment.start < start);
        for segment in &mut self.segments {
            if segment.end() > start {
                segment.cut_at = segment.cut_at.min(start);
            }
        }
    }

    fn push_segment(&mut self, segment: Segment) {
        if let Some(last) = self.segments.last_mut()
            && last.end() > segment.start
        {
            last.cut_at = last.cut_at.min(segment.start);
        }
        self.segments.push(segment);
    }
}

struct ManagerInner {
    variables: SlotMap<VariableId, Variable>,
    last_update: Seconds,
    shut_down: bool,
}

/*
 * Single-threaded animation manager + transition library. Shared through `Rc`
 * by every widget of a toolkit; all mutation goes through a `RefCell`, and no
 * borrow is held across calls into other objects.
 */
pub struct SoftwareAnimationManager {
    inner: RefCell<ManagerInner>,
    time_source: Rc<dyn TimeSource>,
}

impl SoftwareAnimationManager {
    pub fn new(time_source: Rc<dyn TimeSource>) -> Self {
        let now = time_source.seconds();
        Self {
            inner: RefCell::new(ManagerInner {
                variables: SlotMap::with_key(),
                last_update: now,
                shut_down: false,
            }),
            time_source,
        }
    }

    /*
     * Tears the manager down. All variables are dropped and every later call
     * fails with `NotReady`; owners check `is_shut_down` before releasing.
     */
    pub fn shutdown(&self) {
        let mut inner = self.inner.borrow_mut();
        log::debug!(
            "AnimationManager: shutting down with {} live variable(s)",
            inner.variables.len()
        );
        inner.variables.clear();
        inner.shut_down = true;
    }

    pub fn variable_count(&self) -> usize {
        self.inner.borrow().variables.len()
    }

    fn with_live<R>(&self, f: impl FnOnce(&mut ManagerInner) -> Result<R>) -> Result<R> {
        let mut inner = self.inner.borrow_mut();
        if inner.shut_down {
            return Err(PlatformError::NotReady(
                "animation manager has been shut down".to_string(),
            ));
        }
        f(&mut inner)
    }
}

fn missing_variable(variable: VariableId) -> PlatformError {
    PlatformError::Animation(format!("unknown animation variable {variable:?}"))
}

impl AnimationClockService for SoftwareAnimationManager {
    fn now(&self) -> Result<Seconds> {
        self.with_live(|_| Ok(self.time_source.seconds()))
    }

    fn create_variable(&self, initial: f64) -> Result<VariableId> {
        if !initial.is_finite() {
            return Err(PlatformError::Animation(format!(
                "initial value {initial} is not finite"
            )));
        }
        self.with_live(|inner| Ok(inner.variables.insert(Variable::new(initial))))
    }

    fn set_bounds(&self, variable: VariableId, lower: f64, upper: f64) -> Result<()> {
        if !(lower.is_finite() && upper.is_finite()) || lower > upper {
            return Err(PlatformError::Animation(format!(
                "invalid variable bounds [{lower}, {upper}]"
            )));
        }
        self.with_live(|inner| {
            let last_update = inner.last_update;
            let var = inner
                .variables
                .get_mut(variable)
                .ok_or_else(|| missing_variable(variable))?;
            var.lower = lower;
            var.upper = upper;
            var.current = var.report(var.raw_value_at(last_update));
            Ok(())
        })
    }

    fn set_rounding(&self, variable: VariableId, rounding: RoundingMode) -> Result<()> {
        self.with_live(|inner| {
            let last_update = inner.last_update;
            let var = inner
                .variables
                .get_mut(variable)
                .ok_or_else(|| missing_variable(variable))?;
            var.rounding = rounding;
            var.current = var.report(var.raw_value_at(last_update));
            Ok(())
        })
    }

    fn release_variable(&self, variable: VariableId) -> Result<()> {
        self.with_live(|inner| {
            inner
                .variables
                .remove(variable)
                .map(|_| ())
                .ok_or_else(|| missing_variable(variable))
        })
    }

    fn schedule(&self, storyboard: Storyboard, at: Seconds) -> Result<()> {
        if storyboard.is_empty() {
            return Err(PlatformError::Animation(
                "cannot schedule an empty storyboard".to_string(),
            ));
        }
        self.with_live(|inner| {
            // Validate first so a bad entry leaves every variable untouched.
            if let Some(entry) = storyboard
                .entries()
                .iter()
                .find(|entry| !inner.variables.contains_key(entry.variable))
            {
                return Err(missing_variable(entry.variable));
            }

            let mut per_variable: HashMap<VariableId, Vec<Segment>> = HashMap::new();
            for entry in storyboard.entries() {
                per_variable.entry(entry.variable).or_default().push(Segment {
                    start: at + storyboard.offset_of(entry.start),
                    transition: entry.transition,
                    cut_at: Seconds::INFINITY,
                });
            }

            for (variable, mut segments) in per_variable {
                segments.sort_by(|a, b| a.start.total_cmp(&b.start));
                if let Some(var) = inner.variables.get_mut(variable) {
                    var.supersede_from(segments[0].start);
                    for segment in segments {
                        var.push_segment(segment);
                    }
                }
            }
            log::trace!(
                "AnimationManager: scheduled {} transition(s) at {at:.4}s lasting {:.4}s",
                storyboard.entries().len(),
                storyboard.duration()
            );
            Ok(())
        })
    }

    fn update(&self, now: Seconds) -> Result<ManagerStatus> {
        self.with_live(|inner| {
            let mut busy = false;
            for (_, var) in inner.variables.iter_mut() {
                var.advance(now);
                busy |= !var.segments.is_empty();
            }
            inner.last_update = now;
            Ok(if busy {
                ManagerStatus::Busy
            } else {
                ManagerStatus::Idle
            })
        })
    }

    fn current_value(&self, variable: VariableId) -> Result<f64> {
        self.with_live(|inner| {
            inner
                .variables
                .get(variable)
                .map(|var| var.current)
                .ok_or_else(|| missing_variable(variable))
        })
    }

    fn is_idle(&self) -> Result<bool> {
        self.with_live(|inner| {
            Ok(inner
                .variables
                .values()
                .all(|var| var.segments.is_empty()))
        })
    }

    fn is_shut_down(&self) -> bool {
        self.inner.borrow().shut_down
    }
}

impl TransitionLibrary for SoftwareAnimationManager {
    fn accelerate_decelerate(
        &self,
        duration: Duration,
        target: f64,
        acceleration_ratio: f64,
        deceleration_ratio: f64,
    ) -> Result<Transition> {
        self.with_live(|_| {
            Transition::accelerate_decelerate(
                duration,
                target,
                acceleration_ratio,
                deceleration_ratio,
            )
        })
    }

    fn instantaneous(&self, target: f64) -> Result<Transition> {
        self.with_live(|_| Transition::instantaneous(target))
    }
}
