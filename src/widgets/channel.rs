/*
 * Animated channels: the clock-service variables behind a widget's colors and
 * opacities. A `ChannelSet` owns its variables and releases them when dropped,
 * unless the clock service has already been torn down.
 */

use crate::animation::{AnimationClockService, RoundingMode, VariableId};
use crate::error::{PlatformError, Result};
use crate::styling_primitives::Color;

use std::rc::Rc;

/// Range and rounding of one animated channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub lower: f64,
    pub upper: f64,
    pub rounding: RoundingMode,
}

impl ChannelSpec {
    /// An 8-bit color component: [0, 255], rounded to the nearest integer.
    pub const fn color(name: &'static str) -> Self {
        Self {
            name,
            lower: 0.0,
            upper: 255.0,
            rounding: RoundingMode::Nearest,
        }
    }

    /// An opacity in [0, 1].
    pub const fn opacity(name: &'static str) -> Self {
        Self {
            name,
            lower: 0.0,
            upper: 1.0,
            rounding: RoundingMode::None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnimatedChannel {
    spec: ChannelSpec,
    variable: VariableId,
}

impl AnimatedChannel {
    pub fn spec(&self) -> &ChannelSpec {
        &self.spec
    }

    pub fn variable(&self) -> VariableId {
        self.variable
    }
}

pub struct ChannelSet {
    clock: Rc<dyn AnimationClockService>,
    channels: Vec<AnimatedChannel>,
}

impl ChannelSet {
    /*
     * Creates one variable per spec, starting at the matching `initial` value.
     * If any step fails, the variables created so far are released before the
     * error is returned.
     */
    pub fn create(
        clock: Rc<dyn AnimationClockService>,
        specs: &[ChannelSpec],
        initial: &[f64],
    ) -> Result<Self> {
        if specs.len() != initial.len() {
            return Err(PlatformError::OperationFailed(format!(
                "{} channel specs but {} initial values",
                specs.len(),
                initial.len()
            )));
        }
        let mut set = Self {
            clock,
            channels: Vec::with_capacity(specs.len()),
        };
        for (spec, value) in specs.iter().zip(initial) {
            let variable = set.clock.create_variable(*value)?;
            set.channels.push(AnimatedChannel {
                spec: *spec,
                variable,
            });
            set.clock.set_bounds(variable, spec.lower, spec.upper)?;
            set.clock.set_rounding(variable, spec.rounding)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatedChannel> {
        self.channels.iter()
    }

    /// Current value of every channel, in creation order.
    pub fn sample(&self) -> Result<ChannelSample> {
        let values = self
            .channels
            .iter()
            .map(|channel| self.clock.current_value(channel.variable))
            .collect::<Result<Vec<_>>>()?;
        Ok(ChannelSample { values })
    }
}

impl Drop for ChannelSet {
    fn drop(&mut self) {
        if self.clock.is_shut_down() {
            return;
        }
        for channel in &self.channels {
            if let Err(e) = self.clock.release_variable(channel.variable) {
                log::warn!(
                    "ChannelSet: failed to release channel '{}': {e}",
                    channel.spec.name
                );
            }
        }
    }
}

/// Snapshot of a widget's channel values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSample {
    values: Vec<f64>,
}

impl ChannelSample {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Reads three consecutive channels starting at `start` as an RGB color.
    pub fn color_at(&self, start: usize) -> Color {
        let component = |i: usize| self.value(start + i).round().clamp(0.0, 255.0) as u8;
        Color::rgb(component(0), component(1), component(2))
    }

    pub fn opacity_at(&self, index: usize) -> f32 {
        self.value(index).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::test_support::{FaultPoint, Fixture};

    const SPECS: [ChannelSpec; 4] = [
        ChannelSpec::color("r"),
        ChannelSpec::color("g"),
        ChannelSpec::color("b"),
        ChannelSpec::opacity("alpha"),
    ];

    #[test]
    fn sample_reads_back_initial_values() {
        let fixture = Fixture::new();
        let set = ChannelSet::create(fixture.clock.clone(), &SPECS, &[10.0, 20.0, 30.0, 0.5])
            .unwrap();
        let sample = set.sample().unwrap();
        assert_eq!(sample.color_at(0), Color::rgb(10, 20, 30));
        assert_eq!(sample.opacity_at(3), 0.5);
        assert_eq!(fixture.clock.live_variables(), 4);
        drop(set);
        assert_eq!(fixture.clock.live_variables(), 0);
    }

    #[test]
    fn partial_creation_is_released() {
        let fixture = Fixture::new();
        fixture.clock.fail_at(FaultPoint::CreateVariable { after: 2 });
        assert!(
            ChannelSet::create(fixture.clock.clone(), &SPECS, &[0.0, 0.0, 0.0, 1.0]).is_err()
        );
        assert_eq!(fixture.clock.created.get(), 2);
        assert_eq!(fixture.clock.released.get(), 2);
        assert_eq!(fixture.clock.live_variables(), 0);
    }

    #[test]
    fn shut_down_clock_is_not_touched_on_drop() {
        let fixture = Fixture::new();
        let set = ChannelSet::create(fixture.clock.clone(), &SPECS, &[0.0, 0.0, 0.0, 1.0])
            .unwrap();
        fixture.clock.shutdown();
        drop(set);
        assert_eq!(fixture.clock.released.get(), 0);
    }

    #[test]
    fn mismatched_initial_values_create_nothing() {
        let fixture = Fixture::new();
        assert!(ChannelSet::create(fixture.clock.clone(), &SPECS, &[0.0]).is_err());
        assert_eq!(fixture.clock.created.get(), 0);
    }
}
