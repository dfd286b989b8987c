/*
 * `WidgetKind` is what differs between the owner-drawn controls: palette,
 * per-instance config, channel layout, state machine and paint routine.
 * Everything else lives once in `AnimatedWidget<K>`.
 */

use crate::error::Result;
use crate::types::{ControlKind, Rect};
use crate::widgets::channel::{ChannelSample, ChannelSpec};
use crate::widgets::drawing::Canvas;
use crate::widgets::palette::TransitionTiming;
use crate::widgets::state::{InputEvent, InteractionFlags, Reaction, VisualState};

use std::fmt::Debug;

/// Everything a kind needs to paint one frame.
pub struct PaintFrame<'a, K: WidgetKind> {
    pub bounds: Rect,
    pub sample: &'a ChannelSample,
    pub palette: &'a K::Palette,
    pub config: &'a K::InstanceConfig,
    pub state: K::State,
    pub flags: InteractionFlags,
    pub text: &'a str,
}

pub trait WidgetKind: Sized + 'static {
    type State: VisualState;
    type PaletteConfig: Debug + 'static;
    type Palette: Debug + 'static;
    type InstanceConfig: Debug + 'static;

    const KIND: ControlKind;

    fn build_palette(config: &Self::PaletteConfig) -> Result<Self::Palette>;

    fn validate_instance(config: &Self::InstanceConfig) -> Result<()>;

    fn channel_specs() -> &'static [ChannelSpec];

    /// Channel values the widget rests at in `state`, one per channel spec.
    fn targets(
        palette: &Self::Palette,
        config: &Self::InstanceConfig,
        state: Self::State,
    ) -> Vec<f64>;

    fn timing(palette: &Self::Palette, state: Self::State) -> TransitionTiming;

    fn react(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<Self::State>;

    fn paint(frame: &PaintFrame<'_, Self>, canvas: &mut Canvas<'_>) -> Result<()>;
}
