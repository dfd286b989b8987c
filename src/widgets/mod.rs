/*
 * Owner-drawn animated widgets: standard buttons, image buttons and radio
 * buttons, plus the radio group coordinator and the toolkit facade.
 */

pub mod animated;
pub mod button;
pub mod channel;
pub mod context;
pub mod drawing;
pub mod host;
pub mod image_button;
pub mod interceptor;
pub mod kind;
pub mod palette;
pub mod radio_button;
pub mod radio_group;
pub mod state;
pub mod toolkit;

#[cfg(test)]
pub(crate) mod test_support;

pub use button::{ButtonKind, ButtonPalette, ButtonPaletteConfig, StandardButton};
pub use channel::{AnimatedChannel, ChannelSample, ChannelSet, ChannelSpec};
pub use context::{AnimationServices, SharedWidgetContext};
pub use animated::{
    AnimatedWidget, GroupMembership, ANIMATION_TIMER_ID, FOCUS_RING_INSET, REPAINT_INTERVAL,
};
pub use drawing::{Canvas, DrawingPrimitives, ImagePlacement, SurfaceId, TextAlignment};
pub use host::WindowHost;
pub use image_button::{
    ImageButton, ImageButtonConfig, ImageButtonKind, ImageButtonPalette,
    ImageButtonPaletteConfig, ImageOpacities,
};
pub use interceptor::{
    dispatch, FollowUp, InputResponse, InterceptorRegistry, LocalInterceptorRegistry,
    MessageInterceptor, MessageOutcome, SharedInterceptor, WidgetMessage,
};
pub use kind::{PaintFrame, WidgetKind};
pub use palette::{AnimationTimings, StateColors, TransitionTiming};
pub use radio_button::{RadioButton, RadioKind, RadioPalette, RadioPaletteConfig};
pub use radio_group::RadioGroupCoordinator;
pub use state::{
    ButtonState, InputEvent, InteractionFlags, Key, RadioState, Reaction, VisualState,
};
pub use toolkit::WidgetToolkit;
