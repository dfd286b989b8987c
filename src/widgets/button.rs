/*
 * Standard owner-drawn push button: a rounded rectangle whose fill and border
 * colors animate between the palette's per-state colors, with centered text
 * and a focus ring.
 */

use crate::error::Result;
use crate::styling_primitives::{Color, ColorValue, FontDescription};
use crate::types::ControlKind;
use crate::widgets::animated::{AnimatedWidget, FOCUS_RING_INSET};
use crate::widgets::channel::{ChannelSpec, ChannelSample};
use crate::widgets::drawing::{Canvas, TextAlignment};
use crate::widgets::kind::{PaintFrame, WidgetKind};
use crate::widgets::palette::{require, AnimationTimings, StateColors, TransitionTiming};
use crate::widgets::state::{react_button, ButtonState, InputEvent, InteractionFlags, Reaction};

pub struct ButtonKind;

pub type StandardButton = AnimatedWidget<ButtonKind>;

pub(crate) const FILL: usize = 0;
pub(crate) const BORDER: usize = 3;

const CHANNELS: [ChannelSpec; 6] = [
    ChannelSpec::color("fill.r"),
    ChannelSpec::color("fill.g"),
    ChannelSpec::color("fill.b"),
    ChannelSpec::color("border.r"),
    ChannelSpec::color("border.g"),
    ChannelSpec::color("border.b"),
];

/// Unvalidated button palette; every `Option` field is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonPaletteConfig {
    pub background: Option<Color>,
    pub default_colors: Option<StateColors>,
    pub hover_colors: Option<StateColors>,
    pub down_colors: Option<StateColors>,
    pub flash_colors: Option<StateColors>,
    pub text_color: Option<Color>,
    pub focus_color: Option<Color>,
    pub font: Option<FontDescription>,
    pub corner_radius: i32,
    pub timings: AnimationTimings,
}

impl ButtonPaletteConfig {
    /// A complete dark theme.
    pub fn dark() -> Self {
        let face = Color::rgb(0x3C, 0x3F, 0x41);
        let edge = Color::rgb(0x5A, 0x5D, 0x60);
        let accent = Color::rgb(0x3D, 0x7E, 0xD9);
        Self {
            background: Some(Color::rgb(0x2B, 0x2B, 0x2B)),
            default_colors: Some(StateColors::new(face, edge)),
            hover_colors: Some(StateColors::new(Color::rgb(0x4A, 0x4E, 0x51), accent)),
            down_colors: Some(StateColors::new(face.darken(80), accent.darken(80))),
            flash_colors: Some(StateColors::new(accent, Color::rgb(0x8A, 0xB4, 0xF0))),
            text_color: Some(Color::rgb(0xE0, 0xE0, 0xE0)),
            focus_color: Some(accent),
            font: Some(FontDescription::default()),
            corner_radius: 4,
            timings: AnimationTimings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPalette {
    pub background: Color,
    pub default_colors: StateColors,
    pub hover_colors: StateColors,
    pub down_colors: StateColors,
    pub flash_colors: StateColors,
    pub text_color: Color,
    pub focus_color: Color,
    pub font: FontDescription,
    pub corner_radius: i32,
    pub timings: AnimationTimings,
}

impl ButtonPalette {
    pub fn colors(&self, state: ButtonState) -> StateColors {
        match state {
            ButtonState::Default => self.default_colors,
            ButtonState::Hover => self.hover_colors,
            ButtonState::Down => self.down_colors,
            ButtonState::Flash => self.flash_colors,
        }
    }
}

impl TryFrom<&ButtonPaletteConfig> for ButtonPalette {
    type Error = crate::error::PlatformError;

    fn try_from(config: &ButtonPaletteConfig) -> Result<Self> {
        let kind = ControlKind::Button;
        config.timings.validate(kind)?;
        Ok(Self {
            background: require(&config.background, kind, "background")?,
            default_colors: require(&config.default_colors, kind, "default_colors")?,
            hover_colors: require(&config.hover_colors, kind, "hover_colors")?,
            down_colors: require(&config.down_colors, kind, "down_colors")?,
            flash_colors: require(&config.flash_colors, kind, "flash_colors")?,
            text_color: require(&config.text_color, kind, "text_color")?,
            focus_color: require(&config.focus_color, kind, "focus_color")?,
            font: require(&config.font, kind, "font")?,
            corner_radius: config.corner_radius.max(0),
            timings: config.timings,
        })
    }
}

/// Fill, border and focus ring shared by standard and image buttons.
pub(crate) fn paint_button_face(
    canvas: &mut Canvas<'_>,
    sample: &ChannelSample,
    corner_radius: i32,
) -> Result<()> {
    let fill = ColorValue::from(sample.color_at(FILL));
    let border = ColorValue::from(sample.color_at(BORDER));
    let face = canvas.bounds().inset(1, 1);
    canvas.fill_round_rect(face, corner_radius, &fill, Some(&border))
}

pub(crate) fn paint_focus_ring(
    canvas: &mut Canvas<'_>,
    flags: InteractionFlags,
    corner_radius: i32,
    color: Color,
) -> Result<()> {
    if !flags.focused {
        return Ok(());
    }
    let ring = canvas.bounds().inset(FOCUS_RING_INSET, FOCUS_RING_INSET);
    canvas.draw_round_rect(ring, corner_radius, 1, &color.into())
}

impl WidgetKind for ButtonKind {
    type State = ButtonState;
    type PaletteConfig = ButtonPaletteConfig;
    type Palette = ButtonPalette;
    type InstanceConfig = ();

    const KIND: ControlKind = ControlKind::Button;

    fn build_palette(config: &ButtonPaletteConfig) -> Result<ButtonPalette> {
        ButtonPalette::try_from(config)
    }

    fn validate_instance(_config: &()) -> Result<()> {
        Ok(())
    }

    fn channel_specs() -> &'static [ChannelSpec] {
        &CHANNELS
    }

    fn targets(palette: &ButtonPalette, _config: &(), state: ButtonState) -> Vec<f64> {
        palette.colors(state).channel_targets().to_vec()
    }

    fn timing(palette: &ButtonPalette, state: ButtonState) -> TransitionTiming {
        palette.timings.for_transition(state == ButtonState::Flash)
    }

    fn react(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<ButtonState> {
        react_button(flags, event)
    }

    fn paint(frame: &PaintFrame<'_, Self>, canvas: &mut Canvas<'_>) -> Result<()> {
        let palette = frame.palette;
        canvas.fill_rect(frame.bounds, &palette.background.into())?;
        paint_button_face(canvas, frame.sample, palette.corner_radius)?;
        if !frame.text.is_empty() {
            canvas.draw_text(
                frame.bounds,
                frame.text,
                &palette.text_color.into(),
                TextAlignment::Center,
                Some(&palette.font),
            )?;
        }
        paint_focus_ring(canvas, frame.flags, palette.corner_radius, palette.focus_color)
    }
}
