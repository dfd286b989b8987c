/*
 * Image button: the standard button face plus a composited image whose opacity
 * animates with the state. The image and its placement are per instance.
 */

use crate::error::{PlatformError, Result};
use crate::styling_primitives::{Color, ImageRef};
use crate::types::{ControlKind, Point, Size};
use crate::widgets::animated::AnimatedWidget;
use crate::widgets::button::{paint_button_face, paint_focus_ring};
use crate::widgets::channel::ChannelSpec;
use crate::widgets::drawing::{Canvas, ImagePlacement};
use crate::widgets::kind::{PaintFrame, WidgetKind};
use crate::widgets::palette::{require, AnimationTimings, StateColors, TransitionTiming};
use crate::widgets::state::{react_button, ButtonState, InputEvent, InteractionFlags, Reaction};

pub struct ImageButtonKind;

pub type ImageButton = AnimatedWidget<ImageButtonKind>;

const OPACITY: usize = 6;

const CHANNELS: [ChannelSpec; 7] = [
    ChannelSpec::color("fill.r"),
    ChannelSpec::color("fill.g"),
    ChannelSpec::color("fill.b"),
    ChannelSpec::color("border.r"),
    ChannelSpec::color("border.g"),
    ChannelSpec::color("border.b"),
    ChannelSpec::opacity("image.opacity"),
];

/// Image opacity per state, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOpacities {
    pub default: f64,
    pub hover: f64,
    pub down: f64,
    pub flash: f64,
}

impl Default for ImageOpacities {
    fn default() -> Self {
        Self {
            default: 0.75,
            hover: 1.0,
            down: 0.6,
            flash: 1.0,
        }
    }
}

impl ImageOpacities {
    fn for_state(&self, state: ButtonState) -> f64 {
        match state {
            ButtonState::Default => self.default,
            ButtonState::Hover => self.hover,
            ButtonState::Down => self.down,
            ButtonState::Flash => self.flash,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageButtonPaletteConfig {
    pub default_colors: Option<StateColors>,
    pub hover_colors: Option<StateColors>,
    pub down_colors: Option<StateColors>,
    pub flash_colors: Option<StateColors>,
    pub focus_color: Option<Color>,
    pub opacities: ImageOpacities,
    pub corner_radius: i32,
    pub timings: AnimationTimings,
}

impl ImageButtonPaletteConfig {
    /// A complete dark theme.
    pub fn dark() -> Self {
        let face = Color::rgb(0x3C, 0x3F, 0x41);
        let accent = Color::rgb(0x3D, 0x7E, 0xD9);
        Self {
            default_colors: Some(StateColors::new(face, face)),
            hover_colors: Some(StateColors::new(Color::rgb(0x4A, 0x4E, 0x51), accent)),
            down_colors: Some(StateColors::new(face.darken(80), accent.darken(80))),
            flash_colors: Some(StateColors::new(accent, accent)),
            focus_color: Some(accent),
            opacities: ImageOpacities::default(),
            corner_radius: 4,
            timings: AnimationTimings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageButtonPalette {
    pub default_colors: StateColors,
    pub hover_colors: StateColors,
    pub down_colors: StateColors,
    pub flash_colors: StateColors,
    pub focus_color: Color,
    pub opacities: ImageOpacities,
    pub corner_radius: i32,
    pub timings: AnimationTimings,
}

impl ImageButtonPalette {
    pub fn colors(&self, state: ButtonState) -> StateColors {
        match state {
            ButtonState::Default => self.default_colors,
            ButtonState::Hover => self.hover_colors,
            ButtonState::Down => self.down_colors,
            ButtonState::Flash => self.flash_colors,
        }
    }
}

impl TryFrom<&ImageButtonPaletteConfig> for ImageButtonPalette {
    type Error = PlatformError;

    fn try_from(config: &ImageButtonPaletteConfig) -> Result<Self> {
        let kind = ControlKind::ImageButton;
        config.timings.validate(kind)?;
        let o = config.opacities;
        if [o.default, o.hover, o.down, o.flash]
            .iter()
            .any(|v| !(0.0..=1.0).contains(v))
        {
            return Err(PlatformError::InvalidConfiguration(format!(
                "{kind} palette: image opacities must lie in [0, 1]"
            )));
        }
        Ok(Self {
            default_colors: require(&config.default_colors, kind, "default_colors")?,
            hover_colors: require(&config.hover_colors, kind, "hover_colors")?,
            down_colors: require(&config.down_colors, kind, "down_colors")?,
            flash_colors: require(&config.flash_colors, kind, "flash_colors")?,
            focus_color: require(&config.focus_color, kind, "focus_color")?,
            opacities: o,
            corner_radius: config.corner_radius.max(0),
            timings: config.timings,
        })
    }
}

/// Per-instance settings of an image button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageButtonConfig {
    pub image: Option<ImageRef>,
    /// Color behind the button face, usually the parent's background.
    pub background: Option<Color>,
    /// Offset of the image from the top-left corner, ignored when `centered`.
    pub image_offset: Point,
    /// Drawn size of the image; the image's own size when `None`.
    pub image_size: Option<Size>,
    pub centered: bool,
}

impl ImageButtonConfig {
    pub fn centered(image: ImageRef, background: Color) -> Self {
        Self {
            image: Some(image),
            background: Some(background),
            centered: true,
            ..Self::default()
        }
    }

    fn placement(&self, image: &ImageRef) -> ImagePlacement {
        ImagePlacement {
            offset: self.image_offset,
            size: self.image_size.unwrap_or_else(|| image.size()),
            centered: self.centered,
        }
    }
}

impl WidgetKind for ImageButtonKind {
    type State = ButtonState;
    type PaletteConfig = ImageButtonPaletteConfig;
    type Palette = ImageButtonPalette;
    type InstanceConfig = ImageButtonConfig;

    const KIND: ControlKind = ControlKind::ImageButton;

    fn build_palette(config: &ImageButtonPaletteConfig) -> Result<ImageButtonPalette> {
        ImageButtonPalette::try_from(config)
    }

    fn validate_instance(config: &ImageButtonConfig) -> Result<()> {
        if config.image.is_none() {
            return Err(PlatformError::InvalidConfiguration(
                "image button requires an image".to_string(),
            ));
        }
        if config.background.is_none() {
            return Err(PlatformError::InvalidConfiguration(
                "image button requires a background color".to_string(),
            ));
        }
        if config.image_size.is_some_and(Size::is_empty) {
            return Err(PlatformError::InvalidConfiguration(
                "image button size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn channel_specs() -> &'static [ChannelSpec] {
        &CHANNELS
    }

    fn targets(
        palette: &ImageButtonPalette,
        _config: &ImageButtonConfig,
        state: ButtonState,
    ) -> Vec<f64> {
        let mut values = palette.colors(state).channel_targets().to_vec();
        values.push(palette.opacities.for_state(state));
        values
    }

    fn timing(palette: &ImageButtonPalette, state: ButtonState) -> TransitionTiming {
        palette.timings.for_transition(state == ButtonState::Flash)
    }

    fn react(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<ButtonState> {
        react_button(flags, event)
    }

    fn paint(frame: &PaintFrame<'_, Self>, canvas: &mut Canvas<'_>) -> Result<()> {
        let palette = frame.palette;
        let config = frame.config;
        if let Some(background) = config.background {
            canvas.fill_rect(frame.bounds, &background.into())?;
        }
        paint_button_face(canvas, frame.sample, palette.corner_radius)?;
        if let Some(image) = &config.image {
            let opacity = frame.sample.opacity_at(OPACITY);
            canvas.draw_image(frame.bounds, image, opacity, config.placement(image))?;
        }
        paint_focus_ring(canvas, frame.flags, palette.corner_radius, palette.focus_color)
    }
}
