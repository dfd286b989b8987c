/*
 * Owner-drawn radio button: a circular indicator with an animated ring and a
 * center dot that fades in while selected, followed by left-aligned text.
 * Selection is coordinated across siblings by `RadioGroupCoordinator`.
 */

use crate::error::{PlatformError, Result};
use crate::styling_primitives::{Color, ColorValue, FontDescription};
use crate::types::{ControlKind, Point, Rect, WidgetId};
use crate::widgets::animated::{AnimatedWidget, FOCUS_RING_INSET};
use crate::widgets::channel::ChannelSpec;
use crate::widgets::drawing::{Canvas, TextAlignment};
use crate::widgets::kind::{PaintFrame, WidgetKind};
use crate::widgets::palette::{require, AnimationTimings, StateColors, TransitionTiming};
use crate::widgets::state::{react_radio, InputEvent, InteractionFlags, RadioState, Reaction};

pub struct RadioKind;

pub type RadioButton = AnimatedWidget<RadioKind>;

const RING_FILL: usize = 0;
const RING_BORDER: usize = 3;
const DOT_OPACITY: usize = 6;

const CHANNELS: [ChannelSpec; 7] = [
    ChannelSpec::color("ring.fill.r"),
    ChannelSpec::color("ring.fill.g"),
    ChannelSpec::color("ring.fill.b"),
    ChannelSpec::color("ring.border.r"),
    ChannelSpec::color("ring.border.g"),
    ChannelSpec::color("ring.border.b"),
    ChannelSpec::opacity("dot.opacity"),
];

// Gap between the indicator and the label.
const LABEL_GAP: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadioPaletteConfig {
    pub background: Option<Color>,
    pub default_colors: Option<StateColors>,
    pub hover_colors: Option<StateColors>,
    pub down_colors: Option<StateColors>,
    pub selected_colors: Option<StateColors>,
    pub selected_hover_colors: Option<StateColors>,
    pub selected_down_colors: Option<StateColors>,
    pub selected_flash_colors: Option<StateColors>,
    pub dot_color: Option<Color>,
    pub text_color: Option<Color>,
    pub focus_color: Option<Color>,
    pub font: Option<FontDescription>,
    pub indicator_diameter: i32,
    pub timings: AnimationTimings,
}

impl RadioPaletteConfig {
    /// A complete dark theme.
    pub fn dark() -> Self {
        let ring = Color::rgb(0x3C, 0x3F, 0x41);
        let edge = Color::rgb(0x7A, 0x7D, 0x80);
        let accent = Color::rgb(0x3D, 0x7E, 0xD9);
        Self {
            background: Some(Color::rgb(0x2B, 0x2B, 0x2B)),
            default_colors: Some(StateColors::new(ring, edge)),
            hover_colors: Some(StateColors::new(Color::rgb(0x4A, 0x4E, 0x51), accent)),
            down_colors: Some(StateColors::new(ring.darken(80), accent.darken(80))),
            selected_colors: Some(StateColors::new(ring, accent)),
            selected_hover_colors: Some(StateColors::new(Color::rgb(0x4A, 0x4E, 0x51), accent)),
            selected_down_colors: Some(StateColors::new(ring.darken(80), accent.darken(80))),
            selected_flash_colors: Some(StateColors::new(accent, Color::rgb(0x8A, 0xB4, 0xF0))),
            dot_color: Some(accent),
            text_color: Some(Color::rgb(0xE0, 0xE0, 0xE0)),
            focus_color: Some(accent),
            font: Some(FontDescription::default()),
            indicator_diameter: 16,
            timings: AnimationTimings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioPalette {
    pub background: Color,
    pub default_colors: StateColors,
    pub hover_colors: StateColors,
    pub down_colors: StateColors,
    pub selected_colors: StateColors,
    pub selected_hover_colors: StateColors,
    pub selected_down_colors: StateColors,
    pub selected_flash_colors: StateColors,
    pub dot_color: Color,
    pub text_color: Color,
    pub focus_color: Color,
    pub font: FontDescription,
    pub indicator_diameter: i32,
    pub timings: AnimationTimings,
}

impl RadioPalette {
    pub fn colors(&self, state: RadioState) -> StateColors {
        match state {
            RadioState::Default => self.default_colors,
            RadioState::Hover => self.hover_colors,
            RadioState::Down => self.down_colors,
            RadioState::Selected => self.selected_colors,
            RadioState::SelectedHover => self.selected_hover_colors,
            RadioState::SelectedDown => self.selected_down_colors,
            RadioState::SelectedFlash => self.selected_flash_colors,
        }
    }
}

impl TryFrom<&RadioPaletteConfig> for RadioPalette {
    type Error = PlatformError;

    fn try_from(config: &RadioPaletteConfig) -> Result<Self> {
        let kind = ControlKind::RadioButton;
        config.timings.validate(kind)?;
        if config.indicator_diameter < 4 {
            return Err(PlatformError::InvalidConfiguration(format!(
                "{kind} palette: indicator diameter {} is too small",
                config.indicator_diameter
            )));
        }
        Ok(Self {
            background: require(&config.background, kind, "background")?,
            default_colors: require(&config.default_colors, kind, "default_colors")?,
            hover_colors: require(&config.hover_colors, kind, "hover_colors")?,
            down_colors: require(&config.down_colors, kind, "down_colors")?,
            selected_colors: require(&config.selected_colors, kind, "selected_colors")?,
            selected_hover_colors: require(
                &config.selected_hover_colors,
                kind,
                "selected_hover_colors",
            )?,
            selected_down_colors: require(
                &config.selected_down_colors,
                kind,
                "selected_down_colors",
            )?,
            selected_flash_colors: require(
                &config.selected_flash_colors,
                kind,
                "selected_flash_colors",
            )?,
            dot_color: require(&config.dot_color, kind, "dot_color")?,
            text_color: require(&config.text_color, kind, "text_color")?,
            focus_color: require(&config.focus_color, kind, "focus_color")?,
            font: require(&config.font, kind, "font")?,
            indicator_diameter: config.indicator_diameter,
            timings: config.timings,
        })
    }
}

/// Indicator circle box: left-aligned and vertically centered in `bounds`.
fn indicator_origin(bounds: Rect, diameter: i32) -> Point {
    Point::new(0, (bounds.height() - diameter).max(0) / 2)
}

impl WidgetKind for RadioKind {
    type State = RadioState;
    type PaletteConfig = RadioPaletteConfig;
    type Palette = RadioPalette;
    type InstanceConfig = ();

    const KIND: ControlKind = ControlKind::RadioButton;

    fn build_palette(config: &RadioPaletteConfig) -> Result<RadioPalette> {
        RadioPalette::try_from(config)
    }

    fn validate_instance(_config: &()) -> Result<()> {
        Ok(())
    }

    fn channel_specs() -> &'static [ChannelSpec] {
        &CHANNELS
    }

    fn targets(palette: &RadioPalette, _config: &(), state: RadioState) -> Vec<f64> {
        let mut values = palette.colors(state).channel_targets().to_vec();
        values.push(if state.is_selected() { 1.0 } else { 0.0 });
        values
    }

    fn timing(palette: &RadioPalette, state: RadioState) -> TransitionTiming {
        palette
            .timings
            .for_transition(state == RadioState::SelectedFlash)
    }

    fn react(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<RadioState> {
        react_radio(flags, event)
    }

    fn paint(frame: &PaintFrame<'_, Self>, canvas: &mut Canvas<'_>) -> Result<()> {
        let palette = frame.palette;
        let bounds = frame.bounds;
        let diameter = palette.indicator_diameter;
        canvas.fill_rect(bounds, &palette.background.into())?;

        let origin = indicator_origin(bounds, diameter);
        let ring_fill = ColorValue::from(frame.sample.color_at(RING_FILL));
        let ring_border = ColorValue::from(frame.sample.color_at(RING_BORDER));
        canvas.fill_ellipse(bounds, diameter, origin, &ring_fill, Some(&ring_border))?;

        let dot_opacity = frame.sample.opacity_at(DOT_OPACITY);
        if dot_opacity > 0.0 {
            let dot = diameter / 2;
            let inset = (diameter - dot) / 2;
            let dot_color = ColorValue::from(palette.dot_color).with_alpha(dot_opacity);
            canvas.fill_ellipse(
                bounds,
                dot,
                Point::new(origin.x + inset, origin.y + inset),
                &dot_color,
                None,
            )?;
        }

        if !frame.text.is_empty() {
            let label = Rect::new(
                bounds.left + diameter + LABEL_GAP,
                bounds.top,
                bounds.right,
                bounds.bottom,
            );
            canvas.draw_text(
                label,
                frame.text,
                &palette.text_color.into(),
                TextAlignment::Left,
                Some(&palette.font),
            )?;
        }

        if frame.flags.focused {
            let ring = bounds.inset(FOCUS_RING_INSET, FOCUS_RING_INSET);
            canvas.draw_round_rect(ring, diameter / 2, 1, &palette.focus_color.into())?;
        }
        Ok(())
    }
}

impl AnimatedWidget<RadioKind> {
    pub fn is_selected(&self) -> bool {
        self.flags().selected
    }

    pub fn group_id(&self) -> Option<WidgetId> {
        self.membership().map(|m| m.id)
    }

    /*
     * Sets the selection flag and animates to the matching state, keeping the
     * hover/pressed flags. Does nothing when both the flag and the visual state
     * already agree with `selected`. If the transition fails the flag follows
     * whatever state was actually committed.
     */
    pub fn update_selection_state(&mut self, selected: bool) -> Result<()> {
        let flags = self.flags();
        if flags.selected == selected && self.state().is_selected() == selected {
            log::trace!(
                "RadioButton: {} already {}",
                self.handle(),
                if selected { "selected" } else { "deselected" }
            );
            return Ok(());
        }
        self.flags_mut().selected = selected;
        let next = RadioState::for_interaction(selected, flags.hovered, flags.pressed);
        if let Err(e) = self.transition_to(next) {
            self.flags_mut().selected = self.state().is_selected();
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WindowHandle;
    use crate::widgets::interceptor::WidgetMessage;
    use crate::widgets::state::Key;
    use crate::widgets::test_support::{DrawOp, FaultPoint, Fixture, RecordingDrawing};

    const HANDLE: WindowHandle = WindowHandle(0x200);

    fn attach_radio(fixture: &Fixture) -> std::rc::Rc<std::cell::RefCell<RadioButton>> {
        AnimatedWidget::attach(
            &fixture.radio_context(),
            fixture.host.clone(),
            &*fixture.registry,
            HANDLE,
            (),
        )
        .unwrap()
    }

    #[test]
    fn selecting_fades_the_dot_in() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        radio.borrow_mut().update_selection_state(true).unwrap();
        assert_eq!(radio.borrow().state(), RadioState::Selected);
        fixture.run_until_idle(&radio);
        let sample = radio.borrow().sample_channels().unwrap();
        assert_eq!(sample.opacity_at(DOT_OPACITY), 1.0);

        let mut drawing = RecordingDrawing::new();
        radio.borrow().paint(&mut drawing).unwrap();
        let ellipses = drawing
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Ellipse { .. }))
            .count();
        assert_eq!(ellipses, 2);
    }

    #[test]
    fn unchanged_selection_schedules_nothing() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        radio.borrow_mut().update_selection_state(false).unwrap();
        assert_eq!(fixture.clock.schedules.get(), 0);
        radio.borrow_mut().update_selection_state(true).unwrap();
        radio.borrow_mut().update_selection_state(true).unwrap();
        assert_eq!(fixture.clock.schedules.get(), 1);
    }

    #[test]
    fn selection_keeps_hover() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        radio.borrow_mut().update_selection_state(true).unwrap();
        assert_eq!(radio.borrow().state(), RadioState::SelectedHover);
        radio.borrow_mut().update_selection_state(false).unwrap();
        assert_eq!(radio.borrow().state(), RadioState::Hover);
    }

    #[test]
    fn failed_selection_restores_the_flag() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        fixture.clock.fail_at(FaultPoint::Schedule);
        assert!(radio.borrow_mut().update_selection_state(true).is_err());
        assert!(!radio.borrow().is_selected());
        assert_eq!(radio.borrow().state(), RadioState::Default);
    }

    #[test]
    fn refused_timer_keeps_flag_and_state_together() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        fixture.host.refuse_timers.set(true);
        assert!(radio.borrow_mut().update_selection_state(true).is_err());
        assert_eq!(radio.borrow().state(), RadioState::Selected);
        assert!(radio.borrow().is_selected());
        assert!(!radio.borrow().is_timer_armed());
    }

    #[test]
    fn activation_flash_settles_back_on_selected() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        let palette = fixture.radio_context().palette().unwrap().clone();
        radio.borrow_mut().update_selection_state(true).unwrap();
        fixture.run_until_idle(&radio);

        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::KeyDown(Key::Space)));
        assert!(radio.borrow().is_timer_armed());
        fixture.run_until_idle(&radio);

        let sample = radio.borrow().sample_channels().unwrap();
        assert_eq!(sample.color_at(RING_FILL), palette.selected_colors.fill);
        assert_eq!(sample.color_at(RING_BORDER), palette.selected_colors.border);
        assert_eq!(sample.opacity_at(DOT_OPACITY), 1.0);
        assert!(!radio.borrow().is_timer_armed());
        assert_eq!(radio.borrow().state(), RadioState::Selected);
        assert!(radio.borrow().is_selected());
    }

    #[test]
    fn unselected_radio_paints_no_dot() {
        let fixture = Fixture::new();
        let radio = attach_radio(&fixture);
        fixture.host.set_text("Option");
        let mut drawing = RecordingDrawing::new();
        radio.borrow().paint(&mut drawing).unwrap();
        let ellipses = drawing
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Ellipse { .. }))
            .count();
        assert_eq!(ellipses, 1);
        let palette = fixture.radio_context().palette().unwrap().clone();
        let label_left = fixture.host.client_rect.left + palette.indicator_diameter + LABEL_GAP;
        assert!(drawing.ops.iter().any(|op| matches!(
            op,
            DrawOp::Text { rect, alignment: TextAlignment::Left, .. } if rect.left == label_left
        )));
    }

    #[test]
    fn tiny_indicator_is_rejected() {
        let config = RadioPaletteConfig {
            indicator_diameter: 2,
            ..RadioPaletteConfig::dark()
        };
        assert!(RadioPalette::try_from(&config).is_err());
    }
}
