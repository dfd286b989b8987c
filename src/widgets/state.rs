/*
 * Visual states and the input-driven state machines of the owner-drawn
 * widgets. The functions here are pure: they update `InteractionFlags` and say
 * which state the widget should animate toward, leaving scheduling to
 * `AnimatedWidget`.
 */

use std::fmt::Debug;
use std::hash::Hash;

pub trait VisualState: Copy + Eq + Hash + Debug + 'static {
    const DEFAULT: Self;

    /// The state a transient state falls back to once its animation completes.
    fn settled(self) -> Self;

    fn is_transient(self) -> bool {
        self.settled() != self
    }
}

/// States of standard and image buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Default,
    Hover,
    Down,
    Flash,
}

impl VisualState for ButtonState {
    const DEFAULT: Self = ButtonState::Default;

    fn settled(self) -> Self {
        match self {
            ButtonState::Flash => ButtonState::Default,
            other => other,
        }
    }
}

/// States of radio buttons: the button states crossed with selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RadioState {
    #[default]
    Default,
    Hover,
    Down,
    Selected,
    SelectedHover,
    SelectedDown,
    SelectedFlash,
}

impl RadioState {
    pub fn is_selected(self) -> bool {
        matches!(
            self,
            RadioState::Selected
                | RadioState::SelectedHover
                | RadioState::SelectedDown
                | RadioState::SelectedFlash
        )
    }

    /// Resting state for a combination of selection and pointer flags.
    pub fn for_interaction(selected: bool, hovered: bool, pressed: bool) -> Self {
        match (selected, pressed, hovered) {
            (false, true, _) => RadioState::Down,
            (false, false, true) => RadioState::Hover,
            (false, false, false) => RadioState::Default,
            (true, true, _) => RadioState::SelectedDown,
            (true, false, true) => RadioState::SelectedHover,
            (true, false, false) => RadioState::Selected,
        }
    }
}

impl VisualState for RadioState {
    const DEFAULT: Self = RadioState::Default;

    fn settled(self) -> Self {
        match self {
            RadioState::SelectedFlash => RadioState::Selected,
            other => other,
        }
    }
}

/// Transient interaction flags tracked per widget instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFlags {
    pub hovered: bool,
    pub pressed: bool,
    pub selected: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Other(u32),
}

impl Key {
    pub fn is_activation(self) -> bool {
        matches!(self, Key::Space | Key::Enter)
    }
}

/// Input notifications the message interceptor forwards to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The pointer moved inside the window; the first move counts as "enter".
    PointerMove,
    PointerLeave,
    PrimaryDown,
    PrimaryUp,
    KeyDown(Key),
    FocusGained,
    FocusLost,
}

/// What a widget should do in response to one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction<S> {
    pub next: Option<S>,
    /// The widget became selected and its group should deselect the others.
    pub select_self: bool,
    /// Only the static decoration changed (e.g. focus ring).
    pub repaint: bool,
    /// The platform should report when the pointer leaves the window.
    pub track_pointer_leave: bool,
}

impl<S> Reaction<S> {
    pub fn none() -> Self {
        Self {
            next: None,
            select_self: false,
            repaint: false,
            track_pointer_leave: false,
        }
    }

    fn to(state: S) -> Self {
        Self {
            next: Some(state),
            ..Self::none()
        }
    }

    fn repaint() -> Self {
        Self {
            repaint: true,
            ..Self::none()
        }
    }
}

fn apply_focus<S>(flags: &mut InteractionFlags, focused: bool) -> Reaction<S> {
    if flags.focused == focused {
        return Reaction::none();
    }
    flags.focused = focused;
    Reaction::repaint()
}

/*
 * State machine shared by standard and image buttons.
 *
 * pointer enters        (not hovered)              -> Hover
 * pointer leaves        (hovered)                  -> Default
 * primary down          (hovered, not pressed)     -> Down
 * primary up            (pressed, hovered)         -> Hover
 * primary up            (pressed, not hovered)     -> Default
 * activation key        (not hovered, not pressed) -> Flash
 */
pub fn react_button(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<ButtonState> {
    match event {
        InputEvent::PointerMove if !flags.hovered => {
            flags.hovered = true;
            Reaction {
                track_pointer_leave: true,
                ..Reaction::to(ButtonState::Hover)
            }
        }
        InputEvent::PointerLeave if flags.hovered => {
            flags.hovered = false;
            Reaction::to(ButtonState::Default)
        }
        InputEvent::PrimaryDown if flags.hovered && !flags.pressed => {
            flags.pressed = true;
            Reaction::to(ButtonState::Down)
        }
        InputEvent::PrimaryUp if flags.pressed => {
            flags.pressed = false;
            if flags.hovered {
                Reaction::to(ButtonState::Hover)
            } else {
                Reaction::to(ButtonState::Default)
            }
        }
        InputEvent::KeyDown(key) if key.is_activation() && !flags.hovered && !flags.pressed => {
            Reaction::to(ButtonState::Flash)
        }
        InputEvent::FocusGained => apply_focus(flags, true),
        InputEvent::FocusLost => apply_focus(flags, false),
        _ => Reaction::none(),
    }
}

/*
 * Radio buttons mirror the button machine on both sides of the selection axis.
 * A click or activation key on an unselected radio selects it and asks the
 * group to deselect its siblings; an activation key on a selected, idle radio
 * only pulses (SelectedFlash).
 */
pub fn react_radio(flags: &mut InteractionFlags, event: InputEvent) -> Reaction<RadioState> {
    match event {
        InputEvent::PointerMove if !flags.hovered => {
            flags.hovered = true;
            Reaction {
                track_pointer_leave: true,
                ..Reaction::to(RadioState::for_interaction(flags.selected, true, false))
            }
        }
        InputEvent::PointerLeave if flags.hovered => {
            flags.hovered = false;
            Reaction::to(RadioState::for_interaction(flags.selected, false, false))
        }
        InputEvent::PrimaryDown if flags.hovered && !flags.pressed => {
            flags.pressed = true;
            Reaction::to(RadioState::for_interaction(flags.selected, true, true))
        }
        InputEvent::PrimaryUp if flags.pressed => {
            flags.pressed = false;
            if flags.hovered && !flags.selected {
                flags.selected = true;
                Reaction {
                    select_self: true,
                    ..Reaction::to(RadioState::SelectedHover)
                }
            } else {
                Reaction::to(RadioState::for_interaction(
                    flags.selected,
                    flags.hovered,
                    false,
                ))
            }
        }
        InputEvent::KeyDown(key) if key.is_activation() && !flags.pressed => {
            if !flags.selected {
                flags.selected = true;
                Reaction {
                    select_self: true,
                    ..Reaction::to(RadioState::for_interaction(true, flags.hovered, false))
                }
            } else if !flags.hovered {
                Reaction::to(RadioState::SelectedFlash)
            } else {
                Reaction::none()
            }
        }
        InputEvent::FocusGained => apply_focus(flags, true),
        InputEvent::FocusLost => apply_focus(flags, false),
        _ => Reaction::none(),
    }
}
