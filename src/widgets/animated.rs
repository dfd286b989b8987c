/*
 * The animated widget core shared by every owner-drawn control.
 *
 * A widget owns one clock variable per animated channel. Input events run
 * through the kind's state machine; a state change schedules one storyboard
 * that moves every channel toward the new state's palette values (and, for a
 * flash, back again) and arms a repaint timer. Each timer tick advances the
 * clock service and invalidates the window, and the timer is disarmed as soon
 * as the service reports idle.
 */

use crate::animation::Storyboard;
use crate::error::{PlatformError, Result};
use crate::types::{TimerId, WidgetId, WindowHandle};
use crate::widgets::channel::{ChannelSample, ChannelSet};
use crate::widgets::context::{AnimationServices, SharedWidgetContext};
use crate::widgets::drawing::{Canvas, DrawingPrimitives};
use crate::widgets::host::WindowHost;
use crate::widgets::interceptor::{
    FollowUp, InputResponse, InterceptorRegistry, MessageInterceptor, SharedInterceptor,
};
use crate::widgets::kind::{PaintFrame, WidgetKind};
use crate::widgets::radio_group::RadioGroupCoordinator;
use crate::widgets::state::{InputEvent, InteractionFlags, VisualState};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Timer id used for animation repaints on every widget window.
pub const ANIMATION_TIMER_ID: TimerId = TimerId(0x4711);
/// Repaint cadence while an animation is running (about 60 fps).
pub const REPAINT_INTERVAL: Duration = Duration::from_millis(16);
/// Inset of the focus ring from the client rectangle.
pub const FOCUS_RING_INSET: i32 = 3;

/// A widget's place in a radio group.
#[derive(Debug, Clone)]
pub struct GroupMembership {
    pub(crate) group: Weak<RadioGroupCoordinator>,
    pub(crate) id: WidgetId,
}

pub struct AnimatedWidget<K: WidgetKind> {
    handle: WindowHandle,
    context: Rc<SharedWidgetContext<K>>,
    host: Rc<dyn WindowHost>,
    config: K::InstanceConfig,
    channels: ChannelSet,
    state: K::State,
    flags: InteractionFlags,
    timer_armed: bool,
    membership: Option<GroupMembership>,
}

impl<K: WidgetKind> AnimatedWidget<K> {
    /*
     * Creates the widget's channels at the Default palette values and installs
     * its message interceptor on `handle`. Fails without creating anything if
     * the kind's context is not ready or the handle or config is invalid; if a
     * later step fails, the channels already created are released.
     */
    pub fn attach(
        context: &Rc<SharedWidgetContext<K>>,
        host: Rc<dyn WindowHost>,
        registry: &dyn InterceptorRegistry,
        handle: WindowHandle,
        config: K::InstanceConfig,
    ) -> Result<Rc<RefCell<Self>>> {
        if handle.is_invalid() {
            log::error!("{}: attach called with an invalid window handle", K::KIND);
            return Err(PlatformError::InvalidHandle(format!(
                "cannot attach {} to a null window",
                K::KIND
            )));
        }
        if !context.is_ready() {
            log::error!(
                "{}: attach to {handle} before services and palette were configured",
                K::KIND
            );
            return Err(PlatformError::NotReady(format!(
                "{} context is not configured",
                K::KIND
            )));
        }
        K::validate_instance(&config).inspect_err(|e| {
            log::error!("{}: rejected instance config for {handle}: {e}", K::KIND);
        })?;
        if registry.is_intercepted(handle) {
            return Err(PlatformError::AlreadyInitialized(format!(
                "window {handle} already hosts a widget"
            )));
        }

        let services = context.services()?;
        let palette = context.palette()?;
        let initial = K::targets(palette, &config, K::State::DEFAULT);
        let channels = ChannelSet::create(services.clock.clone(), K::channel_specs(), &initial)
            .inspect_err(|e| {
                log::error!("{}: creating channels for {handle} failed: {e}", K::KIND);
            })?;

        let widget = Rc::new(RefCell::new(Self {
            handle,
            context: Rc::clone(context),
            host,
            config,
            channels,
            state: K::State::DEFAULT,
            flags: InteractionFlags::default(),
            timer_armed: false,
            membership: None,
        }));
        let interceptor: SharedInterceptor = widget.clone();
        registry.install(handle, interceptor).inspect_err(|e| {
            log::error!("{}: installing interceptor on {handle} failed: {e}", K::KIND);
        })?;
        log::debug!("{}: attached to {handle}", K::KIND);
        Ok(widget)
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn state(&self) -> K::State {
        self.state
    }

    pub fn flags(&self) -> InteractionFlags {
        self.flags
    }

    pub fn config(&self) -> &K::InstanceConfig {
        &self.config
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_channels(&self) -> Result<ChannelSample> {
        self.channels.sample()
    }

    pub(crate) fn flags_mut(&mut self) -> &mut InteractionFlags {
        &mut self.flags
    }

    pub(crate) fn membership(&self) -> Option<&GroupMembership> {
        self.membership.as_ref()
    }

    pub(crate) fn set_membership(&mut self, membership: Option<GroupMembership>) {
        self.membership = membership;
    }

    /*
     * Animates every channel toward `target`. A transient target gets a second
     * group of transitions back to its settled state, and the settled state is
     * what gets recorded as current. If the storyboard cannot be committed
     * nothing is scheduled and the current state is unchanged. Once it is
     * committed the state is recorded even if the repaint timer then fails to
     * arm.
     */
    pub fn transition_to(&mut self, target: K::State) -> Result<()> {
        if let Err(e) = self.commit_storyboard(target) {
            log::error!(
                "{}: transition of {} to {target:?} failed: {e}",
                K::KIND,
                self.handle
            );
            return Err(e);
        }
        log::trace!(
            "{}: {} {:?} -> {target:?}",
            K::KIND,
            self.handle,
            self.state
        );
        self.state = target.settled();
        self.arm_timer().inspect_err(|e| {
            log::error!(
                "{}: {} committed {target:?} but the repaint timer could not be armed: {e}",
                K::KIND,
                self.handle
            );
        })
    }

    fn commit_storyboard(&self, target: K::State) -> Result<()> {
        let services = self.context.services()?;
        let palette = self.context.palette()?;

        let storyboard = self.build_storyboard(services, palette, target)?;
        let now = services.clock.now()?;
        services.clock.schedule(storyboard, now)
    }

    fn build_storyboard(
        &self,
        services: &AnimationServices,
        palette: &K::Palette,
        target: K::State,
    ) -> Result<Storyboard> {
        let timing = K::timing(palette, target);
        let mut storyboard = Storyboard::new();

        let values = self.targets_for(palette, target)?;
        for (channel, value) in self.channels.iter().zip(values) {
            let transition = services.transitions.accelerate_decelerate(
                timing.duration,
                value,
                timing.acceleration_ratio,
                timing.deceleration_ratio,
            )?;
            storyboard.add_transition(channel.variable(), transition);
        }

        if target.is_transient() {
            let keyframe = storyboard.add_keyframe_at_end();
            let values = self.targets_for(palette, target.settled())?;
            for (channel, value) in self.channels.iter().zip(values) {
                let transition = services.transitions.accelerate_decelerate(
                    timing.duration,
                    value,
                    timing.acceleration_ratio,
                    timing.deceleration_ratio,
                )?;
                storyboard.add_transition_at_keyframe(channel.variable(), transition, keyframe)?;
            }
        }
        Ok(storyboard)
    }

    fn targets_for(&self, palette: &K::Palette, state: K::State) -> Result<Vec<f64>> {
        let values = K::targets(palette, &self.config, state);
        if values.len() != self.channels.len() {
            return Err(PlatformError::OperationFailed(format!(
                "{} produced {} targets for {} channels",
                K::KIND,
                values.len(),
                self.channels.len()
            )));
        }
        Ok(values)
    }

    fn arm_timer(&mut self) -> Result<()> {
        self.host
            .set_timer(self.handle, ANIMATION_TIMER_ID, REPAINT_INTERVAL)?;
        self.timer_armed = true;
        Ok(())
    }

    fn disarm_timer(&mut self) {
        if !self.timer_armed {
            return;
        }
        self.timer_armed = false;
        if let Err(e) = self.host.kill_timer(self.handle, ANIMATION_TIMER_ID) {
            log::warn!("{}: failed to kill animation timer on {}: {e}", K::KIND, self.handle);
        }
    }

    /*
     * One repaint tick: advance the clock service to now, request a repaint,
     * and disarm the timer once nothing is animating. Returns whether the
     * animation is still running. Any failure disarms the timer.
     */
    pub fn on_animation_tick(&mut self) -> Result<bool> {
        match self.advance_animation() {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.disarm_timer();
                Ok(false)
            }
            Err(e) => {
                log::error!("{}: animation tick on {} failed: {e}", K::KIND, self.handle);
                self.disarm_timer();
                Err(e)
            }
        }
    }

    fn advance_animation(&self) -> Result<bool> {
        let services = self.context.services()?;
        let now = services.clock.now()?;
        services.clock.update(now)?;
        self.host.invalidate(self.handle)?;
        Ok(!services.clock.is_idle()?)
    }

    /// Paints the current channel values into an offscreen surface and copies
    /// it to the window.
    pub fn paint(&self, draw: &mut dyn DrawingPrimitives) -> Result<()> {
        let palette = self.context.palette()?;
        let sample = self.channels.sample()?;
        let bounds = self.host.client_rect(self.handle)?;
        let text = self.host.window_text(self.handle).unwrap_or_else(|e| {
            log::warn!("{}: reading text of {} failed: {e}", K::KIND, self.handle);
            String::new()
        });
        let frame = PaintFrame::<K> {
            bounds,
            sample: &sample,
            palette,
            config: &self.config,
            state: self.state,
            flags: self.flags,
            text: &text,
        };
        let mut canvas = Canvas::acquire(draw, bounds)?;
        K::paint(&frame, &mut canvas)?;
        canvas.present()
    }

    pub fn handle_input(&mut self, event: InputEvent) -> InputResponse {
        let before = self.flags;
        let reaction = K::react(&mut self.flags, event);
        let mut response = InputResponse {
            track_pointer_leave: reaction.track_pointer_leave,
            follow_up: None,
        };
        if reaction.select_self {
            response.follow_up = self.membership.as_ref().map(|m| FollowUp::SelectInGroup {
                group: m.group.clone(),
                member: m.id,
            });
        }
        if let Some(next) = reaction.next
            && (next != self.state || next.is_transient())
        {
            let previous = self.state;
            // Failures are logged by `transition_to`.
            if self.transition_to(next).is_err() && self.state == previous && reaction.select_self
            {
                // Nothing was committed, so the widget did not become selected.
                self.flags.selected = before.selected;
                response.follow_up = None;
            }
        }
        if reaction.repaint
            && let Err(e) = self.host.invalidate(self.handle)
        {
            log::warn!("{}: invalidating {} failed: {e}", K::KIND, self.handle);
        }
        response
    }
}

impl<K: WidgetKind> MessageInterceptor for AnimatedWidget<K> {
    fn window(&self) -> WindowHandle {
        self.handle
    }

    fn on_input(&mut self, event: InputEvent) -> InputResponse {
        self.handle_input(event)
    }

    fn on_timer(&mut self, timer: TimerId) -> bool {
        if timer != ANIMATION_TIMER_ID {
            return false;
        }
        let _ = self.on_animation_tick();
        true
    }

    fn on_paint(&mut self, draw: &mut dyn DrawingPrimitives) -> Result<()> {
        self.paint(draw)
    }

    fn on_destroy(&mut self) {
        log::debug!("{}: {} destroyed", K::KIND, self.handle);
        self.disarm_timer();
    }
}

impl<K: WidgetKind> Drop for AnimatedWidget<K> {
    fn drop(&mut self) {
        self.disarm_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styling_primitives::Color;
    use crate::widgets::button::{ButtonKind, ButtonPaletteConfig, StandardButton};
    use crate::widgets::interceptor::WidgetMessage;
    use crate::widgets::palette::AnimationTimings;
    use crate::widgets::state::{ButtonState, Key};
    use crate::widgets::test_support::{
        test_button_palette, DrawOp, FaultPoint, Fixture, RecordingDrawing,
    };

    const HANDLE: WindowHandle = WindowHandle(0x100);

    fn attach_button(fixture: &Fixture) -> Rc<RefCell<StandardButton>> {
        let context = fixture.button_context();
        AnimatedWidget::attach(&context, fixture.host.clone(), &*fixture.registry, HANDLE, ())
            .expect("attach")
    }

    fn fill_of(button: &Rc<RefCell<StandardButton>>) -> Color {
        button.borrow().sample_channels().unwrap().color_at(0)
    }

    #[test]
    fn attach_starts_at_default_palette_values() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        let palette = test_button_palette();
        assert_eq!(button.borrow().state(), ButtonState::Default);
        assert_eq!(button.borrow().channel_count(), 6);
        assert_eq!(
            fill_of(&button),
            palette.default_colors.unwrap().fill
        );
        assert!(fixture.registry.is_intercepted(HANDLE));
        assert!(!button.borrow().is_timer_armed());
    }

    #[test]
    fn attach_before_configuration_creates_nothing() {
        let fixture = Fixture::new();
        let context = Rc::new(SharedWidgetContext::<ButtonKind>::new());
        context.initialize_shared_services(fixture.services()).unwrap();
        let result =
            AnimatedWidget::attach(&context, fixture.host.clone(), &*fixture.registry, HANDLE, ());
        assert!(matches!(result, Err(PlatformError::NotReady(_))));
        assert_eq!(fixture.clock.created.get(), 0);
        assert!(!fixture.registry.is_intercepted(HANDLE));
    }

    #[test]
    fn attach_to_null_window_fails() {
        let fixture = Fixture::new();
        let context = fixture.button_context();
        let result = AnimatedWidget::attach(
            &context,
            fixture.host.clone(),
            &*fixture.registry,
            WindowHandle::INVALID,
            (),
        );
        assert!(matches!(result, Err(PlatformError::InvalidHandle(_))));
        assert_eq!(fixture.clock.created.get(), 0);
    }

    #[test]
    fn failed_channel_creation_releases_what_was_created() {
        let fixture = Fixture::new();
        let context = fixture.button_context();
        fixture.clock.fail_at(FaultPoint::CreateVariable { after: 4 });
        let result =
            AnimatedWidget::attach(&context, fixture.host.clone(), &*fixture.registry, HANDLE, ());
        assert!(result.is_err());
        assert_eq!(fixture.clock.created.get(), 4);
        assert_eq!(fixture.clock.live_variables(), 0);
        assert!(!fixture.registry.is_intercepted(HANDLE));
    }

    #[test]
    fn hover_down_up_settles_on_hover_palette() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        let palette = test_button_palette();

        for event in [
            InputEvent::PointerMove,
            InputEvent::PrimaryDown,
            InputEvent::PrimaryUp,
        ] {
            fixture.registry.deliver(HANDLE, WidgetMessage::Input(event));
            fixture.advance_ms(48);
            fixture.tick(HANDLE);
        }
        assert_eq!(button.borrow().state(), ButtonState::Hover);
        fixture.run_until_idle(&button);

        assert!(!button.borrow().is_timer_armed());
        assert!(!fixture.host.is_timer_armed(HANDLE, ANIMATION_TIMER_ID));
        let sample = button.borrow().sample_channels().unwrap();
        let hover = palette.hover_colors.unwrap();
        assert_eq!(sample.color_at(0), hover.fill);
        assert_eq!(sample.color_at(3), hover.border);
    }

    #[test]
    fn timer_stays_armed_until_the_transition_completes() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture.set_time(1.0);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        assert!(fixture.host.is_timer_armed(HANDLE, ANIMATION_TIMER_ID));
        assert_eq!(
            fixture.host.timer_interval(HANDLE, ANIMATION_TIMER_ID),
            Some(REPAINT_INTERVAL)
        );

        fixture.set_time(1.0 + 0.016);
        fixture.tick(HANDLE);
        assert!(button.borrow().is_timer_armed());
        let midway = fill_of(&button);
        assert_ne!(midway, test_button_palette().hover_colors.unwrap().fill);

        fixture.set_time(1.5);
        fixture.tick(HANDLE);
        assert!(!button.borrow().is_timer_armed());
        assert!(!fixture.host.is_timer_armed(HANDLE, ANIMATION_TIMER_ID));
        assert!(fixture.host.invalidations.get() >= 2);
    }

    #[test]
    fn flash_returns_to_default_colors() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        let palette = test_button_palette();

        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::KeyDown(Key::Enter)));
        assert_eq!(button.borrow().state(), ButtonState::Default);

        // End of the first leg: the flash colors are showing.
        let leg = palette.timings.flash.as_secs_f64();
        fixture.set_time(leg);
        fixture.tick(HANDLE);
        assert_eq!(fill_of(&button), palette.flash_colors.unwrap().fill);
        assert!(button.borrow().is_timer_armed());

        fixture.set_time(leg * 2.0);
        fixture.tick(HANDLE);
        assert_eq!(fill_of(&button), palette.default_colors.unwrap().fill);
        assert!(!button.borrow().is_timer_armed());
    }

    #[test]
    fn flash_during_hover_exit_settles_on_default() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        let palette = test_button_palette();

        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        fixture.run_until_idle(&button);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerLeave));
        fixture.advance_ms(48);
        fixture.tick(HANDLE);
        assert!(button.borrow().is_timer_armed());

        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::KeyDown(Key::Space)));
        fixture.run_until_idle(&button);

        let default = palette.default_colors.unwrap();
        let sample = button.borrow().sample_channels().unwrap();
        assert_eq!(sample.color_at(0), default.fill);
        assert_eq!(sample.color_at(3), default.border);
        assert_eq!(button.borrow().state(), ButtonState::Default);
    }

    #[test]
    fn failed_schedule_keeps_the_previous_state() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture.clock.fail_at(FaultPoint::Schedule);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        assert_eq!(button.borrow().state(), ButtonState::Default);
        assert!(button.borrow().flags().hovered);
        assert!(!fixture.host.is_timer_armed(HANDLE, ANIMATION_TIMER_ID));
    }

    #[test]
    fn refused_timer_still_records_the_committed_state() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture.host.refuse_timers.set(true);
        assert!(button.borrow_mut().transition_to(ButtonState::Hover).is_err());
        assert_eq!(button.borrow().state(), ButtonState::Hover);
        assert!(!button.borrow().is_timer_armed());

        fixture.host.refuse_timers.set(false);
        button.borrow_mut().transition_to(ButtonState::Hover).unwrap();
        assert!(button.borrow().is_timer_armed());
        fixture.run_until_idle(&button);
        assert_eq!(fill_of(&button), test_button_palette().hover_colors.unwrap().fill);
    }

    #[test]
    fn failed_tick_disarms_the_timer() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        fixture.clock.fail_at(FaultPoint::Update);
        fixture.advance_ms(16);
        assert!(button.borrow_mut().on_animation_tick().is_err());
        assert!(!button.borrow().is_timer_armed());
    }

    #[test]
    fn foreign_timers_are_forwarded() {
        let fixture = Fixture::new();
        let _button = attach_button(&fixture);
        assert_eq!(
            fixture
                .registry
                .deliver(HANDLE, WidgetMessage::Timer(TimerId(1))),
            Some(crate::widgets::interceptor::MessageOutcome::Forward)
        );
    }

    #[test]
    fn paint_draws_through_one_presented_surface() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture.host.set_text("OK");
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::FocusGained));

        let mut drawing = RecordingDrawing::new();
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Paint(&mut drawing));
        assert_eq!(drawing.presented, 1);
        assert_eq!(drawing.open_surfaces(), 0);
        assert!(drawing
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text { text, .. } if text == "OK")));
        let focus_ring = fixture.host.client_rect.inset(FOCUS_RING_INSET, FOCUS_RING_INSET);
        assert!(drawing
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::RoundRectOutline { rect, .. } if *rect == focus_ring)));
        assert!(button.borrow().flags().focused);
    }

    #[test]
    fn failed_draw_discards_the_surface() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        let mut drawing = RecordingDrawing::failing_on("fill_round_rect");
        assert!(button.borrow().paint(&mut drawing).is_err());
        assert_eq!(drawing.presented, 0);
        assert_eq!(drawing.discarded, 1);
    }

    #[test]
    fn destroy_uninstalls_and_releases_channels() {
        let fixture = Fixture::new();
        let button = attach_button(&fixture);
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        fixture.registry.deliver(HANDLE, WidgetMessage::Destroy);
        assert!(!fixture.registry.is_intercepted(HANDLE));
        assert!(!fixture.host.is_timer_armed(HANDLE, ANIMATION_TIMER_ID));
        drop(button);
        assert_eq!(fixture.clock.live_variables(), 0);
    }

    #[test]
    fn slow_timings_come_from_the_palette() {
        let fixture = Fixture::new();
        let context = Rc::new(SharedWidgetContext::<ButtonKind>::new());
        context.initialize_shared_services(fixture.services()).unwrap();
        context
            .set_shared_palette(&ButtonPaletteConfig {
                timings: AnimationTimings {
                    hover_down: Duration::from_secs(2),
                    ..AnimationTimings::default()
                },
                ..ButtonPaletteConfig::dark()
            })
            .unwrap();
        let button =
            AnimatedWidget::attach(&context, fixture.host.clone(), &*fixture.registry, HANDLE, ())
                .unwrap();
        fixture
            .registry
            .deliver(HANDLE, WidgetMessage::Input(InputEvent::PointerMove));
        fixture.set_time(1.0);
        fixture.tick(HANDLE);
        assert!(button.borrow().is_timer_armed());
        fixture.set_time(2.0);
        fixture.tick(HANDLE);
        assert!(!button.borrow().is_timer_armed());
    }
}
