/*
 * Test doubles shared by the widget tests: a recording window host, a
 * recording drawing backend and a clock service with fault injection.
 */

use crate::animation::{
    AnimationClockService, ManagerStatus, ManualTimeSource, RoundingMode, Seconds,
    SoftwareAnimationManager, Storyboard, Transition, TransitionLibrary, VariableId,
};
use crate::error::{PlatformError, Result};
use crate::styling_primitives::{Color, ColorValue, FontDescription, ImageRef};
use crate::types::{Point, Rect, Size, TimerId, WindowHandle};
use crate::widgets::animated::{AnimatedWidget, ANIMATION_TIMER_ID};
use crate::widgets::button::{ButtonKind, ButtonPaletteConfig};
use crate::widgets::context::{AnimationServices, SharedWidgetContext};
use crate::widgets::drawing::{DrawingPrimitives, ImagePlacement, SurfaceId, TextAlignment};
use crate::widgets::host::WindowHost;
use crate::widgets::image_button::{ImageButtonKind, ImageButtonPaletteConfig};
use crate::widgets::interceptor::{LocalInterceptorRegistry, WidgetMessage};
use crate::widgets::kind::WidgetKind;
use crate::widgets::palette::AnimationTimings;
use crate::widgets::radio_button::{RadioKind, RadioPaletteConfig};

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

pub(crate) fn test_timings() -> AnimationTimings {
    AnimationTimings {
        hover_down: Duration::from_millis(160),
        flash: Duration::from_millis(96),
        ..AnimationTimings::default()
    }
}

pub(crate) fn test_button_palette() -> ButtonPaletteConfig {
    ButtonPaletteConfig {
        timings: test_timings(),
        ..ButtonPaletteConfig::dark()
    }
}

pub(crate) fn test_image() -> ImageRef {
    let size = Size::new(4, 2);
    ImageRef::from_bgra(size, vec![0xFFu8; 4 * 2 * 4]).expect("valid test image")
}

#[derive(Debug)]
pub(crate) struct RecordingHost {
    pub client_rect: Rect,
    pub invalidations: Cell<usize>,
    /// When set, `set_timer` fails.
    pub refuse_timers: Cell<bool>,
    timers: RefCell<HashMap<(WindowHandle, TimerId), Duration>>,
    text: RefCell<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            client_rect: Rect::new(0, 0, 120, 32),
            invalidations: Cell::new(0),
            refuse_timers: Cell::new(false),
            timers: RefCell::new(HashMap::new()),
            text: RefCell::new(String::new()),
        }
    }

    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    pub fn is_timer_armed(&self, handle: WindowHandle, timer: TimerId) -> bool {
        self.timers.borrow().contains_key(&(handle, timer))
    }

    pub fn timer_interval(&self, handle: WindowHandle, timer: TimerId) -> Option<Duration> {
        self.timers.borrow().get(&(handle, timer)).copied()
    }
}

impl WindowHost for RecordingHost {
    fn invalidate(&self, _handle: WindowHandle) -> Result<()> {
        self.invalidations.set(self.invalidations.get() + 1);
        Ok(())
    }

    fn set_timer(&self, handle: WindowHandle, timer: TimerId, interval: Duration) -> Result<()> {
        if self.refuse_timers.get() {
            return Err(PlatformError::OperationFailed("timer refused".to_string()));
        }
        self.timers.borrow_mut().insert((handle, timer), interval);
        Ok(())
    }

    fn kill_timer(&self, handle: WindowHandle, timer: TimerId) -> Result<()> {
        self.timers
            .borrow_mut()
            .remove(&(handle, timer))
            .map(|_| ())
            .ok_or_else(|| PlatformError::OperationFailed("timer was not armed".to_string()))
    }

    fn client_rect(&self, _handle: WindowHandle) -> Result<Rect> {
        Ok(self.client_rect)
    }

    fn window_text(&self, _handle: WindowHandle) -> Result<String> {
        Ok(self.text.borrow().clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FaultPoint {
    Now,
    /// Fails once `after` variables have been created.
    CreateVariable { after: usize },
    Schedule,
    Update,
}

/// `SoftwareAnimationManager` with call counters and an injectable failure.
pub(crate) struct InstrumentedClock {
    inner: SoftwareAnimationManager,
    fault: Cell<Option<FaultPoint>>,
    pub created: Cell<usize>,
    pub released: Cell<usize>,
    pub schedules: Cell<usize>,
}

impl InstrumentedClock {
    pub fn new(time: Rc<ManualTimeSource>) -> Self {
        Self {
            inner: SoftwareAnimationManager::new(time),
            fault: Cell::new(None),
            created: Cell::new(0),
            released: Cell::new(0),
            schedules: Cell::new(0),
        }
    }

    pub fn fail_at(&self, point: FaultPoint) {
        self.fault.set(Some(point));
    }

    pub fn clear_fault(&self) {
        self.fault.set(None);
    }

    pub fn live_variables(&self) -> usize {
        self.inner.variable_count()
    }

    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    fn check(&self, point: FaultPoint) -> Result<()> {
        let tripped = match (self.fault.get(), point) {
            (Some(FaultPoint::CreateVariable { after }), FaultPoint::CreateVariable { .. }) => {
                self.created.get() >= after
            }
            (Some(fault), point) => fault == point,
            (None, _) => false,
        };
        if tripped {
            Err(PlatformError::Animation(format!("injected failure at {point:?}")))
        } else {
            Ok(())
        }
    }
}

impl AnimationClockService for InstrumentedClock {
    fn now(&self) -> Result<Seconds> {
        self.check(FaultPoint::Now)?;
        self.inner.now()
    }

    fn create_variable(&self, initial: f64) -> Result<VariableId> {
        self.check(FaultPoint::CreateVariable { after: 0 })?;
        let variable = self.inner.create_variable(initial)?;
        self.created.set(self.created.get() + 1);
        Ok(variable)
    }

    fn set_bounds(&self, variable: VariableId, lower: f64, upper: f64) -> Result<()> {
        self.inner.set_bounds(variable, lower, upper)
    }

    fn set_rounding(&self, variable: VariableId, rounding: RoundingMode) -> Result<()> {
        self.inner.set_rounding(variable, rounding)
    }

    fn release_variable(&self, variable: VariableId) -> Result<()> {
        self.inner.release_variable(variable)?;
        self.released.set(self.released.get() + 1);
        Ok(())
    }

    fn schedule(&self, storyboard: Storyboard, at: Seconds) -> Result<()> {
        self.check(FaultPoint::Schedule)?;
        self.inner.schedule(storyboard, at)?;
        self.schedules.set(self.schedules.get() + 1);
        Ok(())
    }

    fn update(&self, now: Seconds) -> Result<ManagerStatus> {
        self.check(FaultPoint::Update)?;
        self.inner.update(now)
    }

    fn current_value(&self, variable: VariableId) -> Result<f64> {
        self.inner.current_value(variable)
    }

    fn is_idle(&self) -> Result<bool> {
        self.inner.is_idle()
    }

    fn is_shut_down(&self) -> bool {
        self.inner.is_shut_down()
    }
}

impl TransitionLibrary for InstrumentedClock {
    fn accelerate_decelerate(
        &self,
        duration: Duration,
        target: f64,
        acceleration_ratio: f64,
        deceleration_ratio: f64,
    ) -> Result<Transition> {
        self.inner
            .accelerate_decelerate(duration, target, acceleration_ratio, deceleration_ratio)
    }

    fn instantaneous(&self, target: f64) -> Result<Transition> {
        self.inner.instantaneous(target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    RoundRect {
        rect: Rect,
        fill: Color,
        border: Option<Color>,
    },
    RoundRectOutline {
        rect: Rect,
        color: Color,
    },
    Ellipse {
        rect: Rect,
        fill: ColorValue,
    },
    Text {
        rect: Rect,
        text: String,
        alignment: TextAlignment,
    },
    Image {
        rect: Rect,
        opacity: f32,
    },
}

/// Drawing backend that records operations instead of rendering them.
#[derive(Debug, Default)]
pub(crate) struct RecordingDrawing {
    pub ops: Vec<DrawOp>,
    pub presented: usize,
    pub discarded: usize,
    open: HashSet<SurfaceId>,
    next_surface: u32,
    fail_on: Option<&'static str>,
}

impl RecordingDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call to the named primitive fails.
    pub fn failing_on(primitive: &'static str) -> Self {
        Self {
            fail_on: Some(primitive),
            ..Self::default()
        }
    }

    pub fn open_surfaces(&self) -> usize {
        self.open.len()
    }

    fn draw(&mut self, primitive: &'static str, target: SurfaceId, op: DrawOp) -> Result<()> {
        if !self.open.contains(&target) {
            return Err(PlatformError::Drawing(format!(
                "{primitive} on unknown surface {target:?}"
            )));
        }
        if self.fail_on == Some(primitive) {
            return Err(PlatformError::Drawing(format!("injected {primitive} failure")));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl DrawingPrimitives for RecordingDrawing {
    fn begin_offscreen(&mut self, _bounds: Rect) -> Result<SurfaceId> {
        self.next_surface += 1;
        let surface = SurfaceId(self.next_surface);
        self.open.insert(surface);
        Ok(surface)
    }

    fn end_offscreen(&mut self, surface: SurfaceId, present: bool) -> Result<()> {
        if !self.open.remove(&surface) {
            return Err(PlatformError::Drawing(format!(
                "surface {surface:?} ended twice"
            )));
        }
        if present {
            self.presented += 1;
        } else {
            self.discarded += 1;
        }
        Ok(())
    }

    fn fill_rect(&mut self, target: SurfaceId, rect: Rect, color: &ColorValue) -> Result<()> {
        let op = DrawOp::FillRect {
            rect,
            color: color.color(),
        };
        self.draw("fill_rect", target, op)
    }

    fn fill_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        _radius: i32,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> Result<()> {
        let op = DrawOp::RoundRect {
            rect,
            fill: fill.color(),
            border: border.map(ColorValue::color),
        };
        self.draw("fill_round_rect", target, op)
    }

    fn draw_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        _radius: i32,
        _width: i32,
        color: &ColorValue,
    ) -> Result<()> {
        let op = DrawOp::RoundRectOutline {
            rect,
            color: color.color(),
        };
        self.draw("draw_round_rect", target, op)
    }

    fn fill_ellipse(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        diameter: i32,
        position: Point,
        fill: &ColorValue,
        _border: Option<&ColorValue>,
    ) -> Result<()> {
        let left = rect.left + position.x;
        let top = rect.top + position.y;
        let op = DrawOp::Ellipse {
            rect: Rect::new(left, top, left + diameter, top + diameter),
            fill: *fill,
        };
        self.draw("fill_ellipse", target, op)
    }

    fn draw_text(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        text: &str,
        _color: &ColorValue,
        alignment: TextAlignment,
        _font: Option<&FontDescription>,
    ) -> Result<()> {
        let op = DrawOp::Text {
            rect,
            text: text.to_string(),
            alignment,
        };
        self.draw("draw_text", target, op)
    }

    fn draw_image(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        _image: &ImageRef,
        opacity: f32,
        placement: ImagePlacement,
    ) -> Result<()> {
        let op = DrawOp::Image {
            rect: placement.resolve(rect),
            opacity,
        };
        self.draw("draw_image", target, op)
    }
}

/// A clock, host and registry with all three widget kinds configured.
pub(crate) struct Fixture {
    pub time: Rc<ManualTimeSource>,
    pub clock: Rc<InstrumentedClock>,
    pub host: Rc<RecordingHost>,
    pub registry: Rc<LocalInterceptorRegistry>,
    buttons: Rc<SharedWidgetContext<ButtonKind>>,
    image_buttons: Rc<SharedWidgetContext<ImageButtonKind>>,
    radio_buttons: Rc<SharedWidgetContext<RadioKind>>,
}

impl Fixture {
    pub fn new() -> Self {
        let time = Rc::new(ManualTimeSource::new());
        let clock = Rc::new(InstrumentedClock::new(time.clone()));
        let fixture = Self {
            time,
            clock,
            host: Rc::new(RecordingHost::new()),
            registry: Rc::new(LocalInterceptorRegistry::new()),
            buttons: Rc::new(SharedWidgetContext::new()),
            image_buttons: Rc::new(SharedWidgetContext::new()),
            radio_buttons: Rc::new(SharedWidgetContext::new()),
        };
        fixture
            .buttons
            .initialize_shared_services(fixture.services())
            .and_then(|_| fixture.buttons.set_shared_palette(&test_button_palette()))
            .expect("button context");
        fixture
            .image_buttons
            .initialize_shared_services(fixture.services())
            .and_then(|_| {
                fixture
                    .image_buttons
                    .set_shared_palette(&ImageButtonPaletteConfig {
                        timings: test_timings(),
                        ..ImageButtonPaletteConfig::dark()
                    })
            })
            .expect("image button context");
        fixture
            .radio_buttons
            .initialize_shared_services(fixture.services())
            .and_then(|_| {
                fixture.radio_buttons.set_shared_palette(&RadioPaletteConfig {
                    timings: test_timings(),
                    ..RadioPaletteConfig::dark()
                })
            })
            .expect("radio context");
        fixture
    }

    pub fn services(&self) -> AnimationServices {
        AnimationServices {
            clock: self.clock.clone(),
            transitions: self.clock.clone(),
        }
    }

    pub fn button_context(&self) -> Rc<SharedWidgetContext<ButtonKind>> {
        self.buttons.clone()
    }

    pub fn image_context(&self) -> Rc<SharedWidgetContext<ImageButtonKind>> {
        self.image_buttons.clone()
    }

    pub fn radio_context(&self) -> Rc<SharedWidgetContext<RadioKind>> {
        self.radio_buttons.clone()
    }

    pub fn set_time(&self, seconds: Seconds) {
        self.time.set(seconds);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.time.advance(Duration::from_millis(ms));
    }

    /// Delivers one animation timer message to `handle`.
    pub fn tick(&self, handle: WindowHandle) {
        self.registry
            .deliver(handle, WidgetMessage::Timer(ANIMATION_TIMER_ID));
    }

    /// Ticks every 16 ms until the widget disarms its timer.
    pub fn run_until_idle<K: WidgetKind>(&self, widget: &Rc<RefCell<AnimatedWidget<K>>>) {
        let handle = widget.borrow().handle();
        for _ in 0..1000 {
            if !widget.borrow().is_timer_armed() {
                return;
            }
            self.advance_ms(16);
            self.tick(handle);
        }
        panic!("animation on {handle} never went idle");
    }
}
