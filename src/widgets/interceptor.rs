/*
 * Routing of window messages to widgets. A platform backend (the Win32
 * subclass procedure, or a test) translates native messages into
 * `WidgetMessage`s and hands them to `dispatch`, which borrows the widget only
 * for the duration of its handler. Work that touches other widgets, such as
 * deselecting radio siblings, is returned as a `FollowUp` and run after the
 * borrow has been released.
 */

use crate::error::{PlatformError, Result};
use crate::types::{TimerId, WidgetId, WindowHandle};
use crate::widgets::drawing::DrawingPrimitives;
use crate::widgets::radio_group::RadioGroupCoordinator;
use crate::widgets::state::InputEvent;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

pub enum WidgetMessage<'a> {
    Input(InputEvent),
    Timer(TimerId),
    Paint(&'a mut dyn DrawingPrimitives),
    EraseBackground,
    Destroy,
}

impl WidgetMessage<'_> {
    fn name(&self) -> &'static str {
        match self {
            WidgetMessage::Input(_) => "Input",
            WidgetMessage::Timer(_) => "Timer",
            WidgetMessage::Paint(_) => "Paint",
            WidgetMessage::EraseBackground => "EraseBackground",
            WidgetMessage::Destroy => "Destroy",
        }
    }
}

/// What the backend should do with the native message after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Pass the message on to the original window procedure.
    Forward,
    /// Forward, and ask the platform to report when the pointer leaves.
    ForwardAndTrackLeave,
    /// The widget handled the message; return this value.
    Consumed(isize),
}

#[derive(Debug)]
pub enum FollowUp {
    SelectInGroup {
        group: Weak<RadioGroupCoordinator>,
        member: WidgetId,
    },
}

#[derive(Debug, Default)]
pub struct InputResponse {
    pub track_pointer_leave: bool,
    pub follow_up: Option<FollowUp>,
}

pub trait MessageInterceptor {
    fn window(&self) -> WindowHandle;

    fn on_input(&mut self, event: InputEvent) -> InputResponse;

    /// Returns false when the timer does not belong to this widget.
    fn on_timer(&mut self, timer: TimerId) -> bool;

    fn on_paint(&mut self, draw: &mut dyn DrawingPrimitives) -> Result<()>;

    fn on_destroy(&mut self);
}

pub type SharedInterceptor = Rc<RefCell<dyn MessageInterceptor>>;

pub fn dispatch(interceptor: &SharedInterceptor, message: WidgetMessage<'_>) -> MessageOutcome {
    let (outcome, follow_up) = {
        let Ok(mut widget) = interceptor.try_borrow_mut() else {
            log::warn!(
                "dispatch: widget is busy, forwarding {} message",
                message.name()
            );
            return MessageOutcome::Forward;
        };
        match message {
            WidgetMessage::Input(event) => {
                let response = widget.on_input(event);
                let outcome = if response.track_pointer_leave {
                    MessageOutcome::ForwardAndTrackLeave
                } else {
                    MessageOutcome::Forward
                };
                (outcome, response.follow_up)
            }
            WidgetMessage::Timer(timer) => {
                if widget.on_timer(timer) {
                    (MessageOutcome::Consumed(0), None)
                } else {
                    (MessageOutcome::Forward, None)
                }
            }
            WidgetMessage::Paint(draw) => {
                if let Err(e) = widget.on_paint(draw) {
                    log::error!("dispatch: paint failed for {}: {e}", widget.window());
                }
                (MessageOutcome::Consumed(0), None)
            }
            // The offscreen paint covers the whole client area.
            WidgetMessage::EraseBackground => (MessageOutcome::Consumed(1), None),
            WidgetMessage::Destroy => {
                widget.on_destroy();
                (MessageOutcome::Forward, None)
            }
        }
    };
    if let Some(follow_up) = follow_up {
        run_follow_up(follow_up);
    }
    outcome
}

fn run_follow_up(follow_up: FollowUp) {
    match follow_up {
        FollowUp::SelectInGroup { group, member } => {
            let Some(group) = group.upgrade() else {
                log::debug!("dispatch: radio group of {member:?} is gone");
                return;
            };
            if let Err(e) = group.select(member) {
                log::error!("dispatch: selecting {member:?} in its group failed: {e}");
            }
        }
    }
}

/// Associates windows with the interceptor handling their messages.
pub trait InterceptorRegistry {
    fn install(&self, handle: WindowHandle, interceptor: SharedInterceptor) -> Result<()>;

    fn uninstall(&self, handle: WindowHandle) -> Result<()>;

    fn interceptor_for(&self, handle: WindowHandle) -> Option<SharedInterceptor>;

    fn is_intercepted(&self, handle: WindowHandle) -> bool {
        self.interceptor_for(handle).is_some()
    }
}

/*
 * Registry without a native hook: messages are delivered explicitly through
 * `deliver`. Used by headless hosts and by the test suite.
 */
#[derive(Default)]
pub struct LocalInterceptorRegistry {
    entries: RefCell<HashMap<WindowHandle, SharedInterceptor>>,
}

impl LocalInterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Dispatches `message` to the interceptor of `handle`, if any. A
    /// `Destroy` message also removes the registration.
    pub fn deliver(
        &self,
        handle: WindowHandle,
        message: WidgetMessage<'_>,
    ) -> Option<MessageOutcome> {
        let interceptor = if matches!(message, WidgetMessage::Destroy) {
            self.entries.borrow_mut().remove(&handle)
        } else {
            self.entries.borrow().get(&handle).cloned()
        };
        interceptor.map(|interceptor| dispatch(&interceptor, message))
    }
}

impl InterceptorRegistry for LocalInterceptorRegistry {
    fn install(&self, handle: WindowHandle, interceptor: SharedInterceptor) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&handle) {
            return Err(PlatformError::AlreadyInitialized(format!(
                "window {handle} already has an interceptor"
            )));
        }
        entries.insert(handle, interceptor);
        Ok(())
    }

    fn uninstall(&self, handle: WindowHandle) -> Result<()> {
        self.entries
            .borrow_mut()
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| {
                PlatformError::InvalidHandle(format!("window {handle} has no interceptor"))
            })
    }

    fn interceptor_for(&self, handle: WindowHandle) -> Option<SharedInterceptor> {
        self.entries.borrow().get(&handle).cloned()
    }
}
