/*
 * Installs widget interceptors on native windows with `SetWindowSubclass`.
 *
 * The subclass procedure looks the widget up in a thread-local table keyed by
 * HWND, translates the native message into a `WidgetMessage` and hands it to
 * `dispatch`. Anything the widget does not consume continues to the original
 * window procedure through `DefSubclassProc`. The table entry is dropped on
 * WM_NCDESTROY, the last message a window receives.
 */

use crate::controls::drawing_handler::GdiDrawing;
use crate::controls::window_host::{handle_of, hwnd_of};
use crate::error::{PlatformError, Result as PlatformResult};
use crate::types::{TimerId, WindowHandle};
use crate::widgets::interceptor::{
    InterceptorRegistry, MessageOutcome, SharedInterceptor, WidgetMessage, dispatch,
};
use crate::widgets::state::{InputEvent, Key};

use std::cell::RefCell;
use std::collections::HashMap;

use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT, WPARAM},
    Graphics::Gdi::{BeginPaint, EndPaint, PAINTSTRUCT},
    UI::{
        Input::KeyboardAndMouse::{TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent, VK_RETURN, VK_SPACE},
        Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass},
        WindowsAndMessaging::{
            WM_ERASEBKGND, WM_KEYDOWN, WM_KILLFOCUS, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
            WM_NCDESTROY, WM_PAINT, WM_SETFOCUS, WM_TIMER,
        },
    },
};

// WM_MOUSELEAVE is not exported by windows-rs; define the constant directly.
const WM_MOUSELEAVE: u32 = 0x02A3;

/// Subclass id passed to `SetWindowSubclass`; one widget per window.
const WIDGET_SUBCLASS_ID: usize = 0x474C_4E54;

thread_local! {
    static INTERCEPTED_WINDOWS: RefCell<HashMap<WindowHandle, SharedInterceptor>> =
        RefCell::new(HashMap::new());
}

fn lookup(handle: WindowHandle) -> Option<SharedInterceptor> {
    INTERCEPTED_WINDOWS.with(|table| table.borrow().get(&handle).cloned())
}

fn forget(handle: WindowHandle) -> Option<SharedInterceptor> {
    INTERCEPTED_WINDOWS.with(|table| table.borrow_mut().remove(&handle))
}

/*
 * Native messages the widgets care about, before any borrowed paint state is
 * attached. Kept separate from `WidgetMessage` so that the translation can be
 * tested without a window.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeMessage {
    Input(InputEvent),
    Timer(TimerId),
    Paint,
    EraseBackground,
    Destroy,
}

pub(crate) fn translate_message(msg: u32, wparam: usize) -> Option<NativeMessage> {
    let message = match msg {
        WM_MOUSEMOVE => NativeMessage::Input(InputEvent::PointerMove),
        WM_MOUSELEAVE => NativeMessage::Input(InputEvent::PointerLeave),
        WM_LBUTTONDOWN => NativeMessage::Input(InputEvent::PrimaryDown),
        WM_LBUTTONUP => NativeMessage::Input(InputEvent::PrimaryUp),
        WM_KEYDOWN => NativeMessage::Input(InputEvent::KeyDown(translate_key(wparam))),
        WM_SETFOCUS => NativeMessage::Input(InputEvent::FocusGained),
        WM_KILLFOCUS => NativeMessage::Input(InputEvent::FocusLost),
        WM_TIMER => NativeMessage::Timer(TimerId(wparam)),
        WM_PAINT => NativeMessage::Paint,
        WM_ERASEBKGND => NativeMessage::EraseBackground,
        WM_NCDESTROY => NativeMessage::Destroy,
        _ => return None,
    };
    Some(message)
}

fn translate_key(virtual_key: usize) -> Key {
    match virtual_key {
        k if k == VK_SPACE.0 as usize => Key::Space,
        k if k == VK_RETURN.0 as usize => Key::Enter,
        k => Key::Other(k as u32),
    }
}

fn track_pointer_leave(hwnd: HWND) {
    let mut tme = TRACKMOUSEEVENT {
        cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
        dwFlags: TME_LEAVE,
        hwndTrack: hwnd,
        dwHoverTime: 0,
    };
    if let Err(e) = unsafe { TrackMouseEvent(&mut tme) } {
        log::warn!("SubclassHandler: TrackMouseEvent failed for {hwnd:?}: {e}");
    }
}

fn paint(hwnd: HWND, interceptor: &SharedInterceptor) -> LRESULT {
    let mut ps = PAINTSTRUCT::default();
    let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
    if hdc.is_invalid() {
        log::error!("SubclassHandler: BeginPaint failed for {hwnd:?}");
        return LRESULT(0);
    }
    let outcome = {
        let mut drawing = GdiDrawing::new(hdc);
        dispatch(interceptor, WidgetMessage::Paint(&mut drawing))
    };
    let _ = unsafe { EndPaint(hwnd, &ps) };
    match outcome {
        MessageOutcome::Consumed(value) => LRESULT(value),
        _ => LRESULT(0),
    }
}

unsafe extern "system" fn widget_subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _subclass_id: usize,
    _ref_data: usize,
) -> LRESULT {
    let handle = handle_of(hwnd);
    let Some(message) = translate_message(msg, wparam.0) else {
        return unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) };
    };

    if message == NativeMessage::Destroy {
        if let Some(interceptor) = forget(handle) {
            log::debug!("SubclassHandler: {handle} destroyed, detaching widget");
            dispatch(&interceptor, WidgetMessage::Destroy);
        }
        let _ = unsafe {
            RemoveWindowSubclass(hwnd, Some(widget_subclass_proc), WIDGET_SUBCLASS_ID)
        };
        return unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) };
    }

    let Some(interceptor) = lookup(handle) else {
        return unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) };
    };

    let outcome = match message {
        NativeMessage::Paint => return paint(hwnd, &interceptor),
        NativeMessage::Input(event) => dispatch(&interceptor, WidgetMessage::Input(event)),
        NativeMessage::Timer(timer) => dispatch(&interceptor, WidgetMessage::Timer(timer)),
        NativeMessage::EraseBackground => dispatch(&interceptor, WidgetMessage::EraseBackground),
        NativeMessage::Destroy => MessageOutcome::Forward,
    };

    match outcome {
        MessageOutcome::Consumed(value) => LRESULT(value),
        MessageOutcome::ForwardAndTrackLeave => {
            track_pointer_leave(hwnd);
            unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
        }
        MessageOutcome::Forward => unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) },
    }
}

/// `InterceptorRegistry` backed by comctl32 window subclassing.
#[derive(Debug, Default)]
pub struct Win32SubclassRegistry;

impl Win32SubclassRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl InterceptorRegistry for Win32SubclassRegistry {
    fn install(&self, handle: WindowHandle, interceptor: SharedInterceptor) -> PlatformResult<()> {
        if lookup(handle).is_some() {
            return Err(PlatformError::AlreadyInitialized(format!(
                "window {handle} already has an interceptor"
            )));
        }
        // The table entry must exist before the first subclassed message arrives.
        INTERCEPTED_WINDOWS.with(|table| table.borrow_mut().insert(handle, interceptor));
        let installed = unsafe {
            SetWindowSubclass(
                hwnd_of(handle),
                Some(widget_subclass_proc),
                WIDGET_SUBCLASS_ID,
                0,
            )
        };
        if !installed.as_bool() {
            forget(handle);
            log::error!("SubclassHandler: SetWindowSubclass failed for {handle}");
            return Err(PlatformError::OperationFailed(format!(
                "SetWindowSubclass failed for {handle}"
            )));
        }
        log::debug!("SubclassHandler: installed widget subclass on {handle}");
        Ok(())
    }

    fn uninstall(&self, handle: WindowHandle) -> PlatformResult<()> {
        if forget(handle).is_none() {
            return Err(PlatformError::InvalidHandle(format!(
                "window {handle} has no interceptor"
            )));
        }
        let removed = unsafe {
            RemoveWindowSubclass(
                hwnd_of(handle),
                Some(widget_subclass_proc),
                WIDGET_SUBCLASS_ID,
            )
        };
        if !removed.as_bool() {
            log::warn!("SubclassHandler: RemoveWindowSubclass failed for {handle}");
        }
        Ok(())
    }

    fn interceptor_for(&self, handle: WindowHandle) -> Option<SharedInterceptor> {
        lookup(handle)
    }
}
