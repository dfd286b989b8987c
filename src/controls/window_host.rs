/*
 * `WindowHost` over the Win32 window API: repaint requests, the animation
 * timer and the two window properties the paint routines read.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::types::{Rect, TimerId, WindowHandle};
use crate::widgets::host::WindowHost;

use std::ffi::c_void;
use std::time::Duration;

use windows::Win32::{
    Foundation::{HWND, RECT},
    Graphics::Gdi::InvalidateRect,
    UI::WindowsAndMessaging::{
        GetClientRect, GetWindowTextLengthW, GetWindowTextW, KillTimer, SetTimer,
    },
};

pub(crate) fn hwnd_of(handle: WindowHandle) -> HWND {
    HWND(handle.raw() as *mut c_void)
}

pub(crate) fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowHost;

impl Win32WindowHost {
    pub fn new() -> Self {
        Self
    }
}

impl WindowHost for Win32WindowHost {
    fn invalidate(&self, handle: WindowHandle) -> PlatformResult<()> {
        // The offscreen paint covers the client area, so no erase is requested.
        if unsafe { InvalidateRect(Some(hwnd_of(handle)), None, false) }.as_bool() {
            Ok(())
        } else {
            Err(PlatformError::OperationFailed(format!(
                "InvalidateRect failed for {handle}"
            )))
        }
    }

    fn set_timer(&self, handle: WindowHandle, timer: TimerId, interval: Duration) -> PlatformResult<()> {
        let millis = interval.as_millis().clamp(1, u32::MAX as u128) as u32;
        let id = unsafe { SetTimer(Some(hwnd_of(handle)), timer.0, millis, None) };
        if id == 0 {
            log::error!("Win32WindowHost: SetTimer({:#x}) failed for {handle}", timer.0);
            return Err(PlatformError::OperationFailed(format!(
                "SetTimer failed for {handle}"
            )));
        }
        Ok(())
    }

    fn kill_timer(&self, handle: WindowHandle, timer: TimerId) -> PlatformResult<()> {
        unsafe { KillTimer(Some(hwnd_of(handle)), timer.0) }?;
        Ok(())
    }

    fn client_rect(&self, handle: WindowHandle) -> PlatformResult<Rect> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(hwnd_of(handle), &mut rect) }?;
        Ok(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn window_text(&self, handle: WindowHandle) -> PlatformResult<String> {
        let hwnd = hwnd_of(handle);
        let text_len = unsafe { GetWindowTextLengthW(hwnd) };
        if text_len <= 0 {
            return Ok(String::new());
        }
        let mut text_buf = vec![0u16; (text_len + 1) as usize];
        let copied = unsafe { GetWindowTextW(hwnd, &mut text_buf) };
        Ok(String::from_utf16_lossy(&text_buf[..copied.max(0) as usize]))
    }
}
