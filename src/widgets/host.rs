/*
 * Window operations the widget core needs from its host: repaint requests,
 * the animation timer, and the two window properties painting reads.
 */

use crate::error::Result;
use crate::types::{Rect, TimerId, WindowHandle};

use std::time::Duration;

pub trait WindowHost {
    fn invalidate(&self, handle: WindowHandle) -> Result<()>;

    /// Arms (or re-arms) a periodic timer on `handle`.
    fn set_timer(&self, handle: WindowHandle, timer: TimerId, interval: Duration) -> Result<()>;

    fn kill_timer(&self, handle: WindowHandle, timer: TimerId) -> Result<()>;

    fn client_rect(&self, handle: WindowHandle) -> Result<Rect>;

    fn window_text(&self, handle: WindowHandle) -> Result<String>;
}
