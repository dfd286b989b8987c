/*
 * Entry point for applications on Windows: a `WidgetToolkit` wired to the
 * system clock, the Win32 window host and the subclass registry. All widget
 * operations go through the toolkit; this type only owns the wiring.
 */

use crate::animation::SystemTimeSource;
use crate::controls::{Win32SubclassRegistry, Win32WindowHost};
use crate::error::Result as PlatformResult;
use crate::widgets::button::ButtonPaletteConfig;
use crate::widgets::image_button::ImageButtonPaletteConfig;
use crate::widgets::radio_button::RadioPaletteConfig;
use crate::widgets::toolkit::WidgetToolkit;

use std::ops::Deref;
use std::rc::Rc;

pub struct Win32Widgets {
    toolkit: WidgetToolkit,
}

impl Win32Widgets {
    /// Creates the toolkit. Palettes still have to be configured before any
    /// widget can be attached.
    pub fn new() -> PlatformResult<Self> {
        log::debug!("Win32Widgets: creating toolkit");
        let toolkit = WidgetToolkit::new(
            Rc::new(SystemTimeSource::new()),
            Rc::new(Win32WindowHost::new()),
            Rc::new(Win32SubclassRegistry::new()),
        )?;
        Ok(Self { toolkit })
    }

    /// Creates the toolkit with the built-in dark palettes for all three kinds.
    pub fn with_dark_palettes() -> PlatformResult<Self> {
        let widgets = Self::new()?;
        widgets.configure_button_palette(&ButtonPaletteConfig::dark())?;
        widgets.configure_image_button_palette(&ImageButtonPaletteConfig::dark())?;
        widgets.configure_radio_palette(&RadioPaletteConfig::dark())?;
        Ok(widgets)
    }

    pub fn toolkit(&self) -> &WidgetToolkit {
        &self.toolkit
    }
}

impl Deref for Win32Widgets {
    type Target = WidgetToolkit;

    fn deref(&self) -> &WidgetToolkit {
        &self.toolkit
    }
}

impl Drop for Win32Widgets {
    fn drop(&mut self) {
        self.toolkit.shutdown();
    }
}
