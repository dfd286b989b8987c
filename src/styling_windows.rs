/*
 * Native GDI objects created from the portable styling values. Each wrapper
 * owns its handle and deletes it on drop, so paint code can create brushes,
 * pens and fonts per frame without tracking cleanup by hand.
 */

use crate::controls::styling_handler::{colorvalue_to_colorref, create_hfont};
use crate::error::{PlatformError, Result};
use crate::styling_primitives::{ColorValue, FontDescription};

use windows::Win32::Graphics::Gdi::{
    CreatePen, CreateSolidBrush, DeleteObject, HBRUSH, HFONT, HGDIOBJ, HPEN, PS_SOLID,
};

/// Solid brush for one `ColorValue`. GDI ignores the alpha channel.
#[derive(Debug)]
pub struct NativeBrush {
    brush: HBRUSH,
}

impl NativeBrush {
    pub fn new(color: &ColorValue) -> Result<Self> {
        let brush = unsafe { CreateSolidBrush(colorvalue_to_colorref(color)) };
        if brush.is_invalid() {
            return Err(PlatformError::Drawing(format!(
                "CreateSolidBrush failed for {:?}",
                color.color()
            )));
        }
        Ok(Self { brush })
    }

    pub fn handle(&self) -> HBRUSH {
        self.brush
    }

    pub fn as_gdi(&self) -> HGDIOBJ {
        self.brush.into()
    }
}

impl Drop for NativeBrush {
    fn drop(&mut self) {
        let _ = unsafe { DeleteObject(self.brush.into()) };
    }
}

#[derive(Debug)]
pub struct NativePen {
    pen: HPEN,
}

impl NativePen {
    pub fn solid(color: &ColorValue, width: i32) -> Result<Self> {
        let pen = unsafe { CreatePen(PS_SOLID, width.max(1), colorvalue_to_colorref(color)) };
        if pen.is_invalid() {
            return Err(PlatformError::Drawing(format!(
                "CreatePen failed for {:?} width {width}",
                color.color()
            )));
        }
        Ok(Self { pen })
    }

    pub fn as_gdi(&self) -> HGDIOBJ {
        self.pen.into()
    }
}

impl Drop for NativePen {
    fn drop(&mut self) {
        let _ = unsafe { DeleteObject(self.pen.into()) };
    }
}

#[derive(Debug)]
pub struct NativeFont {
    font: HFONT,
}

impl NativeFont {
    pub fn new(description: &FontDescription) -> Result<Self> {
        Ok(Self {
            font: create_hfont(description)?,
        })
    }

    pub fn as_gdi(&self) -> HGDIOBJ {
        self.font.into()
    }
}

impl Drop for NativeFont {
    fn drop(&mut self) {
        let _ = unsafe { DeleteObject(self.font.into()) };
    }
}
