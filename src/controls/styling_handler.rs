/*
 * Conversions from the portable styling values to the Win32 representations
 * the GDI backend passes to the API.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::styling_primitives::{Color, ColorValue, FontDescription, FontWeight};

use windows::Win32::{
    Foundation::COLORREF,
    Graphics::Gdi::{
        CLIP_DEFAULT_PRECIS, CreateFontW, DEFAULT_CHARSET, DEFAULT_QUALITY, FF_DONTCARE, FW_BOLD,
        FW_NORMAL, GetDC, GetDeviceCaps, HFONT, LOGPIXELSY, OUT_DEFAULT_PRECIS, ReleaseDC,
    },
    System::WindowsProgramming::MulDiv,
};
use windows::core::HSTRING;

const FALLBACK_FONT_NAME: &str = "MS Shell Dlg 2";

/*
 * Win32 expects colors in BGR order; the packing lives on `Color` so that it
 * can be tested on every platform.
 */
pub(crate) fn color_to_colorref(color: &Color) -> COLORREF {
    COLORREF(color.to_colorref_bits())
}

pub(crate) fn colorvalue_to_colorref(color: &ColorValue) -> COLORREF {
    COLORREF(color.to_colorref_bits())
}

#[cfg(test)]
pub(crate) fn colorref_to_color(cr: COLORREF) -> Color {
    Color::from_colorref_bits(cr.0)
}

/// Point size to logical height for the screen DPI. Negative selects by
/// character height rather than cell height.
fn logical_font_height(points: i32) -> PlatformResult<i32> {
    let hdc_screen = unsafe { GetDC(None) };
    if hdc_screen.is_invalid() {
        return Err(PlatformError::OperationFailed(
            "StylingHandler: could not acquire screen DC for font creation".into(),
        ));
    }
    let height = -unsafe { MulDiv(points, GetDeviceCaps(Some(hdc_screen), LOGPIXELSY), 72) };
    unsafe { ReleaseDC(None, hdc_screen) };
    Ok(height)
}

/// Creates an HFONT from a `FontDescription`. The caller owns the handle.
pub(crate) fn create_hfont(font_desc: &FontDescription) -> PlatformResult<HFONT> {
    let logical_height = match font_desc.size {
        Some(points) => logical_font_height(points)?,
        None => 0,
    };
    let weight = match font_desc.weight {
        Some(FontWeight::Bold) => FW_BOLD.0 as i32,
        _ => FW_NORMAL.0 as i32,
    };
    let name = HSTRING::from(font_desc.name.as_deref().unwrap_or(FALLBACK_FONT_NAME));
    let hfont = unsafe {
        CreateFontW(
            logical_height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            DEFAULT_QUALITY,
            FF_DONTCARE.0 as u32,
            &name,
        )
    };
    if hfont.is_invalid() {
        log::error!("StylingHandler: CreateFontW failed for {font_desc:?}");
        return Err(PlatformError::OperationFailed(format!(
            "CreateFontW failed for font {:?}",
            font_desc.name
        )));
    }
    Ok(hfont)
}
