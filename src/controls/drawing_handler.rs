/*
 * GDI implementation of `DrawingPrimitives`. Each offscreen surface is a memory
 * DC with a compatible bitmap; presenting copies it to the paint DC with
 * `BitBlt`, discarding just frees it. Widget coordinates are client
 * coordinates and are shifted into surface space here.
 */

use crate::controls::styling_handler::colorvalue_to_colorref;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::styling_primitives::{ColorValue, FontDescription, ImageRef};
use crate::styling_windows::{NativeBrush, NativeFont, NativePen};
use crate::types::{Point, Rect};
use crate::widgets::drawing::{DrawingPrimitives, ImagePlacement, SurfaceId, TextAlignment};

use std::collections::HashMap;
use std::ffi::c_void;

use windows::Win32::{
    Foundation::RECT,
    Graphics::Gdi::{
        AC_SRC_ALPHA, AC_SRC_OVER, AlphaBlend, BI_RGB, BITMAPINFO, BITMAPINFOHEADER,
        BLENDFUNCTION, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateDIBSection,
        DIB_RGB_COLORS, DT_CENTER, DT_END_ELLIPSIS, DT_LEFT, DT_NOPREFIX, DT_RIGHT, DT_SINGLELINE,
        DT_VCENTER, DeleteDC, DeleteObject, DrawTextW, Ellipse, FillRect, GetStockObject, HBITMAP,
        HDC, HGDIOBJ, NULL_BRUSH, NULL_PEN, RoundRect, SRCCOPY, SelectObject, SetBkMode,
        SetTextColor, TRANSPARENT,
    },
};

struct OffscreenSurface {
    bounds: Rect,
    dc: HDC,
    bitmap: HBITMAP,
    previous_bitmap: HGDIOBJ,
}

impl OffscreenSurface {
    fn local(&self, rect: Rect) -> RECT {
        let shifted = rect.offset(-self.bounds.left, -self.bounds.top);
        RECT {
            left: shifted.left,
            top: shifted.top,
            right: shifted.right,
            bottom: shifted.bottom,
        }
    }

    fn release(&self) {
        unsafe {
            SelectObject(self.dc, self.previous_bitmap);
            let _ = DeleteObject(self.bitmap.into());
            let _ = DeleteDC(self.dc);
        }
    }
}

/*
 * Restores the previous selection of a DC when dropped. Used for the pens,
 * brushes and fonts selected for a single primitive.
 */
struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(dc: HDC, object: HGDIOBJ) -> Self {
        let previous = unsafe { SelectObject(dc, object) };
        Self { dc, previous }
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe { SelectObject(self.dc, self.previous) };
    }
}

/// Draws into offscreen surfaces created against one paint DC.
pub struct GdiDrawing {
    target: HDC,
    surfaces: HashMap<SurfaceId, OffscreenSurface>,
    next_surface: u32,
}

impl GdiDrawing {
    /// `target` is the DC returned by `BeginPaint` and must outlive `self`.
    pub fn new(target: HDC) -> Self {
        Self {
            target,
            surfaces: HashMap::new(),
            next_surface: 1,
        }
    }

    fn surface(&self, id: SurfaceId) -> PlatformResult<&OffscreenSurface> {
        self.surfaces
            .get(&id)
            .ok_or_else(|| PlatformError::Drawing(format!("unknown offscreen surface {id:?}")))
    }

    fn draw_shape(
        &self,
        target: SurfaceId,
        pen: Option<&NativePen>,
        brush: Option<&NativeBrush>,
        shape: impl FnOnce(HDC) -> bool,
        name: &str,
    ) -> PlatformResult<()> {
        let surface = self.surface(target)?;
        let pen_obj = match pen {
            Some(pen) => pen.as_gdi(),
            None => unsafe { GetStockObject(NULL_PEN) },
        };
        let brush_obj = match brush {
            Some(brush) => brush.as_gdi(),
            None => unsafe { GetStockObject(NULL_BRUSH) },
        };
        let _pen = Selection::select(surface.dc, pen_obj);
        let _brush = Selection::select(surface.dc, brush_obj);
        if shape(surface.dc) {
            Ok(())
        } else {
            Err(PlatformError::Drawing(format!("{name} failed")))
        }
    }
}

impl Drop for GdiDrawing {
    fn drop(&mut self) {
        if !self.surfaces.is_empty() {
            log::warn!(
                "GdiDrawing: {} offscreen surface(s) never ended; freeing them",
                self.surfaces.len()
            );
        }
        for (_, surface) in self.surfaces.drain() {
            surface.release();
        }
    }
}

impl DrawingPrimitives for GdiDrawing {
    fn begin_offscreen(&mut self, bounds: Rect) -> PlatformResult<SurfaceId> {
        if bounds.is_empty() {
            return Err(PlatformError::Drawing(format!(
                "cannot create an offscreen surface for empty bounds {bounds:?}"
            )));
        }
        let dc = unsafe { CreateCompatibleDC(Some(self.target)) };
        if dc.is_invalid() {
            return Err(PlatformError::Drawing("CreateCompatibleDC failed".into()));
        }
        let bitmap = unsafe { CreateCompatibleBitmap(self.target, bounds.width(), bounds.height()) };
        if bitmap.is_invalid() {
            let _ = unsafe { DeleteDC(dc) };
            return Err(PlatformError::Drawing(format!(
                "CreateCompatibleBitmap failed for {}x{}",
                bounds.width(),
                bounds.height()
            )));
        }
        let previous_bitmap = unsafe { SelectObject(dc, bitmap.into()) };
        unsafe { SetBkMode(dc, TRANSPARENT) };

        let id = SurfaceId(self.next_surface);
        self.next_surface = self.next_surface.wrapping_add(1);
        self.surfaces.insert(
            id,
            OffscreenSurface {
                bounds,
                dc,
                bitmap,
                previous_bitmap,
            },
        );
        log::trace!("GdiDrawing: began surface {id:?} for {bounds:?}");
        Ok(id)
    }

    fn end_offscreen(&mut self, surface: SurfaceId, present: bool) -> PlatformResult<()> {
        let surface_data = self.surfaces.remove(&surface).ok_or_else(|| {
            PlatformError::Drawing(format!("unknown offscreen surface {surface:?}"))
        })?;
        let result = if present {
            let b = surface_data.bounds;
            unsafe {
                BitBlt(
                    self.target,
                    b.left,
                    b.top,
                    b.width(),
                    b.height(),
                    Some(surface_data.dc),
                    0,
                    0,
                    SRCCOPY,
                )
            }
            .map_err(PlatformError::from)
        } else {
            Ok(())
        };
        surface_data.release();
        result
    }

    fn fill_rect(&mut self, target: SurfaceId, rect: Rect, color: &ColorValue) -> PlatformResult<()> {
        let surface = self.surface(target)?;
        let brush = NativeBrush::new(color)?;
        let local = surface.local(rect);
        if unsafe { FillRect(surface.dc, &local, brush.handle()) } == 0 {
            return Err(PlatformError::Drawing("FillRect failed".into()));
        }
        Ok(())
    }

    fn fill_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        radius: i32,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> PlatformResult<()> {
        let local = self.surface(target)?.local(rect);
        let brush = NativeBrush::new(fill)?;
        let pen = border.map(|color| NativePen::solid(color, 1)).transpose()?;
        let corner = radius.max(0) * 2;
        self.draw_shape(
            target,
            pen.as_ref(),
            Some(&brush),
            |dc| unsafe {
                RoundRect(dc, local.left, local.top, local.right, local.bottom, corner, corner)
                    .as_bool()
            },
            "RoundRect",
        )
    }

    fn draw_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        radius: i32,
        width: i32,
        color: &ColorValue,
    ) -> PlatformResult<()> {
        let local = self.surface(target)?.local(rect);
        let pen = NativePen::solid(color, width)?;
        let corner = radius.max(0) * 2;
        self.draw_shape(
            target,
            Some(&pen),
            None,
            |dc| unsafe {
                RoundRect(dc, local.left, local.top, local.right, local.bottom, corner, corner)
                    .as_bool()
            },
            "RoundRect outline",
        )
    }

    fn fill_ellipse(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        diameter: i32,
        position: Point,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> PlatformResult<()> {
        let left = rect.left + position.x;
        let top = rect.top + position.y;
        let local = self
            .surface(target)?
            .local(Rect::new(left, top, left + diameter, top + diameter));
        let brush = NativeBrush::new(fill)?;
        let pen = border.map(|color| NativePen::solid(color, 1)).transpose()?;
        self.draw_shape(
            target,
            pen.as_ref(),
            Some(&brush),
            |dc| unsafe { Ellipse(dc, local.left, local.top, local.right, local.bottom).as_bool() },
            "Ellipse",
        )
    }

    fn draw_text(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        text: &str,
        color: &ColorValue,
        alignment: TextAlignment,
        font: Option<&FontDescription>,
    ) -> PlatformResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let surface = self.surface(target)?;
        let native_font = font.map(NativeFont::new).transpose()?;
        let _font = native_font
            .as_ref()
            .map(|f| Selection::select(surface.dc, f.as_gdi()));

        unsafe { SetTextColor(surface.dc, colorvalue_to_colorref(color)) };
        let horizontal = match alignment {
            TextAlignment::Left => DT_LEFT,
            TextAlignment::Center => DT_CENTER,
            TextAlignment::Right => DT_RIGHT,
        };
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut local = surface.local(rect);
        let drawn = unsafe {
            DrawTextW(
                surface.dc,
                &mut wide,
                &mut local,
                horizontal | DT_VCENTER | DT_SINGLELINE | DT_END_ELLIPSIS | DT_NOPREFIX,
            )
        };
        if drawn == 0 {
            return Err(PlatformError::Drawing(format!("DrawTextW failed for '{text}'")));
        }
        Ok(())
    }

    fn draw_image(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        image: &ImageRef,
        opacity: f32,
        placement: ImagePlacement,
    ) -> PlatformResult<()> {
        let surface = self.surface(target)?;
        let dest = surface.local(placement.resolve(rect));
        let size = image.size();

        let info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: size.width,
                // Negative height selects a top-down DIB.
                biHeight: -size.height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut bits: *mut c_void = std::ptr::null_mut();
        let dib = unsafe {
            CreateDIBSection(
                Some(surface.dc),
                &info,
                DIB_RGB_COLORS,
                &mut bits,
                None,
                0,
            )
        }?;
        if bits.is_null() {
            let _ = unsafe { DeleteObject(dib.into()) };
            return Err(PlatformError::Drawing("CreateDIBSection returned no bits".into()));
        }
        let pixels = image.pixels();
        unsafe { std::ptr::copy_nonoverlapping(pixels.as_ptr(), bits as *mut u8, pixels.len()) };

        let source_dc = unsafe { CreateCompatibleDC(Some(surface.dc)) };
        if source_dc.is_invalid() {
            let _ = unsafe { DeleteObject(dib.into()) };
            return Err(PlatformError::Drawing("CreateCompatibleDC failed for image".into()));
        }
        let blend = BLENDFUNCTION {
            BlendOp: AC_SRC_OVER as u8,
            BlendFlags: 0,
            SourceConstantAlpha: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            AlphaFormat: AC_SRC_ALPHA as u8,
        };
        let blended = {
            let _bitmap = Selection::select(source_dc, dib.into());
            unsafe {
                AlphaBlend(
                    surface.dc,
                    dest.left,
                    dest.top,
                    dest.right - dest.left,
                    dest.bottom - dest.top,
                    source_dc,
                    0,
                    0,
                    size.width,
                    size.height,
                    blend,
                )
            }
            .as_bool()
        };
        unsafe {
            let _ = DeleteDC(source_dc);
            let _ = DeleteObject(dib.into());
        }
        if !blended {
            return Err(PlatformError::Drawing("AlphaBlend failed".into()));
        }
        Ok(())
    }
}
