/*
 * Drawing seam between the widget core and a rendering backend. Widgets paint
 * through `DrawingPrimitives` only; on Windows `GdiDrawing` implements it on top
 * of a memory DC, and tests substitute a recorder.
 */

use crate::error::Result;
use crate::styling_primitives::{ColorValue, FontDescription, ImageRef};
use crate::types::{Point, Rect, Size};

/// Identifies an offscreen surface handed out by `begin_offscreen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Horizontal text alignment. Text is always vertically centered on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Where an image goes inside its target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePlacement {
    /// Offset from the rectangle's top-left corner, ignored when `centered`.
    pub offset: Point,
    pub size: Size,
    pub centered: bool,
}

impl ImagePlacement {
    pub fn resolve(&self, rect: Rect) -> Rect {
        if self.centered {
            rect.centered(self.size)
        } else {
            let left = rect.left + self.offset.x;
            let top = rect.top + self.offset.y;
            Rect::new(left, top, left + self.size.width, top + self.size.height)
        }
    }
}

pub trait DrawingPrimitives {
    /// Starts an offscreen surface covering `bounds`. Every surface must be
    /// ended exactly once.
    fn begin_offscreen(&mut self, bounds: Rect) -> Result<SurfaceId>;

    /// Ends `surface`, copying it to the window when `present` is set.
    fn end_offscreen(&mut self, surface: SurfaceId, present: bool) -> Result<()>;

    fn fill_rect(&mut self, target: SurfaceId, rect: Rect, color: &ColorValue) -> Result<()>;

    fn fill_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        radius: i32,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> Result<()>;

    /// Outline only, `width` pixels wide.
    fn draw_round_rect(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        radius: i32,
        width: i32,
        color: &ColorValue,
    ) -> Result<()>;

    /// Circle of `diameter` whose bounding box starts at `position` inside `rect`.
    fn fill_ellipse(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        diameter: i32,
        position: Point,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> Result<()>;

    fn draw_text(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        text: &str,
        color: &ColorValue,
        alignment: TextAlignment,
        font: Option<&FontDescription>,
    ) -> Result<()>;

    fn draw_image(
        &mut self,
        target: SurfaceId,
        rect: Rect,
        image: &ImageRef,
        opacity: f32,
        placement: ImagePlacement,
    ) -> Result<()>;
}

/*
 * Scoped offscreen surface. The surface is ended when the canvas is dropped:
 * presented if `present` was called, otherwise discarded. Widgets draw through
 * it without handling surface ids.
 */
pub struct Canvas<'a> {
    draw: &'a mut dyn DrawingPrimitives,
    surface: SurfaceId,
    bounds: Rect,
    finished: bool,
}

impl<'a> Canvas<'a> {
    pub fn acquire(draw: &'a mut dyn DrawingPrimitives, bounds: Rect) -> Result<Self> {
        let surface = draw.begin_offscreen(bounds)?;
        Ok(Self {
            draw,
            surface,
            bounds,
            finished: false,
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn present(mut self) -> Result<()> {
        self.finished = true;
        self.draw.end_offscreen(self.surface, true)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: &ColorValue) -> Result<()> {
        self.draw.fill_rect(self.surface, rect, color)
    }

    pub fn fill_round_rect(
        &mut self,
        rect: Rect,
        radius: i32,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> Result<()> {
        self.draw
            .fill_round_rect(self.surface, rect, radius, fill, border)
    }

    pub fn draw_round_rect(
        &mut self,
        rect: Rect,
        radius: i32,
        width: i32,
        color: &ColorValue,
    ) -> Result<()> {
        self.draw
            .draw_round_rect(self.surface, rect, radius, width, color)
    }

    pub fn fill_ellipse(
        &mut self,
        rect: Rect,
        diameter: i32,
        position: Point,
        fill: &ColorValue,
        border: Option<&ColorValue>,
    ) -> Result<()> {
        self.draw
            .fill_ellipse(self.surface, rect, diameter, position, fill, border)
    }

    pub fn draw_text(
        &mut self,
        rect: Rect,
        text: &str,
        color: &ColorValue,
        alignment: TextAlignment,
        font: Option<&FontDescription>,
    ) -> Result<()> {
        self.draw
            .draw_text(self.surface, rect, text, color, alignment, font)
    }

    pub fn draw_image(
        &mut self,
        rect: Rect,
        image: &ImageRef,
        opacity: f32,
        placement: ImagePlacement,
    ) -> Result<()> {
        self.draw
            .draw_image(self.surface, rect, image, opacity, placement)
    }
}

impl Drop for Canvas<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.draw.end_offscreen(self.surface, false) {
            log::warn!(
                "Canvas: failed to release offscreen surface {:?}: {e}",
                self.surface
            );
        }
    }
}
