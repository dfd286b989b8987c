/*
 * Platform-agnostic value objects consumed by the widget core and the drawing
 * backends. These definitions are free of Win32 details so they compile on any
 * target; `styling_windows` adds the native brush representation on Windows.
 */

use crate::types::Size;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /*
     * Packs the color the way Win32 `COLORREF` expects it (0x00BBGGRR).
     */
    pub fn to_colorref_bits(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }

    pub fn from_colorref_bits(bits: u32) -> Self {
        Self {
            r: (bits & 0xFF) as u8,
            g: ((bits >> 8) & 0xFF) as u8,
            b: ((bits >> 16) & 0xFF) as u8,
        }
    }

    /// Linear blend toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * t).round() as u8 };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Darkens each channel to `percent`% of its value.
    pub fn darken(self, percent: u32) -> Color {
        let scale = |c: u8| -> u8 { (c as u32 * percent.min(100) / 100) as u8 };
        Color {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

/*
 * A color in the representations the drawing backends need: float channels
 * for alpha-aware compositing, the packed COLORREF layout for GDI, and (on
 * Windows) a native brush via `styling_windows::NativeBrush`.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorValue {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl ColorValue {
    pub fn from_color(color: Color) -> Self {
        Self {
            red: color.r as f32 / 255.0,
            green: color.g as f32 / 255.0,
            blue: color.b as f32 / 255.0,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn channels(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn color(&self) -> Color {
        let quantize = |c: f32| -> u8 { (c.clamp(0.0, 1.0) * 255.0).round() as u8 };
        Color {
            r: quantize(self.red),
            g: quantize(self.green),
            b: quantize(self.blue),
        }
    }

    pub fn to_colorref_bits(&self) -> u32 {
        self.color().to_colorref_bits()
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        ColorValue::from_color(color)
    }
}

/*
 * Defines the weight (e.g., boldness) of a font.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/*
 * Describes a font in a platform-agnostic way. Fields left as `None` fall back
 * to the system GUI font.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDescription {
    pub name: Option<String>,
    pub size: Option<i32>,
    pub weight: Option<FontWeight>,
}

/*
 * A decoded image ready to be composited: 32-bit premultiplied BGRA rows,
 * top-down. Loading and decoding happen outside this crate.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    size: Size,
    pixels: Rc<[u8]>,
}

impl ImageRef {
    pub fn from_bgra(size: Size, pixels: impl Into<Rc<[u8]>>) -> Option<Self> {
        let pixels = pixels.into();
        if size.is_empty() || pixels.len() != (size.width * size.height * 4) as usize {
            return None;
        }
        Some(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
