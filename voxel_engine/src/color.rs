//! Working color types. `Rgba8` is the storage format voxels and images
//! use; `Color` is the linear `f32` representation the shading stack
//! does its math in, matching the ARGB-pack style of
//! `math_lib_3d/src/renderer.rs`'s `make_argb`/`get_*` helpers but
//! expressed as a value type rather than bit-packed `u32`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }

    pub fn to_color(self) -> Color {
        Color {
            r: self.r as f32 / 255.0,
            g: self.g as f32 / 255.0,
            b: self.b as f32 / 255.0,
            a: self.a as f32 / 255.0,
        }
    }
}

impl From<image::Rgba<u8>> for Rgba8 {
    fn from(p: image::Rgba<u8>) -> Self {
        Rgba8::new(p[0], p[1], p[2], p[3])
    }
}

impl From<Rgba8> for image::Rgba<u8> {
    fn from(c: Rgba8) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Linear-space working color for the shading stack.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub fn scale_rgb(self, factor: f32) -> Color {
        Color::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn mul_rgb(self, other: Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b, self.a)
    }

    pub fn add_rgb(self, other: Color) -> Color {
        Color::new(self.r + other.r, self.g + other.g, self.b + other.b, self.a)
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn clamped(self) -> Color {
        Color::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    pub fn to_rgba8(self) -> Rgba8 {
        let c = self.clamped();
        Rgba8::new(
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        )
    }
}

/// `src`-over-`dst` alpha compositing, in 8-bit space.
pub fn composite_over(src: Rgba8, dst: Rgba8) -> Rgba8 {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba8::TRANSPARENT;
    }
    let blend = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        (((s * sa + d * da * (1.0 - sa)) / out_a) * 255.0).round() as u8
    };
    Rgba8::new(
        blend(src.r, dst.r),
        blend(src.g, dst.g),
        blend(src.b, dst.b),
        (out_a * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_overwrites_destination() {
        let src = Rgba8::new(10, 20, 30, 255);
        let dst = Rgba8::new(200, 200, 200, 255);
        assert_eq!(composite_over(src, dst), src);
    }

    #[test]
    fn fully_transparent_source_leaves_destination_untouched() {
        let src = Rgba8::new(10, 20, 30, 0);
        let dst = Rgba8::new(200, 200, 200, 255);
        assert_eq!(composite_over(src, dst), dst);
    }
}
