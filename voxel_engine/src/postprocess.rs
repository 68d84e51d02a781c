//! Post-processing: edge outline and integer supersample downsampling.
//! Spec.md §4.7.
//!
//! The teacher has no post-processing pass of its own; this module
//! reuses `math_lib_3d/src/bitmap.rs`'s `getPix`/`setPix` pixel-access
//! style and `math_lib_3d/src/renderer.rs`'s ARGB packing
//! (`make_argb`/`get_r`/`get_g`/`get_b`/`get_a`) for how pixels are
//! read and recombined, applied to two new operations: edge outlining
//! and integer-ratio supersample downsampling.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::{composite_over, Rgba8};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlineMode {
    Inside,
    Outside,
}

/// Spec.md §4.7's four outline kernels: `circle` and `square` are the
/// 4- and 8-neighborhoods; `horizontal`/`vertical` restrict the
/// neighbor test to one axis, for outlines that only need to catch
/// silhouette edges along a single direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlineKernel {
    Circle,
    Square,
    Horizontal,
    Vertical,
}

impl OutlineKernel {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            OutlineKernel::Circle => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            OutlineKernel::Square => &[
                (1, 0), (-1, 0), (0, 1), (0, -1),
                (1, 1), (1, -1), (-1, 1), (-1, -1),
            ],
            OutlineKernel::Horizontal => &[(1, 0), (-1, 0)],
            OutlineKernel::Vertical => &[(0, 1), (0, -1)],
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OutlineSettings {
    pub mode: OutlineMode,
    pub kernel: OutlineKernel,
    pub color: Rgba8,
    pub enabled: bool,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        OutlineSettings {
            mode: OutlineMode::Outside,
            kernel: OutlineKernel::Circle,
            color: Rgba8::new(0, 0, 0, 255),
            enabled: false,
        }
    }
}

fn is_covered(px: Rgba8) -> bool {
    px.a > 0
}

/// Draws a solid outline along the silhouette boundary of every
/// covered region. `Outside` paints boundary pixels that are
/// themselves uncovered; `Inside` paints covered boundary pixels
/// instead of the uncovered pixel just past them.
pub fn apply_outline(image: &mut RgbaImage, settings: &OutlineSettings) {
    if !settings.enabled {
        return;
    }
    let (w, h) = (image.width() as i32, image.height() as i32);
    let covered: Vec<bool> = image.pixels().map(|p| is_covered((*p).into())).collect();
    let at = |x: i32, y: i32| -> bool {
        if x < 0 || y < 0 || x >= w || y >= h {
            false
        } else {
            covered[(y * w + x) as usize]
        }
    };

    let mut to_paint: Vec<(u32, u32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let here = at(x, y);
            let on_boundary = settings.kernel.offsets().iter().any(|&(dx, dy)| at(x + dx, y + dy) != here);
            if !on_boundary {
                continue;
            }
            match settings.mode {
                OutlineMode::Outside if !here => to_paint.push((x as u32, y as u32)),
                OutlineMode::Inside if here => to_paint.push((x as u32, y as u32)),
                _ => {}
            }
        }
    }

    for (x, y) in to_paint {
        let px = image.get_pixel_mut(x, y);
        let dst: Rgba8 = (*px).into();
        *px = composite_over(settings.color, dst).into();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownsampleMode {
    Nearest,
    BoxAverage,
}

/// The integer supersample factor implied by rendering at `(rendered_w,
/// rendered_h)` and downsampling to `(target_w, target_h)`. Spec.md
/// §4.7 requires this be an exact integer ratio on both axes.
pub fn supersample_scale_factor(rendered_w: u32, rendered_h: u32, target_w: u32, target_h: u32) -> Option<u32> {
    if target_w == 0 || target_h == 0 {
        return None;
    }
    if rendered_w % target_w != 0 || rendered_h % target_h != 0 {
        return None;
    }
    let fx = rendered_w / target_w;
    let fy = rendered_h / target_h;
    if fx != fy || fx == 0 {
        None
    } else {
        Some(fx)
    }
}

/// Downsamples `src` by the given integer factor.
pub fn downsample(src: &RgbaImage, factor: u32, mode: DownsampleMode) -> RgbaImage {
    if factor <= 1 {
        return src.clone();
    }
    let out_w = src.width() / factor;
    let out_h = src.height() / factor;
    let mut out = RgbaImage::new(out_w, out_h);

    for oy in 0..out_h {
        for ox in 0..out_w {
            let pixel = match mode {
                DownsampleMode::Nearest => {
                    let sx = ox * factor + factor / 2;
                    let sy = oy * factor + factor / 2;
                    (*src.get_pixel(sx.min(src.width() - 1), sy.min(src.height() - 1))).into()
                }
                DownsampleMode::BoxAverage => box_average(src, ox, oy, factor),
            };
            out.put_pixel(ox, oy, pixel);
        }
    }
    out
}

fn box_average(src: &RgbaImage, ox: u32, oy: u32, factor: u32) -> image::Rgba<u8> {
    let (mut r, mut g, mut b, mut a) = (0u32, 0u32, 0u32, 0u32);
    let count = (factor * factor) as u32;
    for dy in 0..factor {
        for dx in 0..factor {
            let p: Rgba8 = (*src.get_pixel(ox * factor + dx, oy * factor + dy)).into();
            r += p.r as u32;
            g += p.g as u32;
            b += p.b as u32;
            a += p.a as u32;
        }
    }
    let round_div = |sum: u32| -> u8 { ((sum * 2 + count) / (count * 2)) as u8 };
    Rgba8::new(round_div(r), round_div(g), round_div(b), round_div(a)).into()
}
