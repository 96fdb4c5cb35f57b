use std::borrow::Cow;

use crate::canvas::decode::{DecodedImage, decode_image, premultiply_rgba8_in_place};
use crate::foundation::core::Point;
use crate::foundation::error::ChromaplaneResult;
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Color data produced by a drawable: a premultiplied RGBA8 bitmap.
#[derive(Clone, Debug)]
pub struct RasterizedContent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8 (`width * height * 4`).
    pub data: Vec<u8>,
}

impl RasterizedContent {
    /// Fully transparent bitmap of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }
}

/// A content layer that can rasterize itself into a pixel rectangle.
///
/// Returning `None` is a silent no-op: the layer simply does not appear in the
/// composite. Nothing distinguishes an intentionally empty layer from a failed
/// one; compositing is best-effort by contract.
pub trait Drawable {
    /// Rasterize into a `width`×`height` rect, or `None` on failure.
    fn rasterize(&self, width: u32, height: u32) -> Option<RasterizedContent>;
}

/// A bitmap source usable with [`crate::canvas::surface::Canvas::draw_image`].
pub trait ImageSource {
    /// Pixel dimensions of the source bitmap.
    fn dimensions(&self) -> (u32, u32);
    /// Row-major premultiplied RGBA8 bytes.
    fn rgba8_premul(&self) -> Cow<'_, [u8]>;
}

impl ImageSource for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::RgbaImage::dimensions(self)
    }

    fn rgba8_premul(&self) -> Cow<'_, [u8]> {
        let mut bytes = self.as_raw().clone();
        premultiply_rgba8_in_place(&mut bytes);
        Cow::Owned(bytes)
    }
}

impl ImageSource for RasterizedContent {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgba8_premul(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }
}

/// Solid fill over the whole rect.
#[derive(Clone, Copy, Debug)]
pub struct SolidDrawable {
    color: [u8; 4],
}

impl SolidDrawable {
    /// Straight-alpha RGBA fill color.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { color: [r, g, b, a] }
    }

    /// Opaque RGB fill color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl Drawable for SolidDrawable {
    fn rasterize(&self, width: u32, height: u32) -> Option<RasterizedContent> {
        if width == 0 || height == 0 {
            return None;
        }
        let [r, g, b, a] = self.color;
        let a16 = u16::from(a);
        let px = [
            mul_div255_u8(u16::from(r), a16),
            mul_div255_u8(u16::from(g), a16),
            mul_div255_u8(u16::from(b), a16),
            a,
        ];
        let mut out = RasterizedContent::transparent(width, height);
        for chunk in out.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Some(out)
    }
}

/// A decoded bitmap placed at an integer pixel origin.
#[derive(Clone, Debug)]
pub struct ImageDrawable {
    image: DecodedImage,
    origin: Point,
}

impl ImageDrawable {
    /// Place an already decoded image at `origin`.
    pub fn new(image: DecodedImage, origin: Point) -> Self {
        Self { image, origin }
    }

    /// Decode encoded image bytes and place the result at `origin`.
    pub fn from_bytes(bytes: &[u8], origin: Point) -> ChromaplaneResult<Self> {
        Ok(Self::new(decode_image(bytes)?, origin))
    }
}

impl Drawable for ImageDrawable {
    fn rasterize(&self, width: u32, height: u32) -> Option<RasterizedContent> {
        if width == 0 || height == 0 {
            return None;
        }
        let mut out = RasterizedContent::transparent(width, height);
        blit_premul(
            &mut out.data,
            width,
            height,
            &self.image.rgba8_premul,
            self.image.width,
            self.image.height,
            self.origin.x.round() as i64,
            self.origin.y.round() as i64,
        );
        Some(out)
    }
}

/// Composite layout: ordered children stacked in append order, later children
/// on top.
#[derive(Default)]
pub struct StackDrawable {
    children: Vec<Box<dyn Drawable>>,
}

impl StackDrawable {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child on top of the current children.
    pub fn push(&mut self, child: Box<dyn Drawable>) -> &mut Self {
        self.children.push(child);
        self
    }
}

impl Drawable for StackDrawable {
    fn rasterize(&self, width: u32, height: u32) -> Option<RasterizedContent> {
        if width == 0 || height == 0 {
            return None;
        }
        let mut out = RasterizedContent::transparent(width, height);
        for child in &self.children {
            // A failing child is skipped, same best-effort policy as the
            // canvas content list.
            let Some(layer) = child.rasterize(width, height) else {
                continue;
            };
            if layer.width != width || layer.height != height {
                continue;
            }
            premul_over_in_place(&mut out.data, &layer.data);
        }
        Some(out)
    }
}

/// Source-over compositing of equal-size premultiplied RGBA8 buffers.
///
/// Callers guarantee equal lengths; mismatched input is skipped wholesale.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
}

/// Clipped copy of a premultiplied RGBA8 bitmap into a destination bitmap at
/// `(ox, oy)`. Out-of-bounds source regions are dropped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn blit_premul(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    ox: i64,
    oy: i64,
) {
    for sy in 0..src_h as i64 {
        let dy = oy + sy;
        if dy < 0 || dy >= dst_h as i64 {
            continue;
        }
        for sx in 0..src_w as i64 {
            let dx = ox + sx;
            if dx < 0 || dx >= dst_w as i64 {
                continue;
            }
            let si = ((sy as usize) * (src_w as usize) + (sx as usize)) * 4;
            let di = ((dy as usize) * (dst_w as usize) + (dx as usize)) * 4;
            dst[di..di + 4].copy_from_slice(&src[si..si + 4]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/drawable.rs"]
mod tests;
