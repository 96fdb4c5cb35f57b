use std::marker::PhantomData;

use crate::canvas::drawable::{Drawable, ImageSource, premul_over_in_place};
use crate::convert::ycbcr::FormatConverter;
use crate::foundation::core::{BufferDescriptor, Extent, PixelFormat};
use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};
use crate::frame::envelope::{FrameAssembler, FrameEnvelope};
use crate::pool::buffer::PixelBuffer;
use crate::pool::manager::BufferPool;

/// A rectangular drawable surface over one pooled packed-ARGB buffer.
///
/// The canvas accumulates [`Drawable`] content and flattens it to raster
/// pixels on demand. Canvases must live on the thread that created them (they
/// are not `Send`); buffer pooling and format conversion have no such
/// affinity.
pub struct Canvas {
    width: u32,
    height: u32,
    extent: Extent,
    buffer: PixelBuffer,
    content: Vec<Box<dyn Drawable>>,
    /// Intermediate premultiplied RGBA8 composite, `width * height * 4` bytes.
    scratch: Vec<u8>,
    /// Pins the canvas to its creating thread.
    _render_thread: PhantomData<*const ()>,
}

impl Canvas {
    /// Create a canvas of `width`×`height` with the given padding extent,
    /// drawing its packed-ARGB buffer from `pool`.
    pub fn create(
        width: u32,
        height: u32,
        extent: Extent,
        pool: &mut BufferPool,
    ) -> ChromaplaneResult<Self> {
        let desc = BufferDescriptor::new(width, height, extent, PixelFormat::PackedArgb8)?;
        let buffer = pool.acquire(desc)?;

        // Probe the buffer lock once during construction, mirroring the
        // lock/unlock bracket around surface binding.
        {
            let _probe = buffer.lock_readable()?;
        }

        // The compositing surface addresses pixels in u16 coordinate space.
        if u16::try_from(width).is_err() || u16::try_from(height).is_err() {
            return Err(ChromaplaneError::context_creation(format!(
                "canvas {width}x{height} exceeds the drawable coordinate space"
            )));
        }
        let scratch_len = (width as usize) * (height as usize) * 4;
        let mut scratch = Vec::new();
        scratch.try_reserve_exact(scratch_len).map_err(|_| {
            ChromaplaneError::context_creation(format!(
                "cannot bind a {scratch_len}-byte compositing surface"
            ))
        })?;
        scratch.resize(scratch_len, 0);

        Ok(Self {
            width,
            height,
            extent,
            buffer,
            content: Vec::new(),
            scratch,
            _render_thread: PhantomData,
        })
    }

    /// Logical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Padding extent of the underlying buffer.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The canvas's packed-ARGB pixel buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Append a content layer. Later additions draw on top. The buffer is
    /// unaffected until [`Canvas::draw_contents`] runs.
    pub fn add_content(&mut self, drawable: Box<dyn Drawable>) {
        self.content.push(drawable);
    }

    /// Remove all accumulated content layers. Buffer pixels are unaffected
    /// until the next [`Canvas::draw_contents`].
    pub fn clear_content(&mut self) {
        self.content.clear();
    }

    /// Flatten the content list into the pixel buffer.
    ///
    /// Content is rasterized in append order into an intermediate image the
    /// size of the canvas, then every visible pixel of the buffer is rewritten
    /// from that image. A layer that fails to rasterize is skipped without
    /// error; compositing is best-effort per layer.
    #[tracing::instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn draw_contents(&mut self) -> ChromaplaneResult<()> {
        self.scratch.fill(0);
        let expected = self.scratch.len();
        for drawable in &self.content {
            match drawable.rasterize(self.width, self.height) {
                Some(layer)
                    if layer.width == self.width
                        && layer.height == self.height
                        && layer.data.len() == expected =>
                {
                    premul_over_in_place(&mut self.scratch, &layer.data);
                }
                Some(_) => {
                    tracing::debug!("drawable produced a mismatched raster, skipping layer");
                }
                None => {
                    tracing::debug!("drawable did not rasterize, skipping layer");
                }
            }
        }

        let mut writer = self.buffer.lock_writable()?;
        for y in 0..self.height {
            let row = writer.row_mut(0, y);
            let src_base = (y as usize) * (self.width as usize) * 4;
            for x in 0..self.width as usize {
                let s = &self.scratch[src_base + x * 4..src_base + x * 4 + 4];
                let d = &mut row[x * 4..x * 4 + 4];
                // Alpha-skip-first packed ARGB: the alpha byte is carried
                // opaque, colors are the composite over black.
                d[0] = 0xFF;
                d[1] = s[0];
                d[2] = s[1];
                d[3] = s[2];
            }
        }
        Ok(())
    }

    /// Blit a source image directly into the canvas rectangle, bypassing the
    /// content list.
    ///
    /// No scaling is performed: the copy covers the overlap of the source and
    /// canvas rectangles, and a dimension mismatch leaves the remainder of the
    /// previous frame in place (cropping is the caller's responsibility).
    pub fn draw_image(&mut self, image: &dyn ImageSource) -> ChromaplaneResult<()> {
        let (src_w, src_h) = image.dimensions();
        let src = image.rgba8_premul();

        let mut writer = self.buffer.lock_writable()?;
        let copy_w = src_w.min(self.width) as usize;
        let copy_h = src_h.min(self.height);
        for y in 0..copy_h {
            let row = writer.row_mut(0, y);
            let src_base = (y as usize) * (src_w as usize) * 4;
            for x in 0..copy_w {
                let s = &src[src_base + x * 4..src_base + x * 4 + 4];
                let d = &mut row[x * 4..x * 4 + 4];
                d[0] = 0xFF;
                d[1] = s[0];
                d[2] = s[1];
                d[3] = s[2];
            }
        }
        Ok(())
    }

    /// Produce a planar full-range 4:2:0 buffer from the current canvas
    /// pixels.
    pub fn convert(
        &self,
        converter: &FormatConverter,
        pool: &mut BufferPool,
    ) -> ChromaplaneResult<PixelBuffer> {
        converter.convert(self, pool)
    }

    /// Convert the canvas and wrap the result in a frame envelope carrying
    /// `orientation`.
    pub fn wrap_into_envelope(
        &self,
        converter: &FormatConverter,
        assembler: &FrameAssembler,
        pool: &mut BufferPool,
        orientation: i64,
    ) -> ChromaplaneResult<FrameEnvelope> {
        let converted = converter.convert(self, pool)?;
        Ok(assembler.wrap(converted, orientation))
    }

    /// Destroy the canvas, keeping its pixel buffer alive.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/surface.rs"]
mod tests;
