//! chromaplane renders drawable content into pooled raster buffers and
//! converts them into planar video frames.
//!
//! The pipeline turns "something that can be rasterized into a rectangle"
//! into a biplanar full-range BT.709 4:2:0 buffer ready for a media
//! consumer:
//!
//! 1. **Allocate**: draw a packed-ARGB [`PixelBuffer`] from a [`BufferPool`]
//!    keyed by geometry, padding extent, and format
//! 2. **Draw**: accumulate [`Drawable`] content on a [`Canvas`] and flatten
//!    it to pixels with [`Canvas::draw_contents`]
//! 3. **Convert**: produce the planar 4:2:0 buffer via [`FormatConverter`]
//! 4. **Assemble** (optional): wrap the converted buffer with
//!    timing/orientation metadata via [`FrameAssembler`]
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic conversion**: the colorspace transform is single-pass
//!   fixed-point math; identical input pixels produce byte-identical output.
//! - **Explicit pooling**: the pool is an object passed by reference, never a
//!   process-wide singleton; `&mut self` receivers make cross-thread sharing
//!   require caller-side serialization.
//! - **Thread affinity**: canvases are pinned to their creating thread;
//!   [`RenderThread`] provides the designated-thread executor for them.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Canvases, drawable content, and image decoding.
pub mod canvas;
/// Colorspace and subsampling conversion.
pub mod convert;
/// Designated-rendering-thread executor.
pub mod exec;
/// Frame envelopes for streaming consumers.
pub mod frame;
/// Pooled buffer allocation.
pub mod pool;

pub use crate::foundation::core::{BufferDescriptor, Extent, PixelFormat, Point, Rect};
pub use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};

pub use crate::canvas::decode::{DecodedImage, decode_image};
pub use crate::canvas::drawable::{
    Drawable, ImageDrawable, ImageSource, RasterizedContent, SolidDrawable, StackDrawable,
};
pub use crate::canvas::surface::Canvas;
pub use crate::canvas::text::{TextBrush, TextDrawable, TextLayoutEngine};
pub use crate::convert::ycbcr::FormatConverter;
pub use crate::exec::render_thread::RenderThread;
pub use crate::frame::envelope::{
    AttachmentMode, FrameAssembler, FrameEnvelope, MediaTime, SampleTiming, VideoFormat,
};
pub use crate::pool::buffer::{PixelBuffer, PlaneLayout, PlaneReader, PlaneWriter};
pub use crate::pool::manager::{BufferPool, BufferPoolOpts, BufferPoolStats};
