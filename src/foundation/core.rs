use std::fmt;

use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};

pub use kurbo::{Point, Rect};

/// Extra border pixels reserved around the logical raster region.
///
/// The extent is allocator bookkeeping for downstream processing margins; it is
/// never part of the drawable area.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Extent {
    /// Padding rows above the logical region.
    pub top: u32,
    /// Padding columns left of the logical region.
    pub left: u32,
    /// Padding rows below the logical region.
    pub bottom: u32,
    /// Padding columns right of the logical region.
    pub right: u32,
}

impl Extent {
    /// No padding on any edge.
    pub const ZERO: Self = Self {
        top: 0,
        left: 0,
        bottom: 0,
        right: 0,
    };

    /// Equal padding on all four edges.
    pub fn uniform(px: u32) -> Self {
        Self {
            top: px,
            left: px,
            bottom: px,
            right: px,
        }
    }

    /// Total horizontal padding (`left + right`).
    pub fn horizontal(self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical padding (`top + bottom`).
    pub fn vertical(self) -> u32 {
        self.top.saturating_add(self.bottom)
    }

    /// Extent halved with ceiling rounding, used for half-resolution planes.
    pub(crate) fn halved_ceil(self) -> Self {
        fn half(v: u32) -> u32 {
            v.div_ceil(2)
        }
        Self {
            top: half(self.top),
            left: half(self.left),
            bottom: half(self.bottom),
            right: half(self.right),
        }
    }
}

/// Pixel memory layouts supported by the buffer pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// One plane, four interleaved 8-bit channels per pixel, alpha byte first.
    ///
    /// The alpha byte is carried but skipped by consumers (alpha-skip-first).
    PackedArgb8,
    /// Two planes: full-resolution 8-bit luma plus half-resolution interleaved
    /// Cb/Cr pairs. Full-range BT.709 encoding.
    PlanarYCbCr420,
}

impl PixelFormat {
    /// Number of planes a buffer of this format owns.
    pub fn plane_count(self) -> usize {
        match self {
            Self::PackedArgb8 => 1,
            Self::PlanarYCbCr420 => 2,
        }
    }

    /// Stable four-character format tag used in canonical pool keys.
    pub fn fourcc(self) -> &'static str {
        match self {
            Self::PackedArgb8 => "argb",
            Self::PlanarYCbCr420 => "420f",
        }
    }
}

/// Value type describing a poolable buffer: logical geometry, padding extent,
/// and pixel format.
///
/// Two descriptors are equal iff all five fields match exactly; that equality
/// is the pool lookup key. [`BufferDescriptor::pool_key`] renders the same
/// identity as the canonical string `"W,H:top,left,bottom,right,fourcc"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BufferDescriptor {
    /// Logical width in pixels, must be > 0.
    pub width: u32,
    /// Logical height in pixels, must be > 0.
    pub height: u32,
    /// Padding extent around the logical region.
    pub extent: Extent,
    /// Pixel format of the buffer.
    pub format: PixelFormat,
}

impl BufferDescriptor {
    /// Create a validated descriptor with non-zero logical dimensions.
    pub fn new(
        width: u32,
        height: u32,
        extent: Extent,
        format: PixelFormat,
    ) -> ChromaplaneResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChromaplaneError::validation(
                "buffer width and height must be > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            extent,
            format,
        })
    }

    /// Canonical pool key string for this descriptor.
    pub fn pool_key(&self) -> String {
        format!(
            "{},{}:{},{},{},{},{}",
            self.width,
            self.height,
            self.extent.top,
            self.extent.left,
            self.extent.bottom,
            self.extent.right,
            self.format.fourcc()
        )
    }
}

impl fmt::Display for BufferDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pool_key())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
