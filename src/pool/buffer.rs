use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use smallvec::SmallVec;

use crate::foundation::core::{BufferDescriptor, Extent, PixelFormat};
use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};

/// Row stride alignment in bytes. Strides may exceed `width * bytes_per_sample`
/// to satisfy this boundary.
const ROW_ALIGN: usize = 64;

/// Byte layout of one plane inside a buffer's backing storage.
///
/// Rows cover the padded region (`extent.left + width + extent.right` samples);
/// the accessors on the lock guards expose the logical region only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Logical samples per row.
    pub width: u32,
    /// Logical rows.
    pub height: u32,
    /// Bytes per sample (4 for packed ARGB, 1 for luma, 2 for interleaved CbCr).
    pub bytes_per_sample: usize,
    /// Bytes per padded row.
    pub stride: usize,
    /// Byte offset of the padded plane region in the backing storage (the
    /// plane's base address).
    pub offset: usize,
    /// Byte offset of the logical `(0, 0)` sample in the backing storage.
    origin: usize,
}

impl PlaneLayout {
    /// Bytes covered by one logical row (`width * bytes_per_sample`).
    pub fn row_bytes(&self) -> usize {
        (self.width as usize) * self.bytes_per_sample
    }

    fn build(
        width: u32,
        height: u32,
        extent: Extent,
        bytes_per_sample: usize,
        offset: usize,
    ) -> ChromaplaneResult<Self> {
        let padded_w = (extent.left as usize)
            .checked_add(width as usize)
            .and_then(|v| v.checked_add(extent.right as usize))
            .ok_or_else(|| ChromaplaneError::pool_creation("plane row width overflows"))?;
        let row_bytes = padded_w
            .checked_mul(bytes_per_sample)
            .ok_or_else(|| ChromaplaneError::pool_creation("plane row bytes overflow"))?;
        let stride = row_bytes
            .checked_add(ROW_ALIGN - 1)
            .map(|v| (v / ROW_ALIGN) * ROW_ALIGN)
            .ok_or_else(|| ChromaplaneError::pool_creation("plane stride overflows"))?;
        let origin = offset
            + (extent.top as usize) * stride
            + (extent.left as usize) * bytes_per_sample;
        Ok(Self {
            width,
            height,
            bytes_per_sample,
            stride,
            offset,
            origin,
        })
    }

    fn padded_rows(&self, extent: Extent) -> usize {
        (extent.top as usize) + (self.height as usize) + (extent.bottom as usize)
    }

    fn byte_len(&self, extent: Extent) -> usize {
        self.padded_rows(extent).saturating_mul(self.stride)
    }
}

/// Compute the plane table and total storage length for a descriptor.
pub(crate) fn plane_layouts(
    desc: &BufferDescriptor,
) -> ChromaplaneResult<(SmallVec<[PlaneLayout; 2]>, usize)> {
    let mut planes = SmallVec::<[PlaneLayout; 2]>::new();
    match desc.format {
        PixelFormat::PackedArgb8 => {
            let p = PlaneLayout::build(desc.width, desc.height, desc.extent, 4, 0)?;
            let total = p.byte_len(desc.extent);
            planes.push(p);
            Ok((planes, total))
        }
        PixelFormat::PlanarYCbCr420 => {
            let luma = PlaneLayout::build(desc.width, desc.height, desc.extent, 1, 0)?;
            let luma_len = luma.byte_len(desc.extent);

            let chroma_extent = desc.extent.halved_ceil();
            let chroma = PlaneLayout::build(
                desc.width.div_ceil(2),
                desc.height.div_ceil(2),
                chroma_extent,
                2,
                luma_len,
            )?;
            let total = luma_len
                .checked_add(chroma.byte_len(chroma_extent))
                .ok_or_else(|| ChromaplaneError::pool_creation("buffer byte length overflows"))?;
            planes.push(luma);
            planes.push(chroma);
            Ok((planes, total))
        }
    }
}

/// A pooled raster buffer: one backing storage region split into one plane
/// (packed formats) or two independently strided planes (the planar format).
///
/// Storage access goes through non-blocking lock guards; a buffer drawn from a
/// [`crate::pool::manager::BufferPool`] is exclusively owned by its caller
/// until released back to the pool.
#[derive(Debug)]
pub struct PixelBuffer {
    desc: BufferDescriptor,
    planes: SmallVec<[PlaneLayout; 2]>,
    data: RwLock<Vec<u8>>,
}

impl PixelBuffer {
    /// Build a buffer over pre-sized storage. `storage.len()` must equal the
    /// layout length for `desc`.
    pub(crate) fn from_storage(
        desc: BufferDescriptor,
        storage: Vec<u8>,
    ) -> ChromaplaneResult<Self> {
        let (planes, total) = plane_layouts(&desc)?;
        if storage.len() != total {
            return Err(ChromaplaneError::allocation(format!(
                "storage length {} does not match layout length {total}",
                storage.len()
            )));
        }
        Ok(Self {
            desc,
            planes,
            data: RwLock::new(storage),
        })
    }

    /// Descriptor this buffer was allocated for.
    pub fn descriptor(&self) -> BufferDescriptor {
        self.desc
    }

    /// Logical width in pixels.
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Logical height in pixels.
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Padding extent, exactly as supplied at allocation time.
    pub fn extent(&self) -> Extent {
        self.desc.extent
    }

    /// Pixel format of the buffer.
    pub fn format(&self) -> PixelFormat {
        self.desc.format
    }

    /// Number of planes (1 for packed formats, 2 for the planar format).
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Layout of plane `index`, if present.
    pub fn plane(&self, index: usize) -> Option<&PlaneLayout> {
        self.planes.get(index)
    }

    /// Lock the buffer storage for read-only access.
    ///
    /// Fails with a lock error when a writer currently holds the storage or a
    /// previous holder panicked mid-write.
    pub fn lock_readable(&self) -> ChromaplaneResult<PlaneReader<'_>> {
        match self.data.try_read() {
            Ok(guard) => Ok(PlaneReader {
                guard,
                planes: &self.planes,
            }),
            Err(TryLockError::WouldBlock) => Err(ChromaplaneError::lock(
                "buffer memory is locked for writing",
            )),
            Err(TryLockError::Poisoned(_)) => {
                Err(ChromaplaneError::lock("buffer storage is poisoned"))
            }
        }
    }

    /// Lock the buffer storage for writable access.
    pub fn lock_writable(&self) -> ChromaplaneResult<PlaneWriter<'_>> {
        match self.data.try_write() {
            Ok(guard) => Ok(PlaneWriter {
                guard,
                planes: &self.planes,
            }),
            Err(TryLockError::WouldBlock) => {
                Err(ChromaplaneError::lock("buffer memory is already locked"))
            }
            Err(TryLockError::Poisoned(_)) => {
                Err(ChromaplaneError::lock("buffer storage is poisoned"))
            }
        }
    }

    /// Tear the buffer down into its descriptor and backing storage for pool
    /// recycling. Returns `None` for poisoned storage, which must not be
    /// reused.
    pub(crate) fn into_storage(self) -> Option<(BufferDescriptor, Vec<u8>)> {
        match self.data.into_inner() {
            Ok(storage) => Some((self.desc, storage)),
            Err(_) => None,
        }
    }
}

/// Read-only view over a locked buffer's planes.
pub struct PlaneReader<'a> {
    guard: RwLockReadGuard<'a, Vec<u8>>,
    planes: &'a [PlaneLayout],
}

impl PlaneReader<'_> {
    /// Logical row `y` of plane `plane` (`row_bytes` bytes).
    pub fn row(&self, plane: usize, y: u32) -> &[u8] {
        let p = &self.planes[plane];
        assert!(y < p.height, "row {y} out of bounds for plane of height {}", p.height);
        let start = p.origin + (y as usize) * p.stride;
        &self.guard[start..start + p.row_bytes()]
    }
}

/// Writable view over a locked buffer's planes.
pub struct PlaneWriter<'a> {
    guard: RwLockWriteGuard<'a, Vec<u8>>,
    planes: &'a [PlaneLayout],
}

impl PlaneWriter<'_> {
    /// Logical row `y` of plane `plane`, writable.
    pub fn row_mut(&mut self, plane: usize, y: u32) -> &mut [u8] {
        let p = &self.planes[plane];
        assert!(y < p.height, "row {y} out of bounds for plane of height {}", p.height);
        let start = p.origin + (y as usize) * p.stride;
        let end = start + p.row_bytes();
        &mut self.guard[start..end]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/buffer.rs"]
mod tests;
