use std::collections::HashMap;

use crate::foundation::core::BufferDescriptor;
use crate::foundation::error::{ChromaplaneError, ChromaplaneResult};
use crate::pool::buffer::{PixelBuffer, plane_layouts};

/// Pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct BufferPoolOpts {
    /// Maximum storages retained per backing pool between acquisitions.
    ///
    /// The default of 1 matches the one-buffer-per-generation allocation
    /// threshold of the pooled allocator contract.
    pub retained_per_pool: usize,
    /// Upper bound in bytes for a single buffer allocation. Requests above
    /// this fail with an allocation error.
    pub max_buffer_bytes: usize,
}

impl Default for BufferPoolOpts {
    fn default() -> Self {
        Self {
            retained_per_pool: 1,
            max_buffer_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Counters describing pool behavior since construction.
#[derive(Debug, Default, Clone)]
pub struct BufferPoolStats {
    /// Storages currently retained across all backing pools.
    pub retained_storages: usize,
    /// Bytes currently retained across all backing pools.
    pub retained_bytes: usize,
    /// Buffers allocated fresh (pool misses).
    pub alloc_buffers: u64,
    /// Bytes allocated fresh.
    pub alloc_bytes: u64,
    /// Buffers dropped on release because their backing pool was full or gone.
    pub dropped_on_release: u64,
}

struct BackingPool {
    byte_len: usize,
    free: Vec<Vec<u8>>,
}

/// Pooled allocator for raster buffers, keyed by [`BufferDescriptor`].
///
/// One backing pool exists per distinct descriptor; each retains at most
/// [`BufferPoolOpts::retained_per_pool`] recycled storages. The cache is not
/// internally synchronized: callers sharing one pool across threads must
/// serialize access themselves, which the `&mut self` receivers enforce.
pub struct BufferPool {
    opts: BufferPoolOpts,
    stats: BufferPoolStats,
    pools: HashMap<BufferDescriptor, BackingPool>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    /// Create a pool with default options.
    pub fn new() -> Self {
        Self::with_opts(BufferPoolOpts::default())
    }

    /// Create a pool with explicit options.
    pub fn with_opts(opts: BufferPoolOpts) -> Self {
        Self {
            opts,
            stats: BufferPoolStats::default(),
            pools: HashMap::new(),
        }
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> BufferPoolStats {
        self.stats.clone()
    }

    /// Draw a buffer for `desc`, creating the backing pool on first use.
    ///
    /// The returned buffer's geometry and format always equal `desc` exactly.
    pub fn acquire(&mut self, desc: BufferDescriptor) -> ChromaplaneResult<PixelBuffer> {
        if desc.width == 0 || desc.height == 0 {
            return Err(ChromaplaneError::pool_creation(format!(
                "cannot construct backing pool for zero-sized descriptor {desc}"
            )));
        }

        if !self.pools.contains_key(&desc) {
            let (_, byte_len) = plane_layouts(&desc)?;
            if byte_len > self.opts.max_buffer_bytes {
                return Err(ChromaplaneError::allocation(format!(
                    "buffer of {byte_len} bytes for {desc} exceeds pool limit"
                )));
            }
            self.pools.insert(
                desc,
                BackingPool {
                    byte_len,
                    free: Vec::new(),
                },
            );
        }
        let pool = self
            .pools
            .get_mut(&desc)
            .ok_or_else(|| ChromaplaneError::pool_creation("backing pool lookup failed"))?;

        if let Some(mut storage) = pool.free.pop() {
            self.stats.retained_storages = self.stats.retained_storages.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(pool.byte_len);
            storage.fill(0);
            tracing::debug!(key = %desc, "recycled pooled buffer");
            return PixelBuffer::from_storage(desc, storage);
        }

        let byte_len = pool.byte_len;
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(byte_len)
            .map_err(|_| ChromaplaneError::allocation(format!("out of memory for {desc}")))?;
        storage.resize(byte_len, 0);

        self.stats.alloc_buffers = self.stats.alloc_buffers.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(byte_len as u64);
        tracing::debug!(key = %desc, bytes = byte_len, "allocated pooled buffer");
        PixelBuffer::from_storage(desc, storage)
    }

    /// Return a buffer's storage to its backing pool for re-use.
    ///
    /// Buffers whose backing pool was flushed, whose pool is already at its
    /// retention cap, or whose storage is poisoned are dropped instead.
    pub fn release(&mut self, buffer: PixelBuffer) {
        let Some((desc, storage)) = buffer.into_storage() else {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        };
        let Some(pool) = self.pools.get_mut(&desc) else {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        };
        if pool.free.len() >= self.opts.retained_per_pool {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        let bytes = pool.byte_len;
        pool.free.push(storage);
        self.stats.retained_storages = self.stats.retained_storages.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }

    /// Drop all cached backing pools.
    ///
    /// Outstanding buffers remain valid; future [`BufferPool::acquire`] calls
    /// re-create backing pools on demand.
    pub fn flush(&mut self) {
        self.pools.clear();
        self.stats.retained_storages = 0;
        self.stats.retained_bytes = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/manager.rs"]
mod tests;
