//! Pooled raster-buffer allocation.
//!
//! One backing pool exists per distinct [`crate::BufferDescriptor`]; buffers
//! are drawn from and released back to their backing pool to amortize
//! allocation cost.

/// Pixel buffers, plane layouts, and lock guards.
pub mod buffer;
/// The descriptor-keyed pool manager.
pub mod manager;
