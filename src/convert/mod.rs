//! Packed-ARGB to planar 4:2:0 YCbCr conversion.

/// The fixed full-range BT.709 converter.
pub mod ycbcr;
