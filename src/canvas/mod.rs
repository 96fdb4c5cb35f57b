//! Drawable canvases over pooled packed-ARGB buffers.

/// Image decoding to premultiplied RGBA8.
pub mod decode;
/// The drawable-content contract and built-in drawables.
pub mod drawable;
/// The canvas surface itself.
pub mod surface;
/// Text layout and the text drawable.
pub mod text;
