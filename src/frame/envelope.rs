use crate::foundation::core::PixelFormat;
use crate::pool::buffer::PixelBuffer;

/// Rational media timestamp. A timescale of zero marks the value as carrying
/// no time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaTime {
    /// Tick count.
    pub value: i64,
    /// Ticks per second; zero means invalid.
    pub timescale: u32,
}

impl MediaTime {
    /// Timestamp carrying no time.
    pub const INVALID: Self = Self {
        value: 0,
        timescale: 0,
    };

    /// Timestamp of `value` ticks at `timescale` ticks per second.
    pub fn new(value: i64, timescale: u32) -> Self {
        Self { value, timescale }
    }

    /// Whether the timestamp carries a time.
    pub fn is_valid(self) -> bool {
        self.timescale != 0
    }
}

/// Presentation timing attached to a frame envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleTiming {
    /// Display duration of the frame.
    pub duration: MediaTime,
    /// Presentation timestamp.
    pub presentation: MediaTime,
    /// Decode timestamp.
    pub decode: MediaTime,
}

impl SampleTiming {
    /// Timing record carrying no times. This pipeline does not assign real
    /// presentation timestamps; timing is the downstream consumer's
    /// responsibility.
    pub const INVALID: Self = Self {
        duration: MediaTime::INVALID,
        presentation: MediaTime::INVALID,
        decode: MediaTime::INVALID,
    };
}

/// Propagation policy for envelope attachments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentMode {
    /// The attachment follows derived buffers.
    ShouldPropagate,
    /// The attachment is scoped to this one envelope.
    ShouldNotPropagate,
}

/// Video format description derived from a buffer's geometry and format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoFormat {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format tag of the wrapped buffer.
    pub format: PixelFormat,
}

impl VideoFormat {
    /// Whether the format tag identifies full-range BT.709 4:2:0 content.
    pub fn is_full_range_420(&self) -> bool {
        matches!(self.format, PixelFormat::PlanarYCbCr420)
    }
}

/// A converted buffer wrapped with presentation-timing and orientation
/// metadata for a streaming consumer.
#[derive(Debug)]
pub struct FrameEnvelope {
    buffer: PixelBuffer,
    format: VideoFormat,
    timing: SampleTiming,
    orientation: i64,
    orientation_mode: AttachmentMode,
}

impl FrameEnvelope {
    /// The wrapped pixel buffer.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Format description derived at wrap time.
    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Timing record; always invalid for envelopes built by
    /// [`FrameAssembler::wrap`].
    pub fn timing(&self) -> SampleTiming {
        self.timing
    }

    /// Orientation attachment value.
    pub fn orientation(&self) -> i64 {
        self.orientation
    }

    /// Propagation mode of the orientation attachment.
    pub fn orientation_mode(&self) -> AttachmentMode {
        self.orientation_mode
    }

    /// Unwrap the envelope back into its buffer.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

/// Builds frame envelopes around converted planar buffers.
#[derive(Debug, Default)]
pub struct FrameAssembler;

impl FrameAssembler {
    /// Create an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Wrap `buffer` with an invalid timing record and an orientation
    /// attachment scoped to this envelope (it does not propagate to derived
    /// buffers).
    ///
    /// # Panics
    ///
    /// Panics when the buffer's plane table does not match its format; a
    /// malformed buffer is a programming error, not a recoverable condition.
    pub fn wrap(&self, buffer: PixelBuffer, orientation: i64) -> FrameEnvelope {
        assert_eq!(
            buffer.plane_count(),
            buffer.format().plane_count(),
            "buffer plane table does not match its format"
        );
        let format = VideoFormat {
            width: buffer.width(),
            height: buffer.height(),
            format: buffer.format(),
        };
        FrameEnvelope {
            buffer,
            format,
            timing: SampleTiming::INVALID,
            orientation,
            orientation_mode: AttachmentMode::ShouldNotPropagate,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/envelope.rs"]
mod tests;
