//! Frame envelopes for streaming consumers.

/// Envelope, timing, and orientation attachment types.
pub mod envelope;
