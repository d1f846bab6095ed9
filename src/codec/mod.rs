//! Boundary with the bitstream codec.
//!
//! The mappers never touch bytes. A codec hands them metadata records plus decoded pixel
//! buffers ([`GifSource`]), or receives the same from them ([`GifSink`]).

use image::RgbaImage;

use crate::foundation::error::GifAnimResult;
use crate::metadata::nodes::{FrameMetadata, StreamMetadata};

/// `gif`-crate backed reader/writer.
#[cfg(feature = "gif-codec")]
pub mod gif_io;
/// In-memory codec for tests and metadata-level round trips.
pub mod memory;

/// One frame as produced by a codec: pixels plus the metadata found alongside them.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedFrame {
    /// Decoded RGBA pixels, sized as the codec decoded them.
    pub pixels: RgbaImage,
    /// Metadata records of this frame.
    pub metadata: FrameMetadata,
}

/// Decode direction of the codec contract.
pub trait GifSource {
    /// Stream-level metadata (index 0 of the stream).
    fn stream_metadata(&mut self) -> GifAnimResult<StreamMetadata>;
    /// Number of frames in the stream.
    fn frame_count(&mut self) -> GifAnimResult<usize>;
    /// Decode frame `index` (`0..frame_count()`).
    fn read_frame(&mut self, index: usize) -> GifAnimResult<DecodedFrame>;
}

/// Encode direction of the codec contract.
///
/// Ordering contract: `begin` once, then `push_frame` with strictly increasing indices starting
/// at 0, then `end` once. The sink is responsible for terminating the stream in `end`.
pub trait GifSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, stream: &StreamMetadata) -> GifAnimResult<()>;
    /// Append one encoded frame.
    fn push_frame(
        &mut self,
        index: usize,
        pixels: &RgbaImage,
        metadata: &FrameMetadata,
    ) -> GifAnimResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> GifAnimResult<()>;
}
