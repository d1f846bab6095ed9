use image::RgbaImage;

use crate::codec::{DecodedFrame, GifSink, GifSource};
use crate::foundation::error::{GifAnimError, GifAnimResult};
use crate::metadata::nodes::{FrameMetadata, StreamMetadata};

/// Codec that keeps metadata and pixels in memory instead of producing bytes.
///
/// Whatever is written through [`GifSink`] is replayed unchanged through [`GifSource`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryCodec {
    stream: Option<StreamMetadata>,
    frames: Vec<DecodedFrame>,
    finished: bool,
}

impl InMemoryCodec {
    /// Create an empty codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec preloaded with decoded data, e.g. hand-built metadata for reading.
    pub fn from_parts(stream: StreamMetadata, frames: Vec<DecodedFrame>) -> Self {
        Self {
            stream: Some(stream),
            frames,
            finished: true,
        }
    }

    /// Stream metadata captured in `begin`, if any.
    pub fn stream(&self) -> Option<&StreamMetadata> {
        self.stream.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[DecodedFrame] {
        &self.frames
    }

    /// True once `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl GifSink for InMemoryCodec {
    fn begin(&mut self, stream: &StreamMetadata) -> GifAnimResult<()> {
        self.stream = Some(stream.clone());
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        index: usize,
        pixels: &RgbaImage,
        metadata: &FrameMetadata,
    ) -> GifAnimResult<()> {
        if self.stream.is_none() || self.finished {
            return Err(GifAnimError::validation(
                "push_frame called outside begin/end",
            ));
        }
        if index != self.frames.len() {
            return Err(GifAnimError::validation(format!(
                "frame {index} pushed out of order, expected {}",
                self.frames.len()
            )));
        }
        self.frames.push(DecodedFrame {
            pixels: pixels.clone(),
            metadata: metadata.clone(),
        });
        Ok(())
    }

    fn end(&mut self) -> GifAnimResult<()> {
        self.finished = true;
        Ok(())
    }
}

impl GifSource for InMemoryCodec {
    fn stream_metadata(&mut self) -> GifAnimResult<StreamMetadata> {
        Ok(self.stream.clone().unwrap_or_default())
    }

    fn frame_count(&mut self) -> GifAnimResult<usize> {
        Ok(self.frames.len())
    }

    fn read_frame(&mut self, index: usize) -> GifAnimResult<DecodedFrame> {
        self.frames.get(index).cloned().ok_or_else(|| {
            GifAnimError::Other(anyhow::anyhow!(
                "frame {index} out of range ({} frames)",
                self.frames.len()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/memory.rs"]
mod tests;
