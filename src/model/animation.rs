use std::num::NonZeroU32;

use image::RgbaImage;

use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::{GifAnimError, GifAnimResult};

/// A decoded animated GIF: logical screen, frames, and repeat behaviour.
///
/// Owns its pixel buffers; nothing in it points back into the stream it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    /// Logical screen every frame is composited onto.
    pub canvas: Size,
    /// Frames in display order.
    pub frames: Vec<Frame>,
    /// Whole-animation repeat behaviour.
    pub loop_mode: LoopMode,
    /// Bits per primary color; `None` lets the encoder choose.
    pub color_resolution: Option<ColorResolution>,
}

impl Animation {
    /// Animation that loops forever with encoder-chosen color resolution.
    pub fn new(canvas: Size, frames: Vec<Frame>) -> Self {
        Self {
            canvas,
            frames,
            loop_mode: LoopMode::Forever,
            color_resolution: None,
        }
    }

    /// Replace the repeat behaviour.
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Set an explicit color resolution.
    pub fn with_color_resolution(mut self, color_resolution: ColorResolution) -> Self {
        self.color_resolution = Some(color_resolution);
        self
    }

    /// Canvas rectangle anchored at the origin.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas.as_rect()
    }

    /// Sum of all frame durations.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }
}

/// One image of the animation plus its timing and placement.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Fully decoded RGBA pixels; may be smaller than the canvas.
    pub pixels: RgbaImage,
    /// Display time. Stored by GIF in centiseconds, so only 10 ms granularity survives a round trip.
    pub duration_ms: u32,
    /// What happens to this frame's pixels before the next frame is drawn.
    pub disposal: DisposalMethod,
    /// Top-left corner of this frame inside the canvas.
    pub offset: Point,
}

impl Frame {
    /// Frame at the canvas origin with disposal [`DisposalMethod::None`].
    pub fn new(pixels: RgbaImage, duration_ms: u32) -> Self {
        Self {
            pixels,
            duration_ms,
            disposal: DisposalMethod::None,
            offset: Point::ZERO,
        }
    }

    /// Replace the disposal method.
    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    /// Move the frame inside the canvas.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Size of the pixel buffer.
    pub fn size(&self) -> Size {
        let (width, height) = self.pixels.dimensions();
        Size::new(width, height)
    }

    /// Placement of this frame inside the canvas.
    pub fn bounds(&self) -> Rect {
        self.size().as_rect_at(self.offset)
    }
}

/// GIF frame disposal method.
///
/// Attributed to the frame being disposed, not the frame drawn after it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DisposalMethod {
    /// No disposal specified.
    #[default]
    None,
    /// Leave the frame in place.
    DoNotDispose,
    /// Clear the frame's area to the background color.
    RestoreToBackground,
    /// Restore the frame's area to what it was before the frame was drawn.
    RestoreToPrevious,
}

impl DisposalMethod {
    /// Metadata token for this method.
    pub fn token(self) -> &'static str {
        match self {
            DisposalMethod::None => "none",
            DisposalMethod::DoNotDispose => "doNotDispose",
            DisposalMethod::RestoreToBackground => "restoreToBackgroundColor",
            DisposalMethod::RestoreToPrevious => "restoreToPrevious",
        }
    }

    /// Parse a metadata token; `None` for anything outside the vocabulary.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "none" => Some(DisposalMethod::None),
            "doNotDispose" => Some(DisposalMethod::DoNotDispose),
            "restoreToBackgroundColor" => Some(DisposalMethod::RestoreToBackground),
            "restoreToPrevious" => Some(DisposalMethod::RestoreToPrevious),
            _ => None,
        }
    }
}

/// Whole-animation repeat behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopMode {
    /// Repeat indefinitely. Encoded as count 0.
    #[default]
    Forever,
    /// Repeat a fixed number of times.
    Times(NonZeroU32),
}

impl LoopMode {
    /// Fixed repeat count; fails for 0 (use [`LoopMode::Forever`]).
    pub fn times(count: u32) -> GifAnimResult<Self> {
        NonZeroU32::new(count)
            .map(LoopMode::Times)
            .ok_or_else(|| GifAnimError::validation("loop times must be >= 1"))
    }

    /// Interpret a raw NETSCAPE loop count; 0 means forever.
    pub fn from_loop_count(count: u32) -> Self {
        NonZeroU32::new(count).map_or(LoopMode::Forever, LoopMode::Times)
    }

    /// Raw NETSCAPE loop count; 0 means forever.
    pub fn loop_count(self) -> u32 {
        match self {
            LoopMode::Forever => 0,
            LoopMode::Times(n) => n.get(),
        }
    }
}

/// Bits per primary color in the original image, `1..=8`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColorResolution(u8);

impl ColorResolution {
    /// Smallest valid value.
    pub const MIN: u8 = 1;
    /// Largest valid value.
    pub const MAX: u8 = 8;

    /// Checked constructor; fails outside `1..=8`.
    pub fn new(value: u8) -> GifAnimResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(GifAnimError::validation(format!(
                "color resolution must be in {}..={}, got {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Bits per primary color.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ColorResolution {
    type Error = GifAnimError;

    fn try_from(value: u8) -> GifAnimResult<Self> {
        Self::new(value)
    }
}

impl From<ColorResolution> for u8 {
    fn from(value: ColorResolution) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/animation.rs"]
mod tests;
