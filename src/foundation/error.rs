use crate::foundation::core::Rect;

/// Convenience result type used across the crate.
pub type GifAnimResult<T> = Result<T, GifAnimError>;

/// Fatal conditions. Anything recoverable is reported as a
/// [`Warning`](crate::Warning) instead.
#[derive(thiserror::Error, Debug)]
pub enum GifAnimError {
    /// The stream has no usable logical screen descriptor, so no canvas exists.
    #[error("missing descriptor: {0}")]
    MissingDescriptor(String),

    /// An animation must carry at least one frame to be written.
    #[error("validation error: animation has no frames")]
    EmptyAnimation,

    /// Canvas dimension does not fit the 16-bit logical screen fields.
    #[error("validation error: canvas {axis} {value} exceeds max {max}")]
    CanvasTooLarge {
        /// `"width"` or `"height"`.
        axis: &'static str,
        /// Offending value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A frame's placement is not fully inside the canvas.
    #[error("validation error: bounds of frame {index} {frame} are outside the logical screen {canvas}")]
    FrameOutOfBounds {
        /// Zero-based frame index.
        index: usize,
        /// Frame placement (offset + pixel buffer size).
        frame: Rect,
        /// Canvas rectangle anchored at the origin.
        canvas: Rect,
    },

    /// Invalid user-provided model values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from the bitstream codec or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifAnimError {
    /// Build a [`GifAnimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifAnimError::MissingDescriptor`] value.
    pub fn missing_descriptor(msg: impl Into<String>) -> Self {
        Self::MissingDescriptor(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
