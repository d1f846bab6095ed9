use std::fmt;

use crate::foundation::core::{Rect, Size};

/// A recoverable condition. Processing continued with a documented default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// Frame had no graphic control extension; 1000 ms and disposal `None` were used.
    MissingGraphicControl {
        /// Zero-based frame index.
        frame: usize,
    },
    /// `delayTime` could not be parsed; 10 centiseconds were used.
    InvalidDelay {
        /// Zero-based frame index.
        frame: usize,
        /// Raw attribute value.
        raw: String,
    },
    /// Disposal token outside the known vocabulary; disposal `None` was used.
    UnknownDisposal {
        /// Zero-based frame index.
        frame: usize,
        /// Raw attribute value.
        token: String,
    },
    /// Image descriptor absent or unparsable; the full canvas was used as placement.
    MissingImageDescriptor {
        /// Zero-based frame index.
        frame: usize,
        /// Placement that was substituted.
        canvas: Rect,
    },
    /// Decoded pixel buffer size differs from the declared image size.
    SizeMismatch {
        /// Zero-based frame index.
        frame: usize,
        /// Placement declared in metadata.
        declared: Rect,
        /// Size of the decoded buffer.
        decoded: Size,
    },
    /// Declared placement is at least partially outside the logical screen.
    FrameOutsideCanvas {
        /// Zero-based frame index.
        frame: usize,
        /// Placement declared in metadata.
        declared: Rect,
        /// Logical screen rectangle.
        canvas: Rect,
    },
    /// No NETSCAPE2.0 loop extension on any frame; loop forever was used.
    MissingLoopExtension,
    /// Frames carried different loop counts; the maximum was used.
    ConflictingLoopCounts {
        /// Distinct observed counts in ascending order.
        observed: Vec<u32>,
        /// Count that was chosen.
        chosen: u32,
    },
    /// Loop count does not fit the 16-bit field; loop forever was encoded.
    LoopCountOutOfRange {
        /// Requested count.
        count: i64,
    },
    /// Frame duration exceeds the 16-bit centisecond field and was saturated.
    DelayClamped {
        /// Zero-based frame index.
        frame: usize,
        /// Requested duration.
        duration_ms: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingGraphicControl { frame } => write!(
                f,
                "GraphicControlExtension not found for frame {frame}; duration and disposal method set to default"
            ),
            Warning::InvalidDelay { frame, raw } => write!(
                f,
                "frame {frame} has unparsable delayTime '{raw}'; using 10 centiseconds"
            ),
            Warning::UnknownDisposal { frame, token } => write!(
                f,
                "frame {frame} has unknown disposal method '{token}'; using none"
            ),
            Warning::MissingImageDescriptor { frame, canvas } => write!(
                f,
                "ImageDescriptor missing or unparsable for frame {frame}; placing it at {canvas}"
            ),
            Warning::SizeMismatch {
                frame,
                declared,
                decoded,
            } => write!(
                f,
                "frame {frame} dimensions from metadata {declared} do not match decoded size {decoded}; image might contain corrupt data"
            ),
            Warning::FrameOutsideCanvas {
                frame,
                declared,
                canvas,
            } => write!(
                f,
                "frame {frame} dimensions from metadata {declared} are at least partially outside logical screen {canvas}; image might contain corrupt data"
            ),
            Warning::MissingLoopExtension => write!(
                f,
                "no valid NETSCAPE2.0 application extension; defaulting to 0 (loop forever)"
            ),
            Warning::ConflictingLoopCounts { observed, chosen } => {
                write!(
                    f,
                    "conflicting NETSCAPE2.0 loop counts {observed:?}; taking the maximum value of {chosen}"
                )?;
                if *chosen == 0 {
                    write!(f, " (loop forever)")?;
                }
                Ok(())
            }
            Warning::LoopCountOutOfRange { count } => write!(
                f,
                "loop count {count} does not fit into two bytes; defaulting to 0 (loop forever)"
            ),
            Warning::DelayClamped { frame, duration_ms } => write!(
                f,
                "frame {frame} duration {duration_ms} ms exceeds the maximum delay; saturated to 655350 ms"
            ),
        }
    }
}

/// Side channel for recoverable conditions.
///
/// Every pushed warning is also emitted as a `tracing` event at WARN level.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(target: "gifanim", "{warning}");
        self.warnings.push(warning);
    }

    /// Borrow the collected warnings in the order they were raised.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// True when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/diag.rs"]
mod tests;
