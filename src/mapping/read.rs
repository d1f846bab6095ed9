use std::collections::BTreeSet;

use crate::codec::{DecodedFrame, GifSource};
use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::diag::{Diagnostics, Warning};
use crate::foundation::error::{GifAnimError, GifAnimResult};
use crate::mapping::loop_ext::{decode_loop_count, resolve_loop_counts};
use crate::metadata::nodes::{
    FrameMetadata, GraphicControlExtension, ImageDescriptor, LogicalScreenDescriptor,
    StreamMetadata, trace_json,
};
use crate::model::animation::{Animation, ColorResolution, DisposalMethod, Frame};

/// Duration used when a frame has no graphic control extension.
pub const DEFAULT_DURATION_MS: u32 = 1000;
/// Delay used when `delayTime` is present but unparsable.
pub const DEFAULT_DELAY_CS: u32 = 10;

/// Pull every frame out of `source` and build an [`Animation`].
///
/// Fails only when the stream has no usable logical screen descriptor; everything else is
/// recovered with a default and reported to `diag`.
#[tracing::instrument(skip_all)]
pub fn read_animation<S: GifSource + ?Sized>(
    source: &mut S,
    diag: &mut Diagnostics,
) -> GifAnimResult<Animation> {
    let stream = source.stream_metadata()?;
    let mut builder = AnimationBuilder::new(&stream)?;
    let count = source.frame_count()?;
    for index in 0..count {
        let frame = source.read_frame(index)?;
        builder.push(index, frame, diag);
    }
    Ok(builder.finish(diag))
}

/// Build an [`Animation`] from already decoded frames.
#[tracing::instrument(skip_all)]
pub fn animation_from_metadata(
    stream: &StreamMetadata,
    frames: impl IntoIterator<Item = DecodedFrame>,
    diag: &mut Diagnostics,
) -> GifAnimResult<Animation> {
    let mut builder = AnimationBuilder::new(stream)?;
    for (index, frame) in frames.into_iter().enumerate() {
        builder.push(index, frame, diag);
    }
    Ok(builder.finish(diag))
}

/// Single-pass accumulator; loop counts are resolved once all frames are in.
struct AnimationBuilder {
    canvas: Size,
    color_resolution: Option<ColorResolution>,
    frames: Vec<Frame>,
    loop_counts: BTreeSet<u32>,
}

impl AnimationBuilder {
    fn new(stream: &StreamMetadata) -> GifAnimResult<Self> {
        tracing::trace!(stream = %trace_json(stream), "stream metadata read");
        let lsd = stream.logical_screen.as_ref().ok_or_else(|| {
            GifAnimError::missing_descriptor(format!("{} not found", LogicalScreenDescriptor::NAME))
        })?;
        let (Some(width), Some(height)) = (lsd.width(), lsd.height()) else {
            return Err(GifAnimError::missing_descriptor(format!(
                "cannot read {} size (width '{}', height '{}')",
                LogicalScreenDescriptor::NAME,
                lsd.logical_screen_width,
                lsd.logical_screen_height
            )));
        };
        let color_resolution = lsd
            .color_resolution()
            .and_then(|v| ColorResolution::new(v).ok());

        Ok(Self {
            canvas: Size::new(width, height),
            color_resolution,
            frames: Vec::new(),
            loop_counts: BTreeSet::new(),
        })
    }

    fn push(&mut self, index: usize, decoded: DecodedFrame, diag: &mut Diagnostics) {
        let DecodedFrame { pixels, metadata } = decoded;
        tracing::trace!(frame = index, metadata = %trace_json(&metadata), "frame metadata read");

        let (duration_ms, disposal) = timing(index, metadata.graphic_control.as_ref(), diag);

        if let Some(count) = metadata
            .loop_extension()
            .and_then(|ext| decode_loop_count(&ext.user_object))
        {
            self.loop_counts.insert(count);
        }

        let canvas = self.canvas.as_rect();
        let declared = placement(&metadata).unwrap_or_else(|| {
            diag.warn(Warning::MissingImageDescriptor {
                frame: index,
                canvas,
            });
            canvas
        });

        let (w, h) = pixels.dimensions();
        let decoded_size = Size::new(w, h);
        if decoded_size != declared.size() {
            diag.warn(Warning::SizeMismatch {
                frame: index,
                declared,
                decoded: decoded_size,
            });
        }
        if !canvas.contains_rect(declared) {
            diag.warn(Warning::FrameOutsideCanvas {
                frame: index,
                declared,
                canvas,
            });
        }

        self.frames.push(Frame {
            pixels,
            duration_ms,
            disposal,
            offset: Point::new(declared.x, declared.y),
        });
    }

    fn finish(self, diag: &mut Diagnostics) -> Animation {
        let loop_mode = resolve_loop_counts(&self.loop_counts, diag);
        Animation {
            canvas: self.canvas,
            frames: self.frames,
            loop_mode,
            color_resolution: self.color_resolution,
        }
    }
}

fn timing(
    index: usize,
    gce: Option<&GraphicControlExtension>,
    diag: &mut Diagnostics,
) -> (u32, DisposalMethod) {
    let Some(gce) = gce else {
        diag.warn(Warning::MissingGraphicControl { frame: index });
        return (DEFAULT_DURATION_MS, DisposalMethod::None);
    };

    let delay_cs = gce.delay_cs().unwrap_or_else(|| {
        diag.warn(Warning::InvalidDelay {
            frame: index,
            raw: gce.delay_time.clone(),
        });
        DEFAULT_DELAY_CS
    });

    let disposal = DisposalMethod::from_token(&gce.disposal_method).unwrap_or_else(|| {
        if !gce.disposal_method.is_empty() {
            diag.warn(Warning::UnknownDisposal {
                frame: index,
                token: gce.disposal_method.clone(),
            });
        }
        DisposalMethod::None
    });

    (delay_cs.saturating_mul(10), disposal)
}

fn placement(metadata: &FrameMetadata) -> Option<Rect> {
    let id: &ImageDescriptor = metadata.image_descriptor.as_ref()?;
    Some(Rect::new(id.left()?, id.top()?, id.width()?, id.height()?))
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/read.rs"]
mod tests;
