use image::RgbaImage;

use crate::codec::GifSink;
use crate::foundation::core::MAX_DIMENSION;
use crate::foundation::diag::{Diagnostics, Warning};
use crate::foundation::error::{GifAnimError, GifAnimResult};
use crate::mapping::loop_ext::encode_loop_count;
use crate::metadata::nodes::{
    ApplicationExtension, FrameMetadata, GraphicControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, StreamMetadata, trace_json,
};
use crate::model::animation::{Animation, Frame};

/// `pixelAspectRatio` value meaning square pixels.
pub const SQUARE_PIXELS: &str = "0";

/// Everything a codec needs to write one animation.
#[derive(Clone, Debug)]
pub struct EncodedAnimation<'a> {
    /// Stream-level metadata.
    pub stream: StreamMetadata,
    /// Frames in display order.
    pub frames: Vec<EncodedFrame<'a>>,
}

/// One frame ready for the codec.
#[derive(Clone, Debug)]
pub struct EncodedFrame<'a> {
    /// Pixels borrowed from the animation.
    pub pixels: &'a RgbaImage,
    /// Metadata built for this frame.
    pub metadata: FrameMetadata,
}

/// Reject animations that cannot be written as a valid GIF.
pub fn validate_for_write(anim: &Animation) -> GifAnimResult<()> {
    if anim.frames.is_empty() {
        return Err(GifAnimError::EmptyAnimation);
    }
    for (axis, value) in [("width", anim.canvas.width), ("height", anim.canvas.height)] {
        if value > MAX_DIMENSION {
            return Err(GifAnimError::CanvasTooLarge {
                axis,
                value,
                max: MAX_DIMENSION,
            });
        }
    }
    let canvas = anim.canvas_rect();
    for (index, frame) in anim.frames.iter().enumerate() {
        let bounds = frame.bounds();
        if !canvas.contains_rect(bounds) {
            return Err(GifAnimError::FrameOutOfBounds {
                index,
                frame: bounds,
                canvas,
            });
        }
    }
    Ok(())
}

/// Validate `anim` and build the stream and per-frame metadata for it.
#[tracing::instrument(skip_all, fields(frames = anim.frames.len()))]
pub fn metadata_from_animation<'a>(
    anim: &'a Animation,
    diag: &mut Diagnostics,
) -> GifAnimResult<EncodedAnimation<'a>> {
    validate_for_write(anim)?;

    let stream = StreamMetadata {
        logical_screen: Some(LogicalScreenDescriptor {
            logical_screen_width: anim.canvas.width.to_string(),
            logical_screen_height: anim.canvas.height.to_string(),
            color_resolution: anim
                .color_resolution
                .map(|c| c.get().to_string())
                .unwrap_or_default(),
            pixel_aspect_ratio: SQUARE_PIXELS.to_string(),
        }),
    };

    // One loop mode per animation, so every frame carries the same payload.
    let loop_payload = encode_loop_count(i64::from(anim.loop_mode.loop_count()), diag);

    let frames = anim
        .frames
        .iter()
        .enumerate()
        .map(|(index, frame)| EncodedFrame {
            pixels: &frame.pixels,
            metadata: frame_metadata(index, frame, loop_payload, diag),
        })
        .collect();

    Ok(EncodedAnimation { stream, frames })
}

/// Validate `anim`, then hand its metadata and pixels to `sink`.
///
/// Nothing reaches the sink when validation fails.
#[tracing::instrument(skip_all)]
pub fn write_animation<S: GifSink + ?Sized>(
    anim: &Animation,
    sink: &mut S,
    diag: &mut Diagnostics,
) -> GifAnimResult<()> {
    let encoded = metadata_from_animation(anim, diag)?;

    tracing::trace!(stream = %trace_json(&encoded.stream), "stream metadata to write");
    sink.begin(&encoded.stream)?;
    for (index, frame) in encoded.frames.iter().enumerate() {
        tracing::trace!(frame = index, metadata = %trace_json(&frame.metadata), "frame metadata to write");
        sink.push_frame(index, frame.pixels, &frame.metadata)?;
    }
    sink.end()
}

/// Centisecond delay for a duration: rounded, at least 1, at most 0xFFFF.
pub fn delay_centiseconds(duration_ms: u32) -> Option<u16> {
    let cs = ((u64::from(duration_ms) + 5) / 10).max(1);
    u16::try_from(cs).ok()
}

fn frame_metadata(
    index: usize,
    frame: &Frame,
    loop_payload: [u8; 3],
    diag: &mut Diagnostics,
) -> FrameMetadata {
    let delay = delay_centiseconds(frame.duration_ms).unwrap_or_else(|| {
        diag.warn(Warning::DelayClamped {
            frame: index,
            duration_ms: frame.duration_ms,
        });
        u16::MAX
    });
    let size = frame.size();

    FrameMetadata {
        graphic_control: Some(GraphicControlExtension::new(delay, frame.disposal.token())),
        image_descriptor: Some(ImageDescriptor::new(
            frame.offset.x,
            frame.offset.y,
            size.width,
            size.height,
        )),
        application_extensions: vec![ApplicationExtension::netscape_loop(loop_payload)],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/write.rs"]
mod tests;
