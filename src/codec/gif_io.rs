use std::io::{self, Read, Write};

use anyhow::Context as _;
use gif::streaming_decoder::{Block, Decoded, OutputBuffer, StreamingDecoder};
use gif::{AnyExtension, ColorOutput, DecodeOptions, DisposalMethod as GifDisposal, Encoder};
use image::RgbaImage;

use crate::codec::{DecodedFrame, GifSink, GifSource};
use crate::foundation::diag::Diagnostics;
use crate::foundation::error::{GifAnimError, GifAnimResult};
use crate::mapping::read::read_animation;
use crate::mapping::write::{SQUARE_PIXELS, write_animation};
use crate::metadata::nodes::{
    ApplicationExtension, FrameMetadata, GraphicControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, StreamMetadata,
};
use crate::model::animation::{Animation, ColorResolution, DisposalMethod};

const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const APPLICATION_EXTENSION_LABEL: u8 = 0xFF;
/// Length of `applicationID` inside the application identifier sub-block.
const APPLICATION_ID_LEN: usize = 8;
/// Byte offset of the logical screen descriptor's packed field (after the 6-byte header).
const SCREEN_PACKED_FIELD_OFFSET: usize = 10;
const COLOR_RESOLUTION_MASK: u8 = 0b0111_0000;
const COLOR_RESOLUTION_SHIFT: u8 = 4;
const SCAN_SCRATCH_LEN: usize = 4096;

/// Options for the `gif`-crate codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifCodecOpts {
    /// NeuQuant speed used when reducing RGBA frames to a palette, `1..=30`.
    /// Lower is slower and better.
    pub quantize_speed: i32,
}

impl Default for GifCodecOpts {
    fn default() -> Self {
        Self { quantize_speed: 10 }
    }
}

impl GifCodecOpts {
    /// Reject a quantizer speed outside `1..=30`.
    pub fn validate(&self) -> GifAnimResult<()> {
        if !(1..=30).contains(&self.quantize_speed) {
            return Err(GifAnimError::validation(format!(
                "quantize_speed must be in 1..=30, got {}",
                self.quantize_speed
            )));
        }
        Ok(())
    }
}

/// Decode a GIF byte stream into an [`Animation`].
pub fn read_gif<R: Read>(reader: R, diag: &mut Diagnostics) -> GifAnimResult<Animation> {
    let mut source = GifFileDecoder::new(reader)?;
    read_animation(&mut source, diag)
}

/// Encode `anim` as a GIF byte stream with default options.
pub fn write_gif<W: Write>(
    anim: &Animation,
    writer: W,
    diag: &mut Diagnostics,
) -> GifAnimResult<()> {
    write_gif_with(anim, writer, GifCodecOpts::default(), diag)
}

/// Encode `anim` as a GIF byte stream. Nothing is written when validation fails.
pub fn write_gif_with<W: Write>(
    anim: &Animation,
    writer: W,
    opts: GifCodecOpts,
    diag: &mut Diagnostics,
) -> GifAnimResult<()> {
    let mut sink = GifFileEncoder::new(writer, opts)?;
    write_animation(anim, &mut sink, diag)
}

/// [`GifSource`] over a GIF byte stream. Decodes every frame up front.
#[derive(Debug)]
pub struct GifFileDecoder {
    stream: StreamMetadata,
    frames: Vec<DecodedFrame>,
}

impl GifFileDecoder {
    /// Read the whole stream from `reader` and decode it.
    ///
    /// Extension blocks are attributed to the image they precede. A frame without a graphic
    /// control block gets no [`GraphicControlExtension`], and every application extension is
    /// kept, so the read mapper sees the stream as written.
    pub fn new<R: Read>(mut reader: R) -> GifAnimResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).context("read gif stream")?;
        let layout = scan_blocks(&bytes)?;

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let mut decoder = options
            .read_info(bytes.as_slice())
            .context("read gif header")?;

        let stream = StreamMetadata {
            logical_screen: Some(LogicalScreenDescriptor {
                logical_screen_width: decoder.width().to_string(),
                logical_screen_height: decoder.height().to_string(),
                color_resolution: layout
                    .color_resolution
                    .map(|bits| bits.to_string())
                    .unwrap_or_default(),
                pixel_aspect_ratio: SQUARE_PIXELS.to_string(),
            }),
        };

        let mut scanned = layout.frames.into_iter();
        let mut frames = Vec::new();
        while let Some(frame) = decoder
            .read_next_frame()
            .with_context(|| format!("decode gif frame {}", frames.len()))?
        {
            let (width, height) = (u32::from(frame.width), u32::from(frame.height));
            let pixels = RgbaImage::from_raw(width, height, frame.buffer.to_vec())
                .with_context(|| {
                    format!(
                        "gif frame {} buffer does not hold {width}x{height} RGBA pixels",
                        frames.len()
                    )
                })?;
            let blocks = scanned.next().unwrap_or_default();
            let graphic_control = blocks.graphic_control.then(|| GraphicControlExtension {
                delay_time: frame.delay.to_string(),
                disposal_method: disposal_from_gif(frame.dispose).token().to_string(),
                user_input_flag: flag(frame.needs_user_input),
                transparent_color_flag: flag(frame.transparent.is_some()),
                transparent_color_index: frame.transparent.unwrap_or(0).to_string(),
            });
            let metadata = FrameMetadata {
                graphic_control,
                image_descriptor: Some(ImageDescriptor {
                    image_left_position: frame.left.to_string(),
                    image_top_position: frame.top.to_string(),
                    image_width: frame.width.to_string(),
                    image_height: frame.height.to_string(),
                    interlace_flag: flag(frame.interlaced),
                }),
                application_extensions: blocks.application_extensions,
            };
            frames.push(DecodedFrame { pixels, metadata });
        }

        Ok(Self { stream, frames })
    }
}

/// Extension blocks seen before one image descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FrameBlocks {
    graphic_control: bool,
    application_extensions: Vec<ApplicationExtension>,
}

#[derive(Debug, Default)]
struct BlockLayout {
    color_resolution: Option<u8>,
    frames: Vec<FrameBlocks>,
}

/// Walk the block structure and record what the frame decoder folds away: which images carry
/// a graphic control block, the raw application extensions, and the color resolution bits.
fn scan_blocks(bytes: &[u8]) -> GifAnimResult<BlockLayout> {
    let mut decoder = StreamingDecoder::new();
    let mut scratch = vec![0u8; SCAN_SCRATCH_LEN];
    let mut frames = Vec::new();
    let mut pending = FrameBlocks::default();

    let mut rest = bytes;
    while !rest.is_empty() {
        let (consumed, decoded) = decoder
            .update(rest, &mut OutputBuffer::Slice(&mut scratch))
            .context("scan gif blocks")?;
        rest = rest.get(consumed..).unwrap_or_default();
        match decoded {
            Decoded::BlockFinished(AnyExtension(GRAPHIC_CONTROL_LABEL)) => {
                pending.graphic_control = true;
            }
            Decoded::BlockFinished(AnyExtension(APPLICATION_EXTENSION_LABEL)) => {
                let (_, data, _) = decoder.last_ext();
                if let Some(ext) = application_extension_from_block(data) {
                    pending.application_extensions.push(ext);
                }
            }
            Decoded::BlockStart(Block::Image) => frames.push(std::mem::take(&mut pending)),
            Decoded::BlockStart(Block::Trailer) => break,
            _ => {}
        }
    }
    if pending != FrameBlocks::default() {
        tracing::debug!(
            application_extensions = pending.application_extensions.len(),
            "extension blocks after the last image ignored"
        );
    }

    let color_resolution = bytes
        .get(SCREEN_PACKED_FIELD_OFFSET)
        .map(|packed| ((packed & COLOR_RESOLUTION_MASK) >> COLOR_RESOLUTION_SHIFT) + 1);
    Ok(BlockLayout {
        color_resolution,
        frames,
    })
}

/// Split the raw data of an application extension: identifier sub-block length, identifier,
/// then the concatenated payload sub-blocks.
fn application_extension_from_block(data: &[u8]) -> Option<ApplicationExtension> {
    let (&identifier_len, rest) = data.split_first()?;
    let (identifier, user_object) = rest.split_at_checked(usize::from(identifier_len))?;
    let (application_id, authentication_code) =
        identifier.split_at(identifier.len().min(APPLICATION_ID_LEN));
    Some(ApplicationExtension {
        application_id: String::from_utf8_lossy(application_id).into_owned(),
        authentication_code: String::from_utf8_lossy(authentication_code).into_owned(),
        user_object: user_object.to_vec(),
    })
}

impl GifSource for GifFileDecoder {
    fn stream_metadata(&mut self) -> GifAnimResult<StreamMetadata> {
        Ok(self.stream.clone())
    }

    fn frame_count(&mut self) -> GifAnimResult<usize> {
        Ok(self.frames.len())
    }

    fn read_frame(&mut self, index: usize) -> GifAnimResult<DecodedFrame> {
        self.frames.get(index).cloned().ok_or_else(|| {
            GifAnimError::Other(anyhow::anyhow!(
                "gif frame {index} out of range ({} frames)",
                self.frames.len()
            ))
        })
    }
}

/// Writer that overwrites the color resolution bits of the logical screen descriptor.
struct ScreenDescriptorPatch<W> {
    inner: W,
    position: usize,
    color_resolution: Option<u8>,
}

impl<W: Write> Write for ScreenDescriptorPatch<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let packed_at = SCREEN_PACKED_FIELD_OFFSET.checked_sub(self.position);
        let written = match (self.color_resolution, packed_at) {
            (Some(bits), Some(at)) if at < buf.len() => {
                let mut patched = buf.to_vec();
                let field =
                    (bits.saturating_sub(1) << COLOR_RESOLUTION_SHIFT) & COLOR_RESOLUTION_MASK;
                patched[at] = (patched[at] & !COLOR_RESOLUTION_MASK) | field;
                self.inner.write(&patched)?
            }
            _ => self.inner.write(buf)?,
        };
        self.position = self.position.saturating_add(written);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

enum EncoderState<W: Write> {
    Idle(W),
    Encoding(Encoder<ScreenDescriptorPatch<W>>),
    Finished,
}

/// [`GifSink`] writing a GIF89a byte stream through the `gif` crate.
pub struct GifFileEncoder<W: Write> {
    state: EncoderState<W>,
    opts: GifCodecOpts,
}

impl<W: Write> GifFileEncoder<W> {
    /// Encoder over `writer`. Nothing is written before [`GifSink::begin`].
    pub fn new(writer: W, opts: GifCodecOpts) -> GifAnimResult<Self> {
        opts.validate()?;
        Ok(Self {
            state: EncoderState::Idle(writer),
            opts,
        })
    }
}

impl<W: Write> GifSink for GifFileEncoder<W> {
    fn begin(&mut self, stream: &StreamMetadata) -> GifAnimResult<()> {
        let lsd = stream
            .logical_screen
            .as_ref()
            .ok_or_else(|| GifAnimError::validation("stream has no LogicalScreenDescriptor"))?;
        let width = required_u16(lsd.width(), "logicalScreenWidth")?;
        let height = required_u16(lsd.height(), "logicalScreenHeight")?;
        let color_resolution = lsd
            .color_resolution()
            .and_then(|bits| ColorResolution::new(bits).ok())
            .map(ColorResolution::get);
        if color_resolution.is_none() && !lsd.color_resolution.is_empty() {
            tracing::debug!(
                color_resolution = %lsd.color_resolution,
                "unusable color resolution; encoder default kept"
            );
        }

        let writer = match std::mem::replace(&mut self.state, EncoderState::Finished) {
            EncoderState::Idle(writer) => writer,
            other => {
                self.state = other;
                return Err(GifAnimError::validation("gif encoder already started"));
            }
        };
        let writer = ScreenDescriptorPatch {
            inner: writer,
            position: 0,
            color_resolution,
        };
        let encoder = Encoder::new(writer, width, height, &[]).context("write gif header")?;
        self.state = EncoderState::Encoding(encoder);
        Ok(())
    }

    fn push_frame(
        &mut self,
        index: usize,
        pixels: &RgbaImage,
        metadata: &FrameMetadata,
    ) -> GifAnimResult<()> {
        let EncoderState::Encoding(encoder) = &mut self.state else {
            return Err(GifAnimError::validation(
                "push_frame called outside begin/end",
            ));
        };

        for ext in &metadata.application_extensions {
            let identifier = format!("{}{}", ext.application_id, ext.authentication_code);
            encoder
                .write_raw_extension(
                    AnyExtension(APPLICATION_EXTENSION_LABEL),
                    &[identifier.as_bytes(), ext.user_object.as_slice()],
                )
                .with_context(|| format!("write application extension for frame {index}"))?;
        }

        let (w, h) = pixels.dimensions();
        let width = required_u16(Some(w), "imageWidth")?;
        let height = required_u16(Some(h), "imageHeight")?;
        let mut rgba = pixels.as_raw().clone();
        let mut frame =
            gif::Frame::from_rgba_speed(width, height, &mut rgba, self.opts.quantize_speed);

        if let Some(gce) = &metadata.graphic_control {
            frame.delay = required_u16(gce.delay_cs(), "delayTime")?;
            frame.dispose = disposal_to_gif(
                DisposalMethod::from_token(&gce.disposal_method).unwrap_or_default(),
            );
        }
        if let Some(id) = &metadata.image_descriptor {
            let left = id.left().and_then(|v| u32::try_from(v).ok());
            let top = id.top().and_then(|v| u32::try_from(v).ok());
            frame.left = required_u16(left, "imageLeftPosition")?;
            frame.top = required_u16(top, "imageTopPosition")?;
        }

        encoder
            .write_frame(&frame)
            .with_context(|| format!("write gif frame {index}"))?;
        Ok(())
    }

    fn end(&mut self) -> GifAnimResult<()> {
        match std::mem::replace(&mut self.state, EncoderState::Finished) {
            EncoderState::Encoding(encoder) => {
                let mut writer = encoder.into_inner().context("write gif trailer")?;
                writer.flush().context("flush gif output")?;
                Ok(())
            }
            EncoderState::Idle(_) => Err(GifAnimError::validation("gif encoder never started")),
            EncoderState::Finished => Err(GifAnimError::validation("gif encoder already finished")),
        }
    }
}

fn required_u16(value: Option<u32>, field: &str) -> GifAnimResult<u16> {
    value
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| GifAnimError::validation(format!("{field} missing or outside 0..=65535")))
}

fn flag(value: bool) -> String {
    let raw = if value { "TRUE" } else { "FALSE" };
    raw.to_string()
}

fn disposal_from_gif(dispose: GifDisposal) -> DisposalMethod {
    match dispose {
        GifDisposal::Any => DisposalMethod::None,
        GifDisposal::Keep => DisposalMethod::DoNotDispose,
        GifDisposal::Background => DisposalMethod::RestoreToBackground,
        GifDisposal::Previous => DisposalMethod::RestoreToPrevious,
    }
}

fn disposal_to_gif(disposal: DisposalMethod) -> GifDisposal {
    match disposal {
        DisposalMethod::None => GifDisposal::Any,
        DisposalMethod::DoNotDispose => GifDisposal::Keep,
        DisposalMethod::RestoreToBackground => GifDisposal::Background,
        DisposalMethod::RestoreToPrevious => GifDisposal::Previous,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/gif_io.rs"]
mod tests;
