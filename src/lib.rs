//! `gifanim` is a round-trippable in-memory model of an animated GIF and the mapping between
//! that model and GIF container metadata.
//!
//! # Pipeline overview
//!
//! 1. **Read**: a codec ([`GifSource`]) yields stream metadata plus `(pixels, frame metadata)`
//!    pairs; [`read_animation`] turns them into an [`Animation`].
//! 2. **Write**: [`write_animation`] validates an [`Animation`] and hands stream metadata plus
//!    `(pixels, frame metadata)` pairs to a codec ([`GifSink`]).
//!
//! The mappers never touch bytes. LZW, palettes, interlacing and block I/O belong to the codec.
//! With the default `gif-codec` feature, [`read_gif`] and [`write_gif`] plug in a codec built on
//! the `gif` crate.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Best-effort reads**: only a missing logical screen descriptor is fatal on read; anything
//!   else degrades to a default and is reported as a [`Warning`] through [`Diagnostics`].
//! - **Strict writes**: invalid animations are rejected before the codec sees a single call.
//! - **Centisecond timing**: GIF stores delays in 1/100 s, so durations survive a round trip to
//!   within 10 ms.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod foundation;
mod mapping;
mod metadata;
mod model;

pub use codec::memory::InMemoryCodec;
pub use codec::{DecodedFrame, GifSink, GifSource};
pub use foundation::core::{MAX_DIMENSION, Point, Rect, Size};
pub use foundation::diag::{Diagnostics, Warning};
pub use foundation::error::{GifAnimError, GifAnimResult};
pub use mapping::loop_ext::{
    LOOP_FOREVER_PAYLOAD, LOOP_SUB_BLOCK_ID, MAX_LOOP_COUNT, decode_loop_count,
    encode_loop_count, resolve_loop_counts,
};
pub use mapping::read::{
    DEFAULT_DELAY_CS, DEFAULT_DURATION_MS, animation_from_metadata, read_animation,
};
pub use mapping::write::{
    EncodedAnimation, EncodedFrame, SQUARE_PIXELS, delay_centiseconds, metadata_from_animation,
    validate_for_write, write_animation,
};
pub use metadata::nodes::{
    ApplicationExtension, FrameMetadata, GraphicControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, NETSCAPE_APPLICATION_ID, NETSCAPE_AUTHENTICATION_CODE,
    StreamMetadata,
};
pub use model::animation::{Animation, ColorResolution, DisposalMethod, Frame, LoopMode};

/// Pixel buffer type used by frames.
pub use image::RgbaImage;

#[cfg(feature = "gif-codec")]
pub use codec::gif_io::{
    GifCodecOpts, GifFileDecoder, GifFileEncoder, read_gif, write_gif, write_gif_with,
};
