use super::*;
use crate::codec::memory::InMemoryCodec;
use crate::foundation::core::{Point, Rect, Size};
use crate::model::animation::{ColorResolution, DisposalMethod, LoopMode};

fn solid(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]))
}

fn two_frames() -> Animation {
    Animation::new(
        Size::new(100, 100),
        vec![
            Frame::new(solid(100, 100), 200),
            Frame::new(solid(50, 20), 15)
                .with_offset(Point::new(50, 80))
                .with_disposal(DisposalMethod::RestoreToBackground),
        ],
    )
}

#[test]
fn empty_animation_is_rejected_before_any_output() {
    let anim = Animation::new(Size::new(10, 10), Vec::new());
    let mut sink = InMemoryCodec::new();
    let mut diag = Diagnostics::new();
    let err = write_animation(&anim, &mut sink, &mut diag).unwrap_err();
    assert!(matches!(err, GifAnimError::EmptyAnimation));
    assert!(sink.stream().is_none());
}

#[test]
fn frame_outside_canvas_names_index_and_rects() {
    let mut anim = two_frames();
    anim.frames[1].offset = Point::new(60, 80);
    let mut sink = InMemoryCodec::new();
    let mut diag = Diagnostics::new();
    let err = write_animation(&anim, &mut sink, &mut diag).unwrap_err();
    match err {
        GifAnimError::FrameOutOfBounds {
            index,
            frame,
            canvas,
        } => {
            assert_eq!(index, 1);
            assert_eq!(frame, Rect::new(60, 80, 50, 20));
            assert_eq!(canvas, Rect::new(0, 0, 100, 100));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sink.stream().is_none());
    assert!(sink.frames().is_empty());
}

#[test]
fn negative_offset_is_rejected() {
    let mut anim = two_frames();
    anim.frames[0] = Frame::new(solid(10, 10), 100).with_offset(Point::new(-1, 0));
    let err = validate_for_write(&anim).unwrap_err();
    assert!(matches!(err, GifAnimError::FrameOutOfBounds { index: 0, .. }));
}

#[test]
fn oversized_canvas_is_rejected() {
    let anim = Animation::new(Size::new(70_000, 10), vec![Frame::new(solid(1, 1), 10)]);
    let err = validate_for_write(&anim).unwrap_err();
    assert!(matches!(
        err,
        GifAnimError::CanvasTooLarge {
            axis: "width",
            value: 70_000,
            ..
        }
    ));
}

#[test]
fn delay_rounds_half_up_and_never_hits_zero() {
    assert_eq!(delay_centiseconds(0), Some(1));
    assert_eq!(delay_centiseconds(4), Some(1));
    assert_eq!(delay_centiseconds(15), Some(2));
    assert_eq!(delay_centiseconds(200), Some(20));
    assert_eq!(delay_centiseconds(204), Some(20));
    assert_eq!(delay_centiseconds(655_350), Some(u16::MAX));
    assert_eq!(delay_centiseconds(655_355), None);
}

#[test]
fn frame_metadata_mirrors_the_model() {
    let anim = two_frames();
    let mut diag = Diagnostics::new();
    let encoded = metadata_from_animation(&anim, &mut diag).unwrap();
    assert!(diag.is_empty());

    let lsd = encoded.stream.logical_screen.as_ref().unwrap();
    assert_eq!(lsd.width(), Some(100));
    assert_eq!(lsd.height(), Some(100));
    assert_eq!(lsd.color_resolution, "");
    assert_eq!(lsd.pixel_aspect_ratio, SQUARE_PIXELS);

    let second = &encoded.frames[1].metadata;
    let gce = second.graphic_control.as_ref().unwrap();
    assert_eq!(gce.delay_cs(), Some(2));
    assert_eq!(gce.disposal_method, "restoreToBackgroundColor");
    assert_eq!(gce.transparent_color_flag, "FALSE");

    let id = second.image_descriptor.as_ref().unwrap();
    assert_eq!(
        (id.left(), id.top(), id.width(), id.height()),
        (Some(50), Some(80), Some(50), Some(20))
    );
    assert!(!id.interlaced());
}

#[test]
fn every_frame_carries_the_same_loop_payload() {
    let anim = two_frames().with_loop_mode(LoopMode::times(3).unwrap());
    let mut diag = Diagnostics::new();
    let encoded = metadata_from_animation(&anim, &mut diag).unwrap();
    for frame in &encoded.frames {
        let ext = frame.metadata.loop_extension().unwrap();
        assert_eq!(ext.user_object, vec![1, 3, 0]);
    }
}

#[test]
fn oversized_loop_count_degrades_to_forever() {
    let anim = two_frames().with_loop_mode(LoopMode::times(70_000).unwrap());
    let mut diag = Diagnostics::new();
    let encoded = metadata_from_animation(&anim, &mut diag).unwrap();
    let ext = encoded.frames[0].metadata.loop_extension().unwrap();
    assert_eq!(ext.user_object, vec![1, 0, 0]);
    assert_eq!(
        diag.warnings(),
        &[Warning::LoopCountOutOfRange { count: 70_000 }]
    );
}

#[test]
fn color_resolution_is_emitted_when_set() {
    let anim = two_frames().with_color_resolution(ColorResolution::new(5).unwrap());
    let mut diag = Diagnostics::new();
    let encoded = metadata_from_animation(&anim, &mut diag).unwrap();
    assert_eq!(
        encoded.stream.logical_screen.unwrap().color_resolution,
        "5"
    );
}

#[test]
fn long_duration_saturates_with_warning() {
    let anim = Animation::new(
        Size::new(1, 1),
        vec![Frame::new(solid(1, 1), 1_000_000)],
    );
    let mut diag = Diagnostics::new();
    let encoded = metadata_from_animation(&anim, &mut diag).unwrap();
    let gce = encoded.frames[0].metadata.graphic_control.as_ref().unwrap();
    assert_eq!(gce.delay_cs(), Some(u32::from(u16::MAX)));
    assert_eq!(
        diag.warnings(),
        &[Warning::DelayClamped {
            frame: 0,
            duration_ms: 1_000_000
        }]
    );
}

#[test]
fn sink_sees_begin_frames_end() {
    let anim = two_frames();
    let mut sink = InMemoryCodec::new();
    let mut diag = Diagnostics::new();
    write_animation(&anim, &mut sink, &mut diag).unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].pixels.dimensions(), (50, 20));
}
