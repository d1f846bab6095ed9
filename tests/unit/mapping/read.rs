use image::RgbaImage;

use super::*;
use crate::mapping::loop_ext::LOOP_FOREVER_PAYLOAD;
use crate::metadata::nodes::ApplicationExtension;
use crate::model::animation::LoopMode;

fn stream(width: &str, height: &str) -> StreamMetadata {
    StreamMetadata {
        logical_screen: Some(LogicalScreenDescriptor {
            logical_screen_width: width.to_string(),
            logical_screen_height: height.to_string(),
            color_resolution: String::new(),
            pixel_aspect_ratio: "0".to_string(),
        }),
    }
}

fn decoded(w: u32, h: u32, metadata: FrameMetadata) -> DecodedFrame {
    DecodedFrame {
        pixels: RgbaImage::new(w, h),
        metadata,
    }
}

fn full_meta(delay: &str, disposal: &str, rect: Rect, loop_payload: Option<[u8; 3]>) -> FrameMetadata {
    FrameMetadata {
        graphic_control: Some(GraphicControlExtension::new(0, disposal)).map(|mut g| {
            g.delay_time = delay.to_string();
            g
        }),
        image_descriptor: Some(ImageDescriptor::new(rect.x, rect.y, rect.width, rect.height)),
        application_extensions: loop_payload
            .map(ApplicationExtension::netscape_loop)
            .into_iter()
            .collect(),
    }
}

#[test]
fn missing_descriptor_is_fatal() {
    let mut diag = Diagnostics::new();
    let err = animation_from_metadata(&StreamMetadata::default(), Vec::new(), &mut diag)
        .unwrap_err();
    assert!(matches!(err, GifAnimError::MissingDescriptor(_)));

    let err = animation_from_metadata(&stream("100", "x"), Vec::new(), &mut diag).unwrap_err();
    assert!(matches!(err, GifAnimError::MissingDescriptor(_)));
}

#[test]
fn well_formed_frame_maps_without_warnings() {
    let mut diag = Diagnostics::new();
    let meta = full_meta(
        "25",
        "restoreToPrevious",
        Rect::new(10, 20, 30, 40),
        Some([1, 3, 0]),
    );
    let anim =
        animation_from_metadata(&stream("100", "100"), [decoded(30, 40, meta)], &mut diag)
            .unwrap();

    assert!(diag.is_empty(), "{:?}", diag.warnings());
    assert_eq!(anim.canvas, Size::new(100, 100));
    assert_eq!(anim.loop_mode.loop_count(), 3);
    let f = &anim.frames[0];
    assert_eq!(f.duration_ms, 250);
    assert_eq!(f.disposal, DisposalMethod::RestoreToPrevious);
    assert_eq!(f.offset, Point::new(10, 20));
    assert_eq!(f.size(), Size::new(30, 40));
}

#[test]
fn missing_graphic_control_defaults_to_one_second() {
    let mut diag = Diagnostics::new();
    let meta = FrameMetadata {
        graphic_control: None,
        ..full_meta("0", "none", Rect::new(0, 0, 10, 10), Some(LOOP_FOREVER_PAYLOAD))
    };
    let anim =
        animation_from_metadata(&stream("10", "10"), [decoded(10, 10, meta)], &mut diag).unwrap();
    assert_eq!(anim.frames[0].duration_ms, DEFAULT_DURATION_MS);
    assert_eq!(anim.frames[0].disposal, DisposalMethod::None);
    assert_eq!(diag.warnings(), &[Warning::MissingGraphicControl { frame: 0 }]);
}

#[test]
fn unparsable_delay_uses_ten_centiseconds() {
    let mut diag = Diagnostics::new();
    let meta = full_meta("soon", "none", Rect::new(0, 0, 10, 10), Some(LOOP_FOREVER_PAYLOAD));
    let anim =
        animation_from_metadata(&stream("10", "10"), [decoded(10, 10, meta)], &mut diag).unwrap();
    assert_eq!(anim.frames[0].duration_ms, 100);
    assert_eq!(
        diag.warnings(),
        &[Warning::InvalidDelay {
            frame: 0,
            raw: "soon".to_string()
        }]
    );
}

#[test]
fn unknown_disposal_maps_to_none() {
    let mut diag = Diagnostics::new();
    let meta = full_meta("10", "explode", Rect::new(0, 0, 10, 10), Some(LOOP_FOREVER_PAYLOAD));
    let anim =
        animation_from_metadata(&stream("10", "10"), [decoded(10, 10, meta)], &mut diag).unwrap();
    assert_eq!(anim.frames[0].disposal, DisposalMethod::None);
    assert!(matches!(
        diag.warnings(),
        [Warning::UnknownDisposal { frame: 0, .. }]
    ));
}

#[test]
fn missing_image_descriptor_places_frame_on_full_canvas() {
    let mut diag = Diagnostics::new();
    let mut meta = full_meta("10", "none", Rect::new(0, 0, 1, 1), Some(LOOP_FOREVER_PAYLOAD));
    meta.image_descriptor.as_mut().unwrap().image_top_position = String::new();
    let anim =
        animation_from_metadata(&stream("50", "40"), [decoded(50, 40, meta)], &mut diag).unwrap();

    assert_eq!(anim.frames[0].offset, Point::ZERO);
    assert_eq!(
        diag.warnings(),
        &[Warning::MissingImageDescriptor {
            frame: 0,
            canvas: Rect::new(0, 0, 50, 40)
        }]
    );
}

#[test]
fn size_mismatch_and_out_of_canvas_are_reported_not_rejected() {
    let mut diag = Diagnostics::new();
    let meta = full_meta("10", "none", Rect::new(-5, 0, 20, 20), Some(LOOP_FOREVER_PAYLOAD));
    let anim =
        animation_from_metadata(&stream("10", "10"), [decoded(8, 8, meta)], &mut diag).unwrap();

    let frame = &anim.frames[0];
    assert_eq!(frame.size(), Size::new(8, 8));
    assert_eq!(frame.offset, Point::new(-5, 0));
    assert_eq!(
        diag.warnings(),
        &[
            Warning::SizeMismatch {
                frame: 0,
                declared: Rect::new(-5, 0, 20, 20),
                decoded: Size::new(8, 8)
            },
            Warning::FrameOutsideCanvas {
                frame: 0,
                declared: Rect::new(-5, 0, 20, 20),
                canvas: Rect::new(0, 0, 10, 10)
            }
        ]
    );
}

#[test]
fn conflicting_loop_extensions_resolve_to_maximum() {
    let mut diag = Diagnostics::new();
    let rect = Rect::new(0, 0, 4, 4);
    let frames = [
        decoded(4, 4, full_meta("10", "none", rect, Some([1, 0, 0]))),
        decoded(4, 4, full_meta("10", "none", rect, Some([1, 5, 0]))),
        decoded(4, 4, full_meta("10", "none", rect, None)),
    ];
    let anim = animation_from_metadata(&stream("4", "4"), frames, &mut diag).unwrap();
    assert_eq!(anim.frames.len(), 3);
    assert_eq!(anim.loop_mode, LoopMode::times(5).unwrap());
    assert!(matches!(
        diag.warnings(),
        [Warning::ConflictingLoopCounts { chosen: 5, .. }]
    ));
}

#[test]
fn no_loop_extension_means_forever() {
    let mut diag = Diagnostics::new();
    let meta = full_meta("10", "none", Rect::new(0, 0, 4, 4), None);
    let anim =
        animation_from_metadata(&stream("4", "4"), [decoded(4, 4, meta)], &mut diag).unwrap();
    assert_eq!(anim.loop_mode, LoopMode::Forever);
    assert_eq!(diag.warnings(), &[Warning::MissingLoopExtension]);
}

#[test]
fn color_resolution_is_restored_when_in_range() {
    let mut diag = Diagnostics::new();
    let mut s = stream("4", "4");
    s.logical_screen.as_mut().unwrap().color_resolution = "6".to_string();
    let anim = animation_from_metadata(&s, Vec::new(), &mut diag).unwrap();
    assert_eq!(anim.color_resolution.map(|c| c.get()), Some(6));

    s.logical_screen.as_mut().unwrap().color_resolution = "12".to_string();
    let anim = animation_from_metadata(&s, Vec::new(), &mut diag).unwrap();
    assert_eq!(anim.color_resolution, None);
}
