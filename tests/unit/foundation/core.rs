use super::*;

#[test]
fn rect_contains_boundaries() {
    let canvas = Size::new(100, 100).as_rect();
    assert!(canvas.contains_rect(Rect::new(0, 0, 100, 100)));
    assert!(canvas.contains_rect(Rect::new(90, 90, 10, 10)));
    assert!(!canvas.contains_rect(Rect::new(91, 90, 10, 10)));
    assert!(!canvas.contains_rect(Rect::new(-1, 0, 10, 10)));
    assert!(!canvas.contains_rect(Rect::new(0, 0, 101, 1)));
}

#[test]
fn empty_rects_never_contain_or_fit() {
    let canvas = Size::new(100, 100).as_rect();
    assert!(!canvas.contains_rect(Rect::new(10, 10, 0, 5)));
    assert!(!Size::new(0, 100).as_rect().contains_rect(Rect::new(0, 0, 1, 1)));
}

#[test]
fn contains_does_not_overflow_at_extremes() {
    let canvas = Size::new(MAX_DIMENSION, MAX_DIMENSION).as_rect();
    assert!(!canvas.contains_rect(Rect::new(i32::MAX, i32::MAX, u32::MAX, u32::MAX)));
    assert!(!canvas.contains_rect(Rect::new(i32::MIN, 0, 1, 1)));
}

#[test]
fn as_rect_at_keeps_offset_and_size() {
    let r = Size::new(20, 30).as_rect_at(Point::new(-5, 7));
    assert_eq!(r.origin(), Point::new(-5, 7));
    assert_eq!(r.size(), Size::new(20, 30));
    assert_eq!(r.to_string(), "[x=-5, y=7, 20x30]");
}
