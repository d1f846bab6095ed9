use std::fmt;

/// Largest width or height a GIF logical screen or image can declare.
pub const MAX_DIMENSION: u32 = 0xFFFF;

/// Integer width x height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Size {
    /// Horizontal extent in pixels.
    pub width: u32,
    /// Vertical extent in pixels.
    pub height: u32,
}

impl Size {
    /// Size from its two extents.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rectangle of this size anchored at the origin.
    pub fn as_rect(self) -> Rect {
        self.as_rect_at(Point::ZERO)
    }

    /// Rectangle of this size with its top-left corner at `offset`.
    pub fn as_rect_at(self, offset: Point) -> Rect {
        Rect {
            x: offset.x,
            y: offset.y,
            width: self.width,
            height: self.height,
        }
    }

    /// True when either extent is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Integer position; frame offsets may be negative.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl Point {
    /// The canvas origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Point from its coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle (top-left corner plus size).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Rect {
    /// Rectangle from its top-left corner and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.size().is_empty()
    }

    /// True when `other` lies entirely inside `self`.
    ///
    /// Empty rectangles neither contain nor are contained by anything.
    pub fn contains_rect(self, other: Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));
        let (x1, y1) = (x0 + i64::from(self.width), y0 + i64::from(self.height));
        let (ox0, oy0) = (i64::from(other.x), i64::from(other.y));
        let (ox1, oy1) = (ox0 + i64::from(other.width), oy0 + i64::from(other.height));
        ox0 >= x0 && oy0 >= y0 && ox1 <= x1 && oy1 <= y1
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x={}, y={}, {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
