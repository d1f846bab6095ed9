//! Fixed-shape metadata records exchanged with the bitstream codec.
//!
//! Attribute values travel as strings, exactly as the codec sees them. Parsing and the
//! "empty means codec default" convention live in the accessors below, one per field.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Application identifier of the animation loop extension.
pub const NETSCAPE_APPLICATION_ID: &str = "NETSCAPE";
/// Authentication code of the animation loop extension.
pub const NETSCAPE_AUTHENTICATION_CODE: &str = "2.0";

const FALSE: &str = "FALSE";

fn parse_attr<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Stream-level metadata (one per GIF).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetadata {
    /// `LogicalScreenDescriptor` node.
    pub logical_screen: Option<LogicalScreenDescriptor>,
}

/// `LogicalScreenDescriptor` node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalScreenDescriptor {
    /// `logicalScreenWidth`, `0..=0xFFFF` or empty for codec default.
    pub logical_screen_width: String,
    /// `logicalScreenHeight`, `0..=0xFFFF` or empty for codec default.
    pub logical_screen_height: String,
    /// `colorResolution`, `1..=8` or empty for codec default.
    pub color_resolution: String,
    /// `pixelAspectRatio`; `0` means square pixels.
    pub pixel_aspect_ratio: String,
}

impl LogicalScreenDescriptor {
    /// Node name.
    pub const NAME: &'static str = "LogicalScreenDescriptor";

    /// Parsed `logicalScreenWidth`.
    pub fn width(&self) -> Option<u32> {
        parse_attr(&self.logical_screen_width)
    }

    /// Parsed `logicalScreenHeight`.
    pub fn height(&self) -> Option<u32> {
        parse_attr(&self.logical_screen_height)
    }

    /// Declared color resolution; `None` when empty or unparsable.
    pub fn color_resolution(&self) -> Option<u8> {
        parse_attr(&self.color_resolution)
    }

    /// Parsed `pixelAspectRatio`.
    pub fn pixel_aspect_ratio(&self) -> Option<u8> {
        parse_attr(&self.pixel_aspect_ratio)
    }
}

/// Per-frame metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// `GraphicControlExtension` node.
    pub graphic_control: Option<GraphicControlExtension>,
    /// `ImageDescriptor` node.
    pub image_descriptor: Option<ImageDescriptor>,
    /// Children of the `ApplicationExtensions` node.
    pub application_extensions: Vec<ApplicationExtension>,
}

impl FrameMetadata {
    /// First application extension that identifies as NETSCAPE2.0.
    pub fn loop_extension(&self) -> Option<&ApplicationExtension> {
        self.application_extensions
            .iter()
            .find(|ext| ext.is_netscape_loop())
    }
}

/// `GraphicControlExtension` node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicControlExtension {
    /// `delayTime` in centiseconds.
    pub delay_time: String,
    /// `disposalMethod` token.
    pub disposal_method: String,
    /// `userInputFlag`, `TRUE`/`FALSE`.
    pub user_input_flag: String,
    /// `transparentColorFlag`, `TRUE`/`FALSE`.
    pub transparent_color_flag: String,
    /// `transparentColorIndex`.
    pub transparent_color_index: String,
}

impl GraphicControlExtension {
    /// Node name.
    pub const NAME: &'static str = "GraphicControlExtension";

    /// Extension with user input and transparency disabled.
    pub fn new(delay_cs: u16, disposal_token: &str) -> Self {
        Self {
            delay_time: delay_cs.to_string(),
            disposal_method: disposal_token.to_string(),
            user_input_flag: FALSE.to_string(),
            transparent_color_flag: FALSE.to_string(),
            transparent_color_index: "0".to_string(),
        }
    }

    /// Parsed `delayTime`.
    pub fn delay_cs(&self) -> Option<u32> {
        parse_attr(&self.delay_time)
    }
}

/// `ImageDescriptor` node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// `imageLeftPosition`.
    pub image_left_position: String,
    /// `imageTopPosition`.
    pub image_top_position: String,
    /// `imageWidth`.
    pub image_width: String,
    /// `imageHeight`.
    pub image_height: String,
    /// `interlaceFlag`, `TRUE`/`FALSE`.
    pub interlace_flag: String,
}

impl ImageDescriptor {
    /// Node name.
    pub const NAME: &'static str = "ImageDescriptor";

    /// Non-interlaced descriptor.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            image_left_position: left.to_string(),
            image_top_position: top.to_string(),
            image_width: width.to_string(),
            image_height: height.to_string(),
            interlace_flag: FALSE.to_string(),
        }
    }

    /// Parsed `imageLeftPosition`.
    pub fn left(&self) -> Option<i32> {
        parse_attr(&self.image_left_position)
    }

    /// Parsed `imageTopPosition`.
    pub fn top(&self) -> Option<i32> {
        parse_attr(&self.image_top_position)
    }

    /// Parsed `imageWidth`.
    pub fn width(&self) -> Option<u32> {
        parse_attr(&self.image_width)
    }

    /// Parsed `imageHeight`.
    pub fn height(&self) -> Option<u32> {
        parse_attr(&self.image_height)
    }

    /// True when `interlaceFlag` is set.
    pub fn interlaced(&self) -> bool {
        self.interlace_flag.eq_ignore_ascii_case("TRUE")
    }
}

/// `ApplicationExtension` node with its raw payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationExtension {
    /// `applicationID`, 8 characters.
    pub application_id: String,
    /// `authenticationCode`, 3 characters.
    pub authentication_code: String,
    /// Raw sub-block payload.
    pub user_object: Vec<u8>,
}

impl ApplicationExtension {
    /// Node name.
    pub const NAME: &'static str = "ApplicationExtension";

    /// NETSCAPE2.0 extension carrying `payload`.
    pub fn netscape_loop(payload: [u8; 3]) -> Self {
        Self {
            application_id: NETSCAPE_APPLICATION_ID.to_string(),
            authentication_code: NETSCAPE_AUTHENTICATION_CODE.to_string(),
            user_object: payload.to_vec(),
        }
    }

    /// True when this identifies as NETSCAPE2.0.
    pub fn is_netscape_loop(&self) -> bool {
        self.application_id == NETSCAPE_APPLICATION_ID
            && self.authentication_code == NETSCAPE_AUTHENTICATION_CODE
    }
}

/// Compact JSON for trace logs. Only evaluated when trace is enabled.
pub(crate) fn trace_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/nodes.rs"]
mod tests;
