//! Request parameters and the typed options derived from them.
//!
//! Parameters arrive as a flat string map (`shape=star&strim&bg=red`). They
//! are validated once, at pipeline entry, into [`ManipulationOptions`].
//! Invalid or unknown values fall back to the defaults instead of failing
//! the request.
//!
//! # Recognized Parameters
//!
//! | Key      | Meaning                                              |
//! |----------|------------------------------------------------------|
//! | `shape`  | Mask shape name (see [`ShapeKind`])                  |
//! | `circle` | Deprecated: same as `shape=circle`                   |
//! | `strim`  | Present: trim the canvas to the shape                |
//! | `bg`     | Background colour (see [`Color`])                    |
//! | `or`     | Rotation: `auto` or a multiple of 90 degrees         |
//! | `flip`   | Present: mirror about the horizontal axis            |
//! | `flop`   | Present: mirror about the vertical axis              |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::orientation::{OrientationOverrides, RotationRequest};
use crate::raster::Rotation;
use crate::shape::ShapeKind;

/// Raw request parameters.
pub type ParamMap = BTreeMap<String, String>;

/// Shape mask options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeOptions {
    /// Shape to cut out; `None` leaves the image untouched.
    pub shape: Option<ShapeKind>,
    /// Trim the canvas down to the shape's bounding box.
    pub trim: bool,
}

/// Background options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    /// Background colour; `None` means no background was requested.
    pub color: Option<Color>,
}

/// Options for every stage, validated once per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManipulationOptions {
    pub shape: ShapeOptions,
    pub background: BackgroundOptions,
    pub orientation: OrientationOverrides,
}

impl ManipulationOptions {
    /// Validate request parameters into typed options.
    pub fn from_params(params: &ParamMap) -> Self {
        let shape = params
            .get("shape")
            .and_then(|name| name.parse::<ShapeKind>().ok())
            .or_else(|| params.contains_key("circle").then_some(ShapeKind::Circle));

        Self {
            shape: ShapeOptions {
                shape,
                trim: params.contains_key("strim"),
            },
            background: BackgroundOptions {
                color: params.get("bg").and_then(|value| value.parse::<Color>().ok()),
            },
            orientation: OrientationOverrides {
                rotation: params
                    .get("or")
                    .map(|value| parse_rotation(value))
                    .unwrap_or_default(),
                flip: params.contains_key("flip"),
                flop: params.contains_key("flop"),
            },
        }
    }
}

/// Parse the `or` parameter. Anything other than a multiple of 90 is `Auto`.
fn parse_rotation(value: &str) -> RotationRequest {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(Rotation::from_degrees)
        .map(RotationRequest::Angle)
        .unwrap_or(RotationRequest::Auto)
}

/// Build a [`ParamMap`] from key/value pairs.
pub fn param_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> ParamMap
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
