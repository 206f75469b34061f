//! Shape masks.
//!
//! Cuts an image out along a geometric shape: the outline is generated for
//! the image's dimensions, rasterized into a mask, and the mask becomes the
//! image's alpha (intersected with any alpha it already had). Optionally the
//! canvas is then trimmed to the shape's bounding box.

mod cutout;
mod geometry;
mod trim;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{PipelineError, PipelineState, Stage};
use crate::raster::{rasterize, Image, RasterError};

pub use cutout::cutout;
pub use geometry::{
    aspect_ratio, generate, heart, star_polygon, ShapeGeometry, ShapeSpec, STAR_INNER_RATIO,
};
pub use trim::{resolve_trim, TrimRect};

/// Error returned for shape names that are not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized shape: {0:?}")]
pub struct ShapeParseError(pub String);

/// Supported mask shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Hexagon,
    Pentagon,
    #[serde(rename = "pentagon-180")]
    Pentagon180,
    Square,
    Star,
    Heart,
    Triangle,
    #[serde(rename = "triangle-180")]
    Triangle180,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
        ShapeKind::Pentagon180,
        ShapeKind::Square,
        ShapeKind::Star,
        ShapeKind::Heart,
        ShapeKind::Triangle,
        ShapeKind::Triangle180,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Pentagon180 => "pentagon-180",
            ShapeKind::Square => "square",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Triangle180 => "triangle-180",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShapeParseError(s.to_string()))
    }
}

/// Mask `image` with `shape`, trimming the canvas to the shape if `trim` is
/// set.
///
/// The ellipse always spans the whole canvas and is never trimmed.
///
/// # Errors
///
/// Propagates raster failures from mask rasterization and cutout.
pub fn apply_shape(image: Image, shape: ShapeKind, trim: bool) -> Result<Image, RasterError> {
    let (width, height) = (image.width(), image.height());
    let geometry = generate(shape, width, height);
    let mask = rasterize(
        &geometry.path,
        width,
        height,
        geometry.view_box(),
        aspect_ratio(shape),
    )?;
    let image = cutout(mask, image)?;

    if !trim || shape == ShapeKind::Ellipse {
        return Ok(image);
    }
    match resolve_trim(width, height, geometry.mask_width, geometry.mask_height) {
        Some(rect) if rect.trims(width, height) => {
            // Rounding may push the rectangle a pixel past the canvas
            let left = rect.left.min(width - 1);
            let top = rect.top.min(height - 1);
            image.crop(
                left,
                top,
                rect.width.min(width - left),
                rect.height.min(height - top),
            )
        }
        _ => Ok(image),
    }
}

/// Pipeline stage applying the requested shape mask.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeStage;

impl Stage for ShapeStage {
    fn name(&self) -> &'static str {
        "shape"
    }

    fn run(
        &self,
        image: Image,
        state: PipelineState,
    ) -> Result<(Image, PipelineState), PipelineError> {
        let options = state.options.shape;
        let image = match options.shape {
            Some(shape) => apply_shape(image, shape, options.trim)?,
            None => image,
        };
        Ok((image, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_rgb(width: u32, height: u32) -> Image {
        let pixels = vec![128u8; (width * height * 3) as usize];
        Image::from_u8(width, height, 3, &pixels).unwrap()
    }

    #[test]
    fn test_shape_names_round_trip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.as_str().parse::<ShapeKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_shape_name() {
        assert_eq!(
            "octagon".parse::<ShapeKind>(),
            Err(ShapeParseError("octagon".to_string()))
        );
        assert!("Circle".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ShapeKind::Triangle180).unwrap();
        assert_eq!(json, "\"triangle-180\"");
        let kind: ShapeKind = serde_json::from_str("\"pentagon-180\"").unwrap();
        assert_eq!(kind, ShapeKind::Pentagon180);
    }

    #[test]
    fn test_circle_cutout() {
        let out = apply_shape(grey_rgb(20, 20), ShapeKind::Circle, false).unwrap();
        assert_eq!((out.width(), out.height(), out.bands()), (20, 20, 4));
        assert_eq!(out.pixel(10, 10), &[128.0, 128.0, 128.0, 255.0]);
        assert_eq!(out.pixel(0, 0)[3], 0.0);
        assert_eq!(out.pixel(19, 19)[3], 0.0);
    }

    #[test]
    fn test_circle_trim_on_wide_canvas() {
        let out = apply_shape(grey_rgb(200, 100), ShapeKind::Circle, true).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert_eq!(out.pixel(50, 50)[3], 255.0);
    }

    #[test]
    fn test_circle_without_trim_keeps_canvas() {
        let out = apply_shape(grey_rgb(200, 100), ShapeKind::Circle, false).unwrap();
        assert_eq!((out.width(), out.height()), (200, 100));
        assert_eq!(out.pixel(10, 50)[3], 0.0);
    }

    #[test]
    fn test_star_trim() {
        // Star bounding box on 100x100 is 96x90
        let out = apply_shape(grey_rgb(100, 100), ShapeKind::Star, true).unwrap();
        assert_eq!((out.width(), out.height()), (100, 94));
    }

    #[test]
    fn test_square_trim_is_full_canvas() {
        let out = apply_shape(grey_rgb(100, 100), ShapeKind::Square, true).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        // Vertex-up square leaves the corners transparent
        assert_eq!(out.pixel(0, 0)[3], 0.0);
        assert_eq!(out.pixel(50, 50)[3], 255.0);
    }

    #[test]
    fn test_ellipse_never_trims() {
        let out = apply_shape(grey_rgb(120, 40), ShapeKind::Ellipse, true).unwrap();
        assert_eq!((out.width(), out.height()), (120, 40));
        assert_eq!(out.pixel(60, 20)[3], 255.0);
        assert_eq!(out.pixel(0, 0)[3], 0.0);
    }

    #[test]
    fn test_heart_centre_is_opaque() {
        let out = apply_shape(grey_rgb(64, 64), ShapeKind::Heart, false).unwrap();
        assert_eq!(out.pixel(32, 32)[3], 255.0);
        assert_eq!(out.pixel(0, 63)[3], 0.0);
    }

    #[test]
    fn test_shape_keeps_existing_alpha() {
        let pixels: Vec<u8> = (0..16 * 16).flat_map(|_| [10, 20, 30, 100]).collect();
        let img = Image::from_u8(16, 16, 4, &pixels).unwrap();
        let out = apply_shape(img, ShapeKind::Circle, false).unwrap();
        assert_eq!(out.bands(), 4);
        assert_eq!(out.pixel(8, 8), &[10.0, 20.0, 30.0, 100.0]);
        assert_eq!(out.pixel(0, 0)[3], 0.0);
    }
}
