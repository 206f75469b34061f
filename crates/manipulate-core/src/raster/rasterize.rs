//! Vector path rasterization into alpha masks.
//!
//! Paths are described in their own user space and mapped onto the output
//! canvas through a view box, following the SVG `viewBox` and
//! `preserveAspectRatio` rules. Filling uses `tiny-skia` with anti-aliasing
//! and the non-zero winding rule.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use super::{Image, RasterError};

/// A point in path user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed vector outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorPath {
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    /// Closed polyline. `anchor` is a lone move-to emitted before the
    /// outline; it encloses no area but counts towards the bounding box.
    Polygon {
        anchor: Option<Point>,
        vertices: Vec<Point>,
    },
}

impl VectorPath {
    /// Render as an SVG element.
    pub fn to_svg(&self) -> String {
        match self {
            VectorPath::Ellipse { cx, cy, rx, ry } => {
                format!("<ellipse cx='{cx}' cy='{cy}' rx='{rx}' ry='{ry}'/>")
            }
            VectorPath::Circle { cx, cy, r } => format!("<circle r='{r}' cx='{cx}' cy='{cy}'/>"),
            VectorPath::Polygon { anchor, vertices } => {
                let mut d = String::from("M");
                if let Some(anchor) = anchor {
                    let _ = write!(d, "{} {} M", anchor.x, anchor.y);
                }
                for (i, p) in vertices.iter().enumerate() {
                    if i > 0 {
                        d.push_str(" L");
                    }
                    let _ = write!(d, "{} {}", p.x, p.y);
                }
                format!("<path d='{d} Z'/>")
            }
        }
    }

    fn to_skia(&self) -> Option<tiny_skia::Path> {
        match *self {
            VectorPath::Ellipse { cx, cy, rx, ry } => oval(cx, cy, rx, ry),
            VectorPath::Circle { cx, cy, r } => oval(cx, cy, r, r),
            VectorPath::Polygon { ref vertices, .. } => {
                let (first, rest) = vertices.split_first()?;
                let mut builder = PathBuilder::new();
                builder.move_to(first.x as f32, first.y as f32);
                for p in rest {
                    builder.line_to(p.x as f32, p.y as f32);
                }
                builder.close();
                builder.finish()
            }
        }
    }
}

fn oval(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<tiny_skia::Path> {
    let rect = Rect::from_xywh(
        (cx - rx) as f32,
        (cy - ry) as f32,
        (rx * 2.0) as f32,
        (ry * 2.0) as f32,
    )?;
    PathBuilder::from_oval(rect)
}

/// Region of path user space mapped onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// How the view box is fitted into the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Stretch independently on each axis.
    None,
    /// Uniform scale so the view box fits, centred on both axes.
    #[default]
    XMidYMidMeet,
}

/// Compute the user-space to canvas transform.
fn view_box_transform(view_box: &ViewBox, width: u32, height: u32, aspect: AspectRatio) -> Transform {
    let sx = width as f64 / view_box.width;
    let sy = height as f64 / view_box.height;
    let (sx, sy, tx, ty) = match aspect {
        AspectRatio::None => (sx, sy, -view_box.x * sx, -view_box.y * sy),
        AspectRatio::XMidYMidMeet => {
            let s = sx.min(sy);
            let tx = (width as f64 - view_box.width * s) / 2.0 - view_box.x * s;
            let ty = (height as f64 - view_box.height * s) / 2.0 - view_box.y * s;
            (s, s, tx, ty)
        }
    };
    Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, tx as f32, ty as f32)
}

/// Rasterize a path into an 8-bit sRGB mask with an alpha band.
///
/// Inside pixels are opaque black; outside pixels are fully transparent.
/// A degenerate view box or an empty path yields a fully transparent mask.
///
/// # Errors
///
/// Returns `RasterError::Rasterize` if the canvas cannot be allocated.
pub fn rasterize(
    path: &VectorPath,
    width: u32,
    height: u32,
    view_box: ViewBox,
    aspect: AspectRatio,
) -> Result<Image, RasterError> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RasterError::Rasterize(format!("cannot allocate {width}x{height} canvas")))?;

    if !view_box.is_degenerate() {
        if let Some(outline) = path.to_skia() {
            let mut paint = Paint::default();
            paint.set_color_rgba8(0, 0, 0, 255);
            paint.anti_alias = true;
            pixmap.fill_path(
                &outline,
                &paint,
                FillRule::Winding,
                view_box_transform(&view_box, width, height, aspect),
                None,
            );
        }
    }

    Image::from_u8(width, height, 4, pixmap.data())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(mask: &Image, x: u32, y: u32) -> f32 {
        mask.pixel(x, y)[3]
    }

    fn full_box(width: f64, height: f64) -> ViewBox {
        ViewBox {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    #[test]
    fn test_circle_mask_inside_and_outside() {
        let path = VectorPath::Circle {
            cx: 50.0,
            cy: 50.0,
            r: 50.0,
        };
        let mask = rasterize(&path, 100, 100, full_box(100.0, 100.0), AspectRatio::XMidYMidMeet)
            .unwrap();
        assert_eq!(mask.bands(), 4);
        assert!(mask.has_alpha());
        assert_eq!(alpha_at(&mask, 50, 50), 255.0);
        assert_eq!(alpha_at(&mask, 0, 0), 0.0);
        assert_eq!(alpha_at(&mask, 99, 99), 0.0);
    }

    #[test]
    fn test_polygon_mask() {
        // Square covering the left half of the canvas
        let path = VectorPath::Polygon {
            anchor: None,
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(0.0, 10.0),
                Point::new(0.0, 0.0),
            ],
        };
        let mask = rasterize(&path, 10, 10, full_box(10.0, 10.0), AspectRatio::None).unwrap();
        assert_eq!(alpha_at(&mask, 2, 5), 255.0);
        assert_eq!(alpha_at(&mask, 8, 5), 0.0);
    }

    #[test]
    fn test_view_box_scales_path() {
        // Unit square drawn in a 1x1 view box fills the whole canvas
        let path = VectorPath::Polygon {
            anchor: None,
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
        };
        let mask = rasterize(&path, 8, 8, full_box(1.0, 1.0), AspectRatio::None).unwrap();
        assert_eq!(alpha_at(&mask, 0, 0), 255.0);
        assert_eq!(alpha_at(&mask, 7, 7), 255.0);
    }

    #[test]
    fn test_meet_centres_view_box() {
        // Square view box on a wide canvas leaves the sides empty
        let path = VectorPath::Polygon {
            anchor: None,
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
        };
        let mask = rasterize(&path, 30, 10, full_box(10.0, 10.0), AspectRatio::XMidYMidMeet).unwrap();
        assert_eq!(alpha_at(&mask, 2, 5), 0.0);
        assert_eq!(alpha_at(&mask, 15, 5), 255.0);
        assert_eq!(alpha_at(&mask, 27, 5), 0.0);
    }

    #[test]
    fn test_degenerate_view_box_is_transparent() {
        let path = VectorPath::Circle {
            cx: 5.0,
            cy: 5.0,
            r: 5.0,
        };
        let mask = rasterize(&path, 10, 10, full_box(0.0, 10.0), AspectRatio::None).unwrap();
        assert!(mask.samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_polygon_svg() {
        let path = VectorPath::Polygon {
            anchor: Some(Point::new(5.0, 10.0)),
            vertices: vec![Point::new(5.0, 0.0), Point::new(10.0, 7.0)],
        };
        assert_eq!(path.to_svg(), "<path d='M5 10 M5 0 L10 7 Z'/>");
    }

    #[test]
    fn test_circle_svg() {
        let path = VectorPath::Circle {
            cx: 50.0,
            cy: 25.0,
            r: 25.0,
        };
        assert_eq!(path.to_svg(), "<circle r='25' cx='50' cy='25'/>");
    }
}
