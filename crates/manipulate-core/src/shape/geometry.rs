//! Vector geometry for the mask shapes.
//!
//! Every generator returns the outline together with its bounding box. The
//! bounding box becomes the SVG-style view box of the mask, so the shape is
//! scaled to fill the canvas whatever coordinate space it was built in.
//!
//! # Coordinates
//!
//! Polygon, star and heart vertices are rounded to whole pixels before the
//! bounding box is taken, so results are reproducible for a given canvas.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::ShapeKind;
use crate::raster::{AspectRatio, Point, VectorPath, ViewBox};

/// Inner radius of the five-point star relative to its outer radius.
pub const STAR_INNER_RATIO: f64 = 0.382;

/// Sampling step of the heart curve parameter.
const HEART_STEP: f64 = 0.02;

/// Parameters of a regular star-polygon.
///
/// A polygon is a star whose inner radius equals its outer radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    /// Number of vertices (for a star: outer and inner points combined).
    pub points: u32,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Clockwise offset in radians. Zero points the first vertex up.
    pub initial_angle: f64,
}

impl ShapeSpec {
    /// Star-polygon parameters for `shape`, or `None` for shapes that are
    /// not star-polygons (ellipse, circle, heart).
    pub fn for_shape(shape: ShapeKind, radius: f64) -> Option<Self> {
        let (points, inner_radius, initial_angle) = match shape {
            ShapeKind::Hexagon => (6, radius, 0.0),
            ShapeKind::Pentagon => (5, radius, 0.0),
            ShapeKind::Pentagon180 => (5, radius, PI),
            ShapeKind::Star => (10, radius * STAR_INNER_RATIO, 0.0),
            ShapeKind::Square => (4, radius, 0.0),
            ShapeKind::Triangle => (3, radius, 0.0),
            ShapeKind::Triangle180 => (3, radius, PI),
            ShapeKind::Ellipse | ShapeKind::Circle | ShapeKind::Heart => return None,
        };
        Some(Self {
            points,
            outer_radius: radius,
            inner_radius,
            initial_angle,
        })
    }
}

/// Outline of a shape plus the bounding box used as its view box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeGeometry {
    pub path: VectorPath,
    pub x_min: f64,
    pub y_min: f64,
    pub mask_width: f64,
    pub mask_height: f64,
}

impl ShapeGeometry {
    pub fn view_box(&self) -> ViewBox {
        ViewBox {
            x: self.x_min,
            y: self.y_min,
            width: self.mask_width,
            height: self.mask_height,
        }
    }

    /// Standalone SVG document of the mask for a `width`x`height` canvas.
    pub fn to_svg_document(&self, width: u32, height: u32, aspect: AspectRatio) -> String {
        let preserve = match aspect {
            AspectRatio::None => "none",
            AspectRatio::XMidYMidMeet => "xMidYMid meet",
        };
        format!(
            "<?xml version='1.0' encoding='UTF-8' standalone='no'?>\
             <svg xmlns='http://www.w3.org/2000/svg' version='1.1' width='{width}' height='{height}' \
             viewBox='{} {} {} {}' shape-rendering='geometricPrecision' preserveAspectRatio='{preserve}'>\
             {}</svg>",
            self.x_min,
            self.y_min,
            self.mask_width,
            self.mask_height,
            self.path.to_svg()
        )
    }
}

/// How a shape's view box is fitted to the canvas.
///
/// The ellipse stretches to the canvas; everything else keeps its aspect.
pub fn aspect_ratio(shape: ShapeKind) -> AspectRatio {
    match shape {
        ShapeKind::Ellipse => AspectRatio::None,
        _ => AspectRatio::XMidYMidMeet,
    }
}

/// Generate the outline and bounding box of `shape` on a `width`x`height`
/// canvas.
///
/// # Example
///
/// ```
/// use manipulate_core::shape::{generate, ShapeKind};
///
/// let geometry = generate(ShapeKind::Circle, 200, 100);
/// assert_eq!(geometry.x_min, 50.0);
/// assert_eq!(geometry.mask_width, 100.0);
/// ```
pub fn generate(shape: ShapeKind, width: u32, height: u32) -> ShapeGeometry {
    let min = width.min(height) as f64;
    let radius = min / 2.0;
    let mid_x = width as f64 / 2.0;
    let mid_y = height as f64 / 2.0;

    match shape {
        ShapeKind::Ellipse => ShapeGeometry {
            path: VectorPath::Ellipse {
                cx: mid_x,
                cy: mid_y,
                rx: mid_x,
                ry: mid_y,
            },
            x_min: 0.0,
            y_min: 0.0,
            mask_width: width as f64,
            mask_height: height as f64,
        },
        ShapeKind::Circle => ShapeGeometry {
            path: VectorPath::Circle {
                cx: mid_x,
                cy: mid_y,
                r: radius,
            },
            x_min: mid_x - radius,
            y_min: mid_y - radius,
            mask_width: min,
            mask_height: min,
        },
        _ => match ShapeSpec::for_shape(shape, radius) {
            Some(spec) => star_polygon(mid_x, mid_y, &spec),
            None => heart(radius, radius),
        },
    }
}

/// Heart curve (http://mathworld.wolfram.com/HeartCurve.html):
///
/// ```text
/// x(t) = 16 sin³t
/// y(t) = 13 cos t − 5 cos 2t − 2 cos 3t − cos 4t
/// ```
///
/// sampled from `t = −π` in steps of 0.02 while `t ≤ π` (315 samples).
/// The curve is scaled by `mid_x`/`mid_y` and flipped so the lobes point up.
pub fn heart(mid_x: f64, mid_y: f64) -> ShapeGeometry {
    let mut vertices = Vec::with_capacity(316);
    let mut t = -PI;
    while t <= PI {
        let x = 16.0 * t.sin().powi(3);
        let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
        vertices.push(Point::new(
            (mid_x + x * mid_x).round(),
            (mid_y - y * mid_y).round(),
        ));
        t += HEART_STEP;
    }
    with_bounds(None, vertices)
}

/// Regular star-polygon around `(mid_x, mid_y)`.
///
/// Vertex `i` (for `i` in `0..=points`, the last one closing the outline)
/// sits at `angle = i·2π/points − π/2 + initial_angle` on the outer radius
/// for even `i` and the inner radius for odd `i`.
///
/// With an odd number of points an extra anchor `(mid_x, mid_y + r0)` is
/// emitted first. It encloses no area, but it extends the bounding box so
/// the view box stays centred on the circumcentre instead of the vertices.
pub fn star_polygon(mid_x: f64, mid_y: f64, spec: &ShapeSpec) -> ShapeGeometry {
    let points = spec.points.max(1);
    let mut vertices = Vec::with_capacity(points as usize + 1);
    for i in 0..=points {
        let angle = i as f64 * 2.0 * PI / points as f64 - PI / 2.0 + spec.initial_angle;
        let radius = if i % 2 == 0 {
            spec.outer_radius
        } else {
            spec.inner_radius
        };
        vertices.push(Point::new(
            (mid_x + radius * angle.cos()).round(),
            (mid_y + radius * angle.sin()).round(),
        ));
    }

    let anchor = (points % 2 == 1)
        .then(|| Point::new(mid_x.round(), (mid_y + spec.outer_radius).round()));
    with_bounds(anchor, vertices)
}

fn with_bounds(anchor: Option<Point>, vertices: Vec<Point>) -> ShapeGeometry {
    let (mut x_min, mut y_min) = (f64::INFINITY, f64::INFINITY);
    let (mut x_max, mut y_max) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in anchor.iter().chain(vertices.iter()) {
        x_min = x_min.min(p.x);
        y_min = y_min.min(p.y);
        x_max = x_max.max(p.x);
        y_max = y_max.max(p.y);
    }
    ShapeGeometry {
        path: VectorPath::Polygon { anchor, vertices },
        x_min,
        y_min,
        mask_width: x_max - x_min,
        mask_height: y_max - y_min,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the heart bounding box contains every sample.
        #[test]
        fn prop_heart_bounds_contain_samples(
            (width, height) in (1u32..=2000, 1u32..=2000),
        ) {
            let g = generate(ShapeKind::Heart, width, height);
            if let VectorPath::Polygon { vertices, .. } = &g.path {
                prop_assert_eq!(vertices.len(), 315);
                for p in vertices {
                    prop_assert!(p.x >= g.x_min && p.x <= g.x_min + g.mask_width);
                    prop_assert!(p.y >= g.y_min && p.y <= g.y_min + g.mask_height);
                }
            } else {
                prop_assert!(false, "heart must be a polygon");
            }
        }

        /// Property: circles are centred squares of the shorter side.
        #[test]
        fn prop_circle_centred(
            (width, height) in (1u32..=4000, 1u32..=4000),
        ) {
            let g = generate(ShapeKind::Circle, width, height);
            let min = width.min(height) as f64;
            prop_assert_eq!(g.mask_width, min);
            prop_assert_eq!(g.mask_height, min);
            prop_assert!((g.x_min - (width as f64 / 2.0 - min / 2.0)).abs() <= 1.0);
        }
    }
}
