//! Raster engine used by the manipulation stages.
//!
//! This module provides the small set of pixel operations the stages need:
//! - Decoding/encoding through the `image` crate (with EXIF orientation)
//! - Band extraction, joining and format casts
//! - Premultiplication, "over" compositing and flattening
//! - Discrete rotation, mirroring and cropping
//! - Vector path rasterization for shape masks
//!
//! # Sample Model
//!
//! An [`Image`] stores interleaved `f32` samples in the native range of its
//! [`BandFormat`]. Integer formats are enforced by [`Image::cast`], which
//! rounds to nearest and clamps. Operations take `self` by value so an image
//! moves through the pipeline without aliasing.

mod alpha;
mod bands;
pub mod codec;
mod geometry;
pub mod rasterize;
mod types;

pub use rasterize::{rasterize, AspectRatio, Point, VectorPath, ViewBox};
pub use types::{BandFormat, Image, Interpretation, RasterError, Rotation, ORIENTATION_KEY};
