//! Manipulate Core - Image manipulation library
//!
//! This crate provides the manipulation core of an image proxy: shape masks
//! with optional trimming, background colour compositing, and EXIF-aware
//! orientation, chained by a small pipeline that keeps track of alpha
//! premultiplication between stages.

pub mod background;
pub mod color;
pub mod config;
pub mod orientation;
pub mod params;
pub mod pipeline;
pub mod raster;
pub mod shape;

pub use background::{apply_background, BackgroundStage};
pub use color::{Color, ColorParseError};
pub use config::{ConfigError, PipelineConfig};
pub use orientation::{
    Orientation, OrientationOverrides, OrientationPlan, OrientationStage, RotationRequest,
};
pub use params::{ManipulationOptions, ParamMap};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput, PipelineState, Stage};
pub use raster::{BandFormat, Image, Interpretation, RasterError, Rotation};
pub use shape::{apply_shape, ShapeKind, ShapeParseError, ShapeStage};
