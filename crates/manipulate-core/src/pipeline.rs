//! Pipeline orchestration.
//!
//! A [`Pipeline`] runs an ordered list of [`Stage`]s over one image. The
//! request parameters are validated once at entry into a [`PipelineState`],
//! which is threaded by value through every stage together with the image.
//!
//! # State
//!
//! `is_premultiplied` always describes the image currently in flight. A stage
//! that premultiplies or unpremultiplies updates the flag in the same step.
//! After the last stage any premultiplied image is unpremultiplied and cast
//! back to an integer format, so callers never see premultiplied data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::background::BackgroundStage;
use crate::orientation::{self, Orientation, OrientationPlan, OrientationStage};
use crate::params::{ManipulationOptions, ParamMap};
use crate::raster::{Image, RasterError};
use crate::shape::ShapeStage;

/// Error types for pipeline runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A raster operation failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A stage rejected its input.
    #[error("Stage {stage} failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

/// Per-request state threaded through the stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Whether the image in flight holds premultiplied samples.
    pub is_premultiplied: bool,
    /// Rotation and mirroring resolved at entry.
    pub orientation: OrientationPlan,
    /// Validated options for every stage.
    pub options: ManipulationOptions,
    /// Raw parameters, handed back to the caller.
    pub params: ParamMap,
}

impl PipelineState {
    /// Seed the state for `image` from request parameters.
    pub fn new(image: &Image, params: ParamMap) -> Self {
        let options = ManipulationOptions::from_params(&params);
        let orientation = orientation::resolve(Orientation::of(image), &options.orientation);
        Self {
            is_premultiplied: false,
            orientation,
            options,
            params,
        }
    }
}

/// One manipulation step.
pub trait Stage: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Transform the image, updating the state as needed.
    fn run(&self, image: Image, state: PipelineState)
        -> Result<(Image, PipelineState), PipelineError>;
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub image: Image,
    /// The parameters after every stage had its say.
    pub params: ParamMap,
}

/// Ordered list of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for Pipeline {
    /// Orientation, then shape, then background.
    fn default() -> Self {
        Self::new(vec![
            Box::new(OrientationStage),
            Box::new(ShapeStage),
            Box::new(BackgroundStage),
        ])
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage over `image`.
    ///
    /// # Errors
    ///
    /// The first failing stage aborts the run; no partial result is
    /// returned.
    pub fn run(&self, image: Image, params: ParamMap) -> Result<PipelineOutput, PipelineError> {
        let mut state = PipelineState::new(&image, params);
        log::trace!(
            "resolved options {:?}, orientation {:?}",
            state.options,
            state.orientation
        );

        let mut image = image;
        for stage in &self.stages {
            (image, state) = stage.run(image, state)?;
            log::debug!(
                "stage {}: {}x{}x{} premultiplied={}",
                stage.name(),
                image.width(),
                image.height(),
                image.bands(),
                state.is_premultiplied
            );
        }

        if state.is_premultiplied {
            let format = image.interpretation().integer_format();
            image = image.unpremultiply().cast(format);
            state.is_premultiplied = false;
            log::debug!("unpremultiplied output as {format:?}");
        }

        Ok(PipelineOutput {
            image,
            params: state.params,
        })
    }
}
