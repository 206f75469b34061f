//! Orientation normalization.
//!
//! Resolves the rotation and mirroring needed to display an image upright
//! from its EXIF orientation and any explicit request, applies it, and
//! strips the orientation tag so it is never applied twice.
//!
//! # Transform Order
//!
//! 1. Rotation (clockwise, 90° steps)
//! 2. Vertical flip (mirror about the horizontal axis)
//! 3. Horizontal flip (mirror about the vertical axis)

use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, PipelineState, Stage};
use crate::raster::{Image, Rotation, ORIENTATION_KEY};

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (rotate 90 CW + horizontal flip).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (rotate 270 CW + horizontal flip).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Read the orientation tag of an image, `Normal` if absent.
    pub fn of(image: &Image) -> Self {
        image.orientation_tag().map(Orientation::from).unwrap_or_default()
    }

    /// The transform that displays an image with this orientation upright.
    pub fn plan(self) -> OrientationPlan {
        let (rotation, flop) = match self {
            Orientation::Normal | Orientation::FlipVertical => (Rotation::D0, false),
            Orientation::FlipHorizontal => (Rotation::D0, true),
            Orientation::Rotate180 => (Rotation::D180, false),
            Orientation::Transpose => (Rotation::D90, true),
            Orientation::Rotate90CW => (Rotation::D90, false),
            Orientation::Transverse => (Rotation::D270, true),
            Orientation::Rotate270CW => (Rotation::D270, false),
        };
        OrientationPlan {
            rotation,
            flip: self == Orientation::FlipVertical,
            flop,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Requested rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationRequest {
    /// Follow the EXIF orientation.
    #[default]
    Auto,
    /// Rotate by an explicit angle, ignoring EXIF.
    Angle(Rotation),
}

/// Orientation options taken from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrientationOverrides {
    pub rotation: RotationRequest,
    /// Mirror about the horizontal axis.
    pub flip: bool,
    /// Mirror about the vertical axis.
    pub flop: bool,
}

/// Resolved rotation and mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrientationPlan {
    pub rotation: Rotation,
    pub flip: bool,
    pub flop: bool,
}

impl OrientationPlan {
    /// Check if applying the plan leaves the pixels untouched.
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::D0 && !self.flip && !self.flop
    }
}

/// Combine the EXIF orientation with the requested overrides.
///
/// An explicit angle replaces the EXIF transform entirely. Requested flips
/// toggle whatever mirroring the EXIF orientation already implies.
pub fn resolve(exif: Orientation, overrides: &OrientationOverrides) -> OrientationPlan {
    let base = match overrides.rotation {
        RotationRequest::Auto => exif.plan(),
        RotationRequest::Angle(rotation) => OrientationPlan {
            rotation,
            ..OrientationPlan::default()
        },
    };
    OrientationPlan {
        rotation: base.rotation,
        flip: base.flip ^ overrides.flip,
        flop: base.flop ^ overrides.flop,
    }
}

/// Apply a plan and drop the orientation tag.
pub fn apply(image: Image, plan: &OrientationPlan) -> Image {
    let mut image = image.rotate(plan.rotation);
    if plan.flip {
        image = image.flip_vertical();
    }
    if plan.flop {
        image = image.flip_horizontal();
    }
    image.remove_metadata(ORIENTATION_KEY);
    image
}

/// Resolve the plan from the image's own EXIF tag and apply it.
pub fn resolve_and_apply(image: Image, overrides: &OrientationOverrides) -> Image {
    let plan = resolve(Orientation::of(&image), overrides);
    apply(image, &plan)
}

/// Pipeline stage applying the plan resolved at pipeline entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationStage;

impl Stage for OrientationStage {
    fn name(&self) -> &'static str {
        "orientation"
    }

    fn run(
        &self,
        image: Image,
        state: PipelineState,
    ) -> Result<(Image, PipelineState), PipelineError> {
        let image = apply(image, &state.orientation);
        Ok((image, state))
    }
}
