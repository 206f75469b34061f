//! Core types for the raster engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata key holding the EXIF orientation value (one byte, 1-8).
pub const ORIENTATION_KEY: &str = "orientation";

/// Error types for raster engine operations.
#[derive(Debug, Error, PartialEq)]
pub enum RasterError {
    /// Width or height is zero, or there are no bands.
    #[error("Invalid dimensions: {width}x{height} with {bands} bands")]
    InvalidDimensions { width: u32, height: u32, bands: u32 },

    /// Sample buffer length doesn't match the declared geometry.
    #[error("Invalid sample buffer: expected {expected} samples, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Requested bands lie outside the image.
    #[error("Bands {index}..{end} out of range for an image with {bands} bands", end = band_end(.index, .count))]
    BandOutOfRange { index: u32, count: u32, bands: u32 },

    /// Two images (or an image and a constant) disagree on band count.
    #[error("Band count mismatch: expected {expected}, got {actual}")]
    BandMismatch { expected: u32, actual: u32 },

    /// Two images disagree on dimensions.
    #[error("Size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    /// Crop region does not fit inside the image.
    #[error("Region {width}x{height}+{left}+{top} is outside the image")]
    RegionOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    },

    /// The encoded data could not be decoded.
    #[error("Image not readable: {0}")]
    Decode(String),

    /// The image could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Vector path rasterization failed.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
}

/// Numeric encoding of each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BandFormat {
    /// Unsigned 8-bit.
    #[default]
    UChar,
    /// Unsigned 16-bit.
    UShort,
    /// 32-bit float, unbounded.
    Float,
}

impl BandFormat {
    /// Clamp and round a value into the representable range of this format.
    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        match self {
            BandFormat::UChar => value.round().clamp(0.0, 255.0),
            BandFormat::UShort => value.round().clamp(0.0, 65535.0),
            BandFormat::Float => value,
        }
    }
}

/// How the bands of an image should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpretation {
    /// 8-bit greyscale, optionally with alpha.
    BW,
    /// 8-bit sRGB, optionally with alpha.
    #[default]
    Srgb,
    /// 16-bit greyscale, optionally with alpha.
    Grey16,
    /// 16-bit RGB, optionally with alpha.
    Rgb16,
    /// Generic bands with no colour meaning.
    Multiband,
}

impl Interpretation {
    /// Maximum alpha value for images with this interpretation.
    pub fn max_alpha(self) -> f32 {
        match self {
            Interpretation::Grey16 | Interpretation::Rgb16 => 65535.0,
            _ => 255.0,
        }
    }

    /// Number of bands that signal an alpha channel, if any.
    fn alpha_bands(self) -> Option<u32> {
        match self {
            Interpretation::BW | Interpretation::Grey16 => Some(2),
            Interpretation::Srgb | Interpretation::Rgb16 => Some(4),
            Interpretation::Multiband => None,
        }
    }

    /// Unsigned integer format matching this interpretation's bit depth.
    pub fn integer_format(self) -> BandFormat {
        match self {
            Interpretation::Grey16 | Interpretation::Rgb16 => BandFormat::UShort,
            _ => BandFormat::UChar,
        }
    }
}

/// Exclusive end of a band range, widened so it cannot overflow.
fn band_end(index: &u32, count: &u32) -> u64 {
    u64::from(*index) + u64::from(*count)
}

/// Discrete clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    D0,
    D90,
    D180,
    D270,
}

impl Rotation {
    /// Normalize an angle in degrees to a discrete rotation.
    ///
    /// Negative angles wrap around (`-90` is `D270`). Angles that are not a
    /// multiple of 90 return `None`.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::D0),
            90 => Some(Rotation::D90),
            180 => Some(Rotation::D180),
            _ => Some(Rotation::D270),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::D0 => 0,
            Rotation::D90 => 90,
            Rotation::D180 => 180,
            Rotation::D270 => 270,
        }
    }

    /// Check if this rotation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::D90 | Rotation::D270)
    }
}

/// A raster image with interleaved samples.
///
/// Samples are stored as `f32` in the native range of `format`
/// (0-255 for `UChar`, 0-65535 for `UShort`). Operations consume the image
/// and return a new one; nothing is shared between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    bands: u32,
    format: BandFormat,
    interpretation: Interpretation,
    metadata: BTreeMap<String, Vec<u8>>,
    samples: Vec<f32>,
}

impl Image {
    /// Create an image from interleaved samples.
    pub fn from_samples(
        width: u32,
        height: u32,
        bands: u32,
        format: BandFormat,
        interpretation: Interpretation,
        samples: Vec<f32>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 || bands == 0 {
            return Err(RasterError::InvalidDimensions {
                width,
                height,
                bands,
            });
        }
        let expected = width as usize * height as usize * bands as usize;
        if samples.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bands,
            format,
            interpretation,
            metadata: BTreeMap::new(),
            samples,
        })
    }

    /// Create an 8-bit image from raw bytes, guessing the interpretation
    /// from the band count (1-2 bands greyscale, 3-4 bands sRGB).
    pub fn from_u8(width: u32, height: u32, bands: u32, pixels: &[u8]) -> Result<Self, RasterError> {
        let interpretation = match bands {
            1 | 2 => Interpretation::BW,
            3 | 4 => Interpretation::Srgb,
            _ => Interpretation::Multiband,
        };
        let samples = pixels.iter().map(|&v| v as f32).collect();
        Self::from_samples(width, height, bands, BandFormat::UChar, interpretation, samples)
    }

    /// Create a 16-bit image from raw values (1-2 bands grey, 3-4 bands RGB).
    pub fn from_u16(width: u32, height: u32, bands: u32, pixels: &[u16]) -> Result<Self, RasterError> {
        let interpretation = match bands {
            1 | 2 => Interpretation::Grey16,
            3 | 4 => Interpretation::Rgb16,
            _ => Interpretation::Multiband,
        };
        let samples = pixels.iter().map(|&v| v as f32).collect();
        Self::from_samples(width, height, bands, BandFormat::UShort, interpretation, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bands(&self) -> u32 {
        self.bands
    }

    pub fn format(&self) -> BandFormat {
        self.format
    }

    pub fn interpretation(&self) -> Interpretation {
        self.interpretation
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if the band count signals an alpha channel for this interpretation.
    pub fn has_alpha(&self) -> bool {
        self.interpretation.alpha_bands() == Some(self.bands)
    }

    /// Maximum alpha value for this image's interpretation.
    pub fn max_alpha(&self) -> f32 {
        self.interpretation.max_alpha()
    }

    /// Get the samples of one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        let bands = self.bands as usize;
        let idx = (y as usize * self.width as usize + x as usize) * bands;
        &self.samples[idx..idx + bands]
    }

    /// Samples converted to 8-bit values.
    ///
    /// 16-bit interpretations are scaled down; values are then rounded and
    /// clamped.
    pub fn to_u8(&self) -> Vec<u8> {
        let scale = 255.0 / self.max_alpha();
        self.samples
            .iter()
            .map(|&v| BandFormat::UChar.clamp(v * scale) as u8)
            .collect()
    }

    pub fn metadata(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.metadata.insert(key.into(), value);
    }

    /// Remove a metadata entry, returning its value if it was present.
    pub fn remove_metadata(&mut self, key: &str) -> Option<Vec<u8>> {
        self.metadata.remove(key)
    }

    /// Raw EXIF orientation value stored in metadata, if any.
    pub fn orientation_tag(&self) -> Option<u32> {
        self.metadata
            .get(ORIENTATION_KEY)
            .and_then(|v| v.first())
            .map(|&v| v as u32)
    }

    /// Build a new image that keeps this image's metadata.
    pub(crate) fn derive(
        &self,
        width: u32,
        height: u32,
        bands: u32,
        format: BandFormat,
        samples: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(
            samples.len(),
            width as usize * height as usize * bands as usize,
            "Sample buffer size mismatch"
        );
        Self {
            width,
            height,
            bands,
            format,
            interpretation: self.interpretation,
            metadata: self.metadata.clone(),
            samples,
        }
    }
}
