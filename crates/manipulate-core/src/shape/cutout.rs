//! Cutout: replace an image's alpha with a mask, intersected with any alpha
//! the image already had.
//!
//! # Algorithm
//!
//! 1. If the mask has alpha, only its alpha band is used
//! 2. The destination is split into colour bands and an optional alpha band
//! 3. With destination alpha, both alphas are normalized by their maximum
//!    (255 or 65535), multiplied, and rescaled to the destination range:
//!    `mask/mask_max · alpha/dst_max · dst_max`
//! 4. The combined alpha is cast to the destination format and appended
//!
//! Without destination alpha the mask is appended as-is: the destination
//! contributes full opacity, so no rescale is applied.

use crate::raster::{BandFormat, Image, RasterError};

/// Cut `dst` out along `mask`.
///
/// # Errors
///
/// Returns `RasterError::SizeMismatch` if the mask and destination differ in
/// size.
pub fn cutout(mask: Image, dst: Image) -> Result<Image, RasterError> {
    let mask = if mask.has_alpha() {
        mask.extract_band(mask.bands() - 1, 1)?
    } else {
        mask
    };

    let (colour, dst_alpha) = if dst.has_alpha() {
        let bands = dst.bands();
        (dst.extract_band(0, bands - 1)?, Some(dst.extract_band(bands - 1, 1)?))
    } else {
        (dst, None)
    };

    let dst_max = colour.max_alpha();
    let mask_max = mask.max_alpha();

    let alpha = match dst_alpha {
        Some(dst_alpha) => {
            mask.check_same_size(&dst_alpha)?;
            let samples = mask
                .samples()
                .iter()
                .zip(dst_alpha.samples())
                .map(|(&m, &a)| (m / mask_max) * (a / dst_max) * dst_max)
                .collect();
            Image::from_samples(
                mask.width(),
                mask.height(),
                1,
                BandFormat::Float,
                mask.interpretation(),
                samples,
            )?
        }
        None => mask,
    };

    colour.join(&alpha.cast(colour.format()))
}
