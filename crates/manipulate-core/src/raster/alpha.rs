//! Alpha handling: premultiplication, "over" compositing and flattening.
//!
//! The alpha band is always the last band. Alpha values are normalized by the
//! image's maximum alpha (255 or 65535, see [`Interpretation::max_alpha`]).
//!
//! [`Interpretation::max_alpha`]: super::Interpretation::max_alpha

use super::{BandFormat, Image, RasterError};

impl Image {
    /// Multiply the colour bands by the alpha fraction.
    ///
    /// The result is a `Float` image. Images without alpha are only cast.
    pub fn premultiply(self) -> Image {
        if !self.has_alpha() {
            return self.cast(BandFormat::Float);
        }
        let max = self.max_alpha();
        let bands = self.bands() as usize;
        let mut samples = self.samples().to_vec();
        for pixel in samples.chunks_exact_mut(bands) {
            let factor = pixel[bands - 1].clamp(0.0, max) / max;
            for value in &mut pixel[..bands - 1] {
                *value *= factor;
            }
        }
        self.derive(self.width(), self.height(), self.bands(), BandFormat::Float, samples)
    }

    /// Divide the colour bands by the alpha fraction.
    ///
    /// Fully transparent pixels get zero colour. The result is a `Float`
    /// image; cast it back to an integer format before encoding.
    pub fn unpremultiply(self) -> Image {
        if !self.has_alpha() {
            return self.cast(BandFormat::Float);
        }
        let max = self.max_alpha();
        let bands = self.bands() as usize;
        let mut samples = self.samples().to_vec();
        for pixel in samples.chunks_exact_mut(bands) {
            let factor = pixel[bands - 1].clamp(0.0, max) / max;
            for value in &mut pixel[..bands - 1] {
                *value = if factor > 0.0 { *value / factor } else { 0.0 };
            }
        }
        self.derive(self.width(), self.height(), self.bands(), BandFormat::Float, samples)
    }

    /// Composite `src` over this image using the "over" operator.
    ///
    /// `self` is the base (background) layer. When `premultiplied` is true
    /// both operands are taken to be premultiplied already and the result is
    /// left premultiplied; otherwise both are premultiplied first and the
    /// result is unpremultiplied again. The result is a `Float` image.
    pub fn composite_over(self, src: Image, premultiplied: bool) -> Result<Image, RasterError> {
        self.check_same_size(&src)?;
        if self.bands() != src.bands() {
            return Err(RasterError::BandMismatch {
                expected: self.bands(),
                actual: src.bands(),
            });
        }
        if !src.has_alpha() {
            // An opaque source hides the base completely.
            return Ok(src.cast(BandFormat::Float));
        }

        let (base, src) = if premultiplied {
            (self, src)
        } else {
            (self.premultiply(), src.premultiply())
        };

        let max = src.max_alpha();
        let bands = base.bands() as usize;
        let mut samples = base.samples().to_vec();
        for (out, over) in samples
            .chunks_exact_mut(bands)
            .zip(src.samples().chunks_exact(bands))
        {
            let remaining = 1.0 - over[bands - 1].clamp(0.0, max) / max;
            for (dst, value) in out.iter_mut().zip(over) {
                *dst = value + *dst * remaining;
            }
        }

        let composited =
            base.derive(base.width(), base.height(), base.bands(), BandFormat::Float, samples);
        Ok(if premultiplied {
            composited
        } else {
            composited.unpremultiply()
        })
    }

    /// Blend onto an opaque background and drop the alpha band.
    ///
    /// `background` holds one value per colour band, or a single value that
    /// applies to every colour band. Images without alpha are returned as-is.
    pub fn flatten(self, background: &[f32]) -> Result<Image, RasterError> {
        if !self.has_alpha() {
            return Ok(self);
        }
        let colour_bands = self.bands() as usize - 1;
        if background.len() != 1 && background.len() != colour_bands {
            return Err(RasterError::BandMismatch {
                expected: colour_bands as u32,
                actual: background.len() as u32,
            });
        }

        let max = self.max_alpha();
        let format = self.format();
        let mut samples = Vec::with_capacity(self.pixel_count() * colour_bands);
        for pixel in self.samples().chunks_exact(colour_bands + 1) {
            let alpha = pixel[colour_bands].clamp(0.0, max) / max;
            for (band, &value) in pixel[..colour_bands].iter().enumerate() {
                let bg = background[band.min(background.len() - 1)];
                samples.push(format.clamp(value * alpha + bg * (1.0 - alpha)));
            }
        }

        Ok(self.derive(
            self.width(),
            self.height(),
            colour_bands as u32,
            format,
            samples,
        ))
    }
}
