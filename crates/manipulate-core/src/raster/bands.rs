//! Band algebra: extraction, joining, casting and constant images.

use super::{BandFormat, Image, RasterError};

impl Image {
    /// Extract `count` bands starting at `index`.
    ///
    /// The interpretation is carried over unchanged, so an alpha band pulled
    /// out of a 16-bit RGBA image still reports a 65535 alpha range.
    pub fn extract_band(&self, index: u32, count: u32) -> Result<Image, RasterError> {
        let end = match index.checked_add(count) {
            Some(end) if count > 0 && end <= self.bands() => end,
            _ => {
                return Err(RasterError::BandOutOfRange {
                    index,
                    count,
                    bands: self.bands(),
                })
            }
        };

        let bands = self.bands() as usize;
        let (start, end) = (index as usize, end as usize);
        let mut samples = Vec::with_capacity(self.pixel_count() * count as usize);
        for pixel in self.samples().chunks_exact(bands) {
            samples.extend_from_slice(&pixel[start..end]);
        }

        Ok(self.derive(self.width(), self.height(), count, self.format(), samples))
    }

    /// Append the bands of `other` after this image's bands.
    ///
    /// The result keeps this image's format and interpretation; callers cast
    /// `other` first when the formats differ.
    pub fn join(&self, other: &Image) -> Result<Image, RasterError> {
        self.check_same_size(other)?;

        let (a, b) = (self.bands() as usize, other.bands() as usize);
        let mut samples = Vec::with_capacity(self.pixel_count() * (a + b));
        for (left, right) in self
            .samples()
            .chunks_exact(a)
            .zip(other.samples().chunks_exact(b))
        {
            samples.extend_from_slice(left);
            samples.extend_from_slice(right);
        }

        Ok(self.derive(
            self.width(),
            self.height(),
            self.bands() + other.bands(),
            self.format(),
            samples,
        ))
    }

    /// Convert to another band format, rounding and clamping to its range.
    pub fn cast(self, format: BandFormat) -> Image {
        if format == self.format() && format != BandFormat::Float {
            return self;
        }
        let samples = self.samples().iter().map(|&v| format.clamp(v)).collect();
        self.derive(self.width(), self.height(), self.bands(), format, samples)
    }

    /// Create a same-size image where every pixel is `values`.
    pub fn new_from_image(&self, values: &[f32]) -> Result<Image, RasterError> {
        if values.is_empty() {
            return Err(RasterError::InvalidDimensions {
                width: self.width(),
                height: self.height(),
                bands: 0,
            });
        }
        let samples = values
            .iter()
            .copied()
            .cycle()
            .take(self.pixel_count() * values.len())
            .collect();
        Ok(self.derive(
            self.width(),
            self.height(),
            values.len() as u32,
            self.format(),
            samples,
        ))
    }

    pub(crate) fn check_same_size(&self, other: &Image) -> Result<(), RasterError> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(RasterError::SizeMismatch {
                left_width: self.width(),
                left_height: self.height(),
                right_width: other.width(),
                right_height: other.height(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Interpretation;

    fn rgba_2x1() -> Image {
        Image::from_u8(2, 1, 4, &[10, 20, 30, 40, 50, 60, 70, 80]).unwrap()
    }

    #[test]
    fn test_extract_last_band() {
        let alpha = rgba_2x1().extract_band(3, 1).unwrap();
        assert_eq!(alpha.bands(), 1);
        assert_eq!(alpha.samples(), &[40.0, 80.0]);
        assert_eq!(alpha.interpretation(), Interpretation::Srgb);
    }

    #[test]
    fn test_extract_colour_bands() {
        let rgb = rgba_2x1().extract_band(0, 3).unwrap();
        assert_eq!(rgb.bands(), 3);
        assert_eq!(rgb.samples(), &[10.0, 20.0, 30.0, 50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_extract_out_of_range() {
        let err = rgba_2x1().extract_band(3, 2).unwrap_err();
        assert!(matches!(err, RasterError::BandOutOfRange { .. }));
    }

    #[test]
    fn test_extract_range_overflowing_u32() {
        let err = rgba_2x1().extract_band(1, u32::MAX).unwrap_err();
        assert_eq!(
            err,
            RasterError::BandOutOfRange {
                index: 1,
                count: u32::MAX,
                bands: 4
            }
        );
        assert_eq!(
            err.to_string(),
            "Bands 1..4294967296 out of range for an image with 4 bands"
        );
    }

    #[test]
    fn test_join_appends_bands() {
        let img = rgba_2x1();
        let rgb = img.extract_band(0, 3).unwrap();
        let alpha = img.extract_band(3, 1).unwrap();
        assert_eq!(rgb.join(&alpha).unwrap().samples(), img.samples());
    }

    #[test]
    fn test_join_size_mismatch() {
        let a = Image::from_u8(2, 1, 1, &[0, 0]).unwrap();
        let b = Image::from_u8(1, 2, 1, &[0, 0]).unwrap();
        assert!(matches!(a.join(&b), Err(RasterError::SizeMismatch { .. })));
    }

    #[test]
    fn test_cast_rounds_and_clamps() {
        let img = Image::from_samples(
            3,
            1,
            1,
            BandFormat::Float,
            Interpretation::BW,
            vec![-3.0, 127.6, 400.0],
        )
        .unwrap();
        let cast = img.cast(BandFormat::UChar);
        assert_eq!(cast.format(), BandFormat::UChar);
        assert_eq!(cast.samples(), &[0.0, 128.0, 255.0]);
    }

    #[test]
    fn test_new_from_image() {
        let img = rgba_2x1();
        let constant = img.new_from_image(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(constant.width(), 2);
        assert_eq!(constant.samples(), &[1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0, 4.0]);
    }
}
