//! Lossless geometric operations: discrete rotation, mirroring and cropping.

use super::{Image, RasterError, Rotation};

impl Image {
    /// Rotate clockwise by a multiple of 90 degrees.
    pub fn rotate(self, rotation: Rotation) -> Image {
        if rotation == Rotation::D0 {
            return self;
        }

        let (w, h) = (self.width() as usize, self.height() as usize);
        let (out_w, out_h) = if rotation.swaps_dimensions() {
            (h, w)
        } else {
            (w, h)
        };
        let bands = self.bands() as usize;
        let src = self.samples();
        let mut samples = vec![0.0f32; src.len()];

        for ny in 0..out_h {
            for nx in 0..out_w {
                // Inverse mapping from output pixel to source pixel
                let (sx, sy) = match rotation {
                    Rotation::D90 => (ny, h - 1 - nx),
                    Rotation::D180 => (w - 1 - nx, h - 1 - ny),
                    Rotation::D270 => (w - 1 - ny, nx),
                    Rotation::D0 => (nx, ny),
                };
                let src_idx = (sy * w + sx) * bands;
                let dst_idx = (ny * out_w + nx) * bands;
                samples[dst_idx..dst_idx + bands].copy_from_slice(&src[src_idx..src_idx + bands]);
            }
        }

        self.derive(out_w as u32, out_h as u32, self.bands(), self.format(), samples)
    }

    /// Mirror about the horizontal axis (top row becomes bottom row).
    pub fn flip_vertical(self) -> Image {
        let row_len = self.width() as usize * self.bands() as usize;
        let samples: Vec<f32> = self
            .samples()
            .chunks_exact(row_len)
            .rev()
            .flatten()
            .copied()
            .collect();
        self.derive(self.width(), self.height(), self.bands(), self.format(), samples)
    }

    /// Mirror about the vertical axis (left column becomes right column).
    pub fn flip_horizontal(self) -> Image {
        let bands = self.bands() as usize;
        let row_len = self.width() as usize * bands;
        let mut samples = Vec::with_capacity(self.samples().len());
        for row in self.samples().chunks_exact(row_len) {
            for pixel in row.chunks_exact(bands).rev() {
                samples.extend_from_slice(pixel);
            }
        }
        self.derive(self.width(), self.height(), self.bands(), self.format(), samples)
    }

    /// Extract a rectangular region.
    pub fn crop(self, left: u32, top: u32, width: u32, height: u32) -> Result<Image, RasterError> {
        if width == 0
            || height == 0
            || left as u64 + width as u64 > self.width() as u64
            || top as u64 + height as u64 > self.height() as u64
        {
            return Err(RasterError::RegionOutOfBounds {
                left,
                top,
                width,
                height,
            });
        }
        if left == 0 && top == 0 && width == self.width() && height == self.height() {
            return Ok(self);
        }

        let bands = self.bands() as usize;
        let src_row = self.width() as usize * bands;
        let out_row = width as usize * bands;
        let mut samples = Vec::with_capacity(out_row * height as usize);

        // Copy pixel data row by row
        for y in top as usize..(top + height) as usize {
            let start = y * src_row + left as usize * bands;
            samples.extend_from_slice(&self.samples()[start..start + out_row]);
        }

        Ok(self.derive(width, height, self.bands(), self.format(), samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x1 image: red on the left, green on the right.
    fn red_green() -> Image {
        Image::from_u8(2, 1, 3, &[255, 0, 0, 0, 255, 0]).unwrap()
    }

    /// 3x2 greyscale image with unique values per position.
    fn numbered() -> Image {
        Image::from_u8(3, 2, 1, &[1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        assert_eq!(numbered().rotate(Rotation::D0), numbered());
    }

    #[test]
    fn test_rotate_90_clockwise() {
        // 1 2 3        4 1
        // 4 5 6   ->   5 2
        //              6 3
        let rotated = numbered().rotate(Rotation::D90);
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.samples(), &[4.0, 1.0, 5.0, 2.0, 6.0, 3.0]);
    }

    #[test]
    fn test_rotate_180() {
        let rotated = numbered().rotate(Rotation::D180);
        assert_eq!((rotated.width(), rotated.height()), (3, 2));
        assert_eq!(rotated.samples(), &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_rotate_270_clockwise() {
        // 1 2 3        3 6
        // 4 5 6   ->   2 5
        //              1 4
        let rotated = numbered().rotate(Rotation::D270);
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.samples(), &[3.0, 6.0, 2.0, 5.0, 1.0, 4.0]);
    }

    #[test]
    fn test_rotate_keeps_band_order() {
        let rotated = red_green().rotate(Rotation::D90);
        assert_eq!((rotated.width(), rotated.height()), (1, 2));
        assert_eq!(rotated.pixel(0, 0), &[255.0, 0.0, 0.0]);
        assert_eq!(rotated.pixel(0, 1), &[0.0, 255.0, 0.0]);
    }

    #[test]
    fn test_flip_vertical() {
        let flipped = numbered().flip_vertical();
        assert_eq!(flipped.samples(), &[4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_flip_horizontal() {
        let flopped = red_green().flip_horizontal();
        assert_eq!(flopped.pixel(0, 0), &[0.0, 255.0, 0.0]);
        assert_eq!(flopped.pixel(1, 0), &[255.0, 0.0, 0.0]);
    }

    #[test]
    fn test_crop_region() {
        let cropped = numbered().crop(1, 0, 2, 2).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert_eq!(cropped.samples(), &[2.0, 3.0, 5.0, 6.0]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        assert!(matches!(
            numbered().crop(2, 0, 2, 1),
            Err(RasterError::RegionOutOfBounds { .. })
        ));
        assert!(numbered().crop(0, 0, 0, 1).is_err());
    }

    #[test]
    fn test_geometry_keeps_metadata() {
        let mut img = numbered();
        img.set_metadata("icc", vec![1, 2, 3]);
        let out = img.rotate(Rotation::D90).flip_horizontal();
        assert_eq!(out.metadata().get("icc"), Some(&vec![1, 2, 3]));
    }
}
