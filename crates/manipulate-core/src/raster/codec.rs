//! Decoding and encoding through the `image` crate.
//!
//! Decoding keeps the source bit depth (8 or 16 bits) and records the EXIF
//! orientation in the image metadata under [`ORIENTATION_KEY`]; it never
//! rotates pixels itself. Orientation is applied later by the pipeline.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageBuffer, ImageFormat, ImageReader, Luma, LumaA, Rgb, Rgba};

use super::{BandFormat, Image, Interpretation, RasterError, ORIENTATION_KEY};

/// Decode an encoded image (JPEG, PNG, WebP, TIFF, GIF) from bytes.
///
/// # Errors
///
/// Returns `RasterError::Decode` if the format is unknown or the data is
/// corrupted.
pub fn decode(bytes: &[u8]) -> Result<Image, RasterError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RasterError::Decode(e.to_string()))?;
    let decoded = reader
        .decode()
        .map_err(|e| RasterError::Decode(e.to_string()))?;

    let mut image = from_dynamic(decoded)?;
    if let Some(orientation) = extract_orientation(bytes) {
        image.set_metadata(ORIENTATION_KEY, vec![orientation]);
    }
    Ok(image)
}

/// Encode an image into the given container format.
///
/// Float images are cast to the integer format matching their bit depth
/// first.
///
/// # Errors
///
/// Returns `RasterError::Encode` if the band layout has no `image` crate
/// equivalent or the encoder fails.
pub fn encode(image: &Image, format: ImageFormat) -> Result<Vec<u8>, RasterError> {
    let dynamic = to_dynamic(image)?;
    let mut buf = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buf, format)
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Read the EXIF orientation value (1-8), if present.
fn extract_orientation(bytes: &[u8]) -> Option<u8> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    u8::try_from(value).ok().filter(|v| (1..=8).contains(v))
}

fn from_dynamic(img: DynamicImage) -> Result<Image, RasterError> {
    let (width, height) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(buf) => Image::from_u8(width, height, 1, buf.as_raw()),
        DynamicImage::ImageLumaA8(buf) => Image::from_u8(width, height, 2, buf.as_raw()),
        DynamicImage::ImageRgb8(buf) => Image::from_u8(width, height, 3, buf.as_raw()),
        DynamicImage::ImageRgba8(buf) => Image::from_u8(width, height, 4, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => Image::from_u16(width, height, 1, buf.as_raw()),
        DynamicImage::ImageLumaA16(buf) => Image::from_u16(width, height, 2, buf.as_raw()),
        DynamicImage::ImageRgb16(buf) => Image::from_u16(width, height, 3, buf.as_raw()),
        DynamicImage::ImageRgba16(buf) => Image::from_u16(width, height, 4, buf.as_raw()),
        other => {
            // Float and future variants go through 8-bit RGBA
            let rgba = other.into_rgba8();
            Image::from_u8(width, height, 4, rgba.as_raw())
        }
    }
}

fn to_dynamic(image: &Image) -> Result<DynamicImage, RasterError> {
    let (width, height) = (image.width(), image.height());
    let format = match image.format() {
        BandFormat::Float => image.interpretation().integer_format(),
        other => other,
    };
    let layout_error = || {
        RasterError::Encode(format!(
            "unsupported layout: {} bands, {:?}",
            image.bands(),
            image.interpretation()
        ))
    };
    if image.interpretation() == Interpretation::Multiband {
        return Err(layout_error());
    }

    let dynamic = match format {
        BandFormat::UShort => {
            let raw: Vec<u16> = image
                .samples()
                .iter()
                .map(|&v| BandFormat::UShort.clamp(v) as u16)
                .collect();
            match image.bands() {
                1 => ImageBuffer::<Luma<u16>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageLuma16),
                2 => ImageBuffer::<LumaA<u16>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageLumaA16),
                3 => ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageRgb16),
                4 => ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageRgba16),
                _ => None,
            }
        }
        _ => {
            let raw = image.to_u8();
            match image.bands() {
                1 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageLuma8),
                2 => ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageLumaA8),
                3 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageRgb8),
                4 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, raw)
                    .map(DynamicImage::ImageRgba8),
                _ => None,
            }
        }
    };
    dynamic.ok_or_else(layout_error)
}
