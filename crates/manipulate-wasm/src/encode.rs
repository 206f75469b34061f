//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode an image as PNG, keeping alpha and bit depth
//! - [`encode_jpeg`] - Encode an opaque image as JPEG
//!
//! # Example
//!
//! ```typescript
//! const out = manipulate(image, { shape: 'circle', strim: '' });
//! const png = encode_png(out);
//! await writable.write(new Blob([png], { type: 'image/png' }));
//! ```

use crate::types::JsImage;
use image::ImageFormat;
use manipulate_core::raster::codec;
use wasm_bindgen::prelude::*;

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if the band layout cannot be represented as PNG.
#[wasm_bindgen]
pub fn encode_png(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    codec::encode(image.image(), ImageFormat::Png).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image as JPEG bytes.
///
/// JPEG has no alpha channel; flatten the image first (for example with a
/// `bg` parameter) if it has one.
///
/// # Errors
///
/// Returns an error if the image has alpha or the encoder fails.
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    codec::encode(image.image(), ImageFormat::Jpeg).map_err(|e| JsValue::from_str(&e.to_string()))
}
