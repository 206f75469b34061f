//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core image
//! type, handling the conversion between Rust and JavaScript data
//! representations.

use manipulate_core::Image;
use wasm_bindgen::prelude::*;

/// An image wrapper for JavaScript.
///
/// The samples stay in WASM memory in their native bit depth. `pixels()`
/// copies them out as 8-bit values.
#[wasm_bindgen]
pub struct JsImage {
    inner: Image,
}

#[wasm_bindgen]
impl JsImage {
    /// Create an image from 8-bit interleaved pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `bands` - Samples per pixel (1 grey, 2 grey+alpha, 3 RGB, 4 RGBA)
    /// * `pixels` - Pixel data, row-major
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, bands: u32, pixels: Vec<u8>) -> Result<JsImage, JsValue> {
        Image::from_u8(width, height, bands, &pixels)
            .map(Self::from_image)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of samples per pixel
    #[wasm_bindgen(getter)]
    pub fn bands(&self) -> u32 {
        self.inner.bands()
    }

    #[wasm_bindgen(getter)]
    pub fn has_alpha(&self) -> bool {
        self.inner.has_alpha()
    }

    /// EXIF orientation still pending on the image, 0 if none.
    #[wasm_bindgen(getter)]
    pub fn orientation(&self) -> u32 {
        self.inner.orientation_tag().unwrap_or(0)
    }

    /// Returns the pixel data as an 8-bit `Uint8Array`.
    ///
    /// 16-bit images are scaled down. This creates a copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.to_u8()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsImage {
    pub(crate) fn from_image(inner: Image) -> Self {
        Self { inner }
    }

    pub(crate) fn image(&self) -> &Image {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_image_from_core() {
        let img = Image::from_u8(4, 2, 3, &[9u8; 24]).unwrap();
        let js = JsImage::from_image(img);
        assert_eq!(js.width(), 4);
        assert_eq!(js.height(), 2);
        assert_eq!(js.bands(), 3);
        assert!(!js.has_alpha());
        assert_eq!(js.orientation(), 0);
        assert_eq!(js.pixels(), vec![9u8; 24]);
    }

    #[test]
    fn test_js_image_16_bit_pixels_are_scaled() {
        let img = Image::from_u16(1, 1, 2, &[65535, 0]).unwrap();
        let js = JsImage::from_image(img);
        assert!(js.has_alpha());
        assert_eq!(js.pixels(), vec![255, 0]);
    }
}
