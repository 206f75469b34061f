//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@manipulate/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}, orientation ${image.orientation}`);
//! ```

use crate::types::JsImage;
use manipulate_core::raster::codec;
use wasm_bindgen::prelude::*;

/// Decode an image (JPEG, PNG, WebP, TIFF or GIF) from bytes.
///
/// The EXIF orientation is recorded but not applied; `manipulate` applies it
/// and clears it.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    codec::decode(bytes)
        .map(JsImage::from_image)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use manipulate_core::Image;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_png() {
        let img = Image::from_u8(3, 2, 3, &[40u8; 18]).unwrap();
        let png = codec::encode(&img, image::ImageFormat::Png).unwrap();
        let decoded = decode_image(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[wasm_bindgen_test]
    fn test_decode_garbage() {
        assert!(decode_image(&[1, 2, 3, 4]).is_err());
    }
}
