//! Manipulate WASM - WebAssembly bindings for the image manipulation core
//!
//! This crate exposes decoding, manipulation (orientation, shape masks,
//! background colour) and encoding to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper type for image data
//! - `decode` - Image decoding bindings
//! - `encode` - PNG/JPEG encoding bindings
//! - `manipulate` - Pipeline, presets and shape SVG bindings
//! - `logging` - Browser console sink for pipeline logs
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, manipulate, encode_png } from '@manipulate/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const out = manipulate(image, { shape: 'star', strim: '', bg: 'white' });
//! const png = encode_png(out);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod logging;
mod manipulate;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use encode::{encode_jpeg, encode_png};
pub use logging::enable_logging;
pub use manipulate::{manipulate, shape_svg, JsPipeline};
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Logging stays off until enable_logging is called
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
