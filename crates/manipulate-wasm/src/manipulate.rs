//! Manipulation WASM bindings.
//!
//! Parameters are passed as a plain object of strings, mirroring a query
//! string. Flags such as `strim`, `flip` and `flop` only need to be present.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, manipulate, JsPipeline } from '@manipulate/wasm';
//!
//! const image = decode_image(bytes);
//! const avatar = manipulate(image, { shape: 'circle', strim: '', bg: '#fff0' });
//!
//! // With presets
//! const pipeline = new JsPipeline('{"presets": {"avatar": {"shape": "circle"}}}');
//! const out = pipeline.run(image, { p: 'avatar' });
//! ```

use crate::types::JsImage;
use manipulate_core::params::ParamMap;
use manipulate_core::shape::{aspect_ratio, generate, ShapeKind};
use manipulate_core::{Image, Pipeline, PipelineConfig, PipelineError};
use wasm_bindgen::prelude::*;

/// Apply orientation, shape and background to an image.
///
/// # Errors
///
/// Returns an error if `params` is not an object of strings or a raster
/// operation fails.
#[wasm_bindgen]
pub fn manipulate(image: &JsImage, params: JsValue) -> Result<JsImage, JsValue> {
    let params = params_from_js(params)?;
    run(&PipelineConfig::default(), &Pipeline::default(), image.image(), params)
        .map(JsImage::from_image)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A pipeline with configured defaults and presets.
#[wasm_bindgen]
pub struct JsPipeline {
    config: PipelineConfig,
    pipeline: Pipeline,
}

#[wasm_bindgen]
impl JsPipeline {
    /// Create a pipeline from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<JsPipeline, JsValue> {
        let config =
            PipelineConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(config))
    }

    /// Run the pipeline with the configured defaults and presets applied.
    pub fn run(&self, image: &JsImage, params: JsValue) -> Result<JsImage, JsValue> {
        let params = params_from_js(params)?;
        run(&self.config, &self.pipeline, image.image(), params)
            .map(JsImage::from_image)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsPipeline {
    pub(crate) fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::default(),
        }
    }
}

/// Render the mask of `shape` for a `width`x`height` canvas as an SVG
/// document.
///
/// # Errors
///
/// Returns an error for unknown shape names.
#[wasm_bindgen]
pub fn shape_svg(shape: &str, width: u32, height: u32) -> Result<String, JsValue> {
    let kind: ShapeKind = shape
        .parse()
        .map_err(|e: manipulate_core::ShapeParseError| JsValue::from_str(&e.to_string()))?;
    Ok(svg_document(kind, width, height))
}

fn svg_document(kind: ShapeKind, width: u32, height: u32) -> String {
    generate(kind, width, height).to_svg_document(width, height, aspect_ratio(kind))
}

fn params_from_js(params: JsValue) -> Result<ParamMap, JsValue> {
    if params.is_undefined() || params.is_null() {
        return Ok(ParamMap::new());
    }
    serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Invalid parameters: {}", e)))
}

fn run(
    config: &PipelineConfig,
    pipeline: &Pipeline,
    image: &Image,
    params: ParamMap,
) -> Result<Image, PipelineError> {
    let params = config.resolve_params(&params);
    pipeline
        .run(image.clone(), params)
        .map(|output| output.image)
}
