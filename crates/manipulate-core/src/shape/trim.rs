//! Crop rectangle that trims the canvas down to a shape mask.

use serde::{Deserialize, Serialize};

/// Pixel rectangle to extract after masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl TrimRect {
    /// Check if the rectangle is smaller than the canvas on either axis.
    pub fn trims(&self, width: u32, height: u32) -> bool {
        self.width < width || self.height < height
    }
}

/// Resolve the area a mask of `mask_width`x`mask_height` occupies once it
/// has been fitted (uniform scale, centred) into a `width`x`height` canvas.
///
/// Returns `None` for a degenerate mask: zero or non-finite area, or one that
/// shrinks below a pixel once fitted.
pub fn resolve_trim(width: u32, height: u32, mask_width: f64, mask_height: f64) -> Option<TrimRect> {
    if !(mask_width.is_finite() && mask_height.is_finite())
        || mask_width <= 0.0
        || mask_height <= 0.0
    {
        return None;
    }

    let (w, h) = (width as f64, height as f64);
    let scale = (w / mask_width).min(h / mask_height);
    let trim_width = mask_width * scale;
    let trim_height = mask_height * scale;

    let rect = TrimRect {
        left: ((w - trim_width) / 2.0).round().max(0.0) as u32,
        top: ((h - trim_height) / 2.0).round().max(0.0) as u32,
        width: trim_width.round() as u32,
        height: trim_height.round() as u32,
    };
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    Some(rect)
}
