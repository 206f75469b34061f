//! Background colour compositing.
//!
//! Images with alpha get a background in one of two ways:
//!
//! - **Composite**: a colour with its own alpha channel on a colour image is
//!   placed *under* the image with the "over" operator. The work happens on
//!   premultiplied data and the result stays premultiplied; the pipeline
//!   unpremultiplies once at the end.
//! - **Flatten**: otherwise the image is blended onto an opaque colour and its
//!   alpha band is dropped. Greyscale images use the colour's luma.
//!
//! The background colour is given in 8-bit terms and scaled to the image's
//! alpha range, so 16-bit images flatten onto the same visual colour.

use crate::color::Color;
use crate::pipeline::{PipelineError, PipelineState, Stage};
use crate::raster::{Image, RasterError};

/// Apply `color` as the background of `image`.
///
/// Returns the image untouched when no colour is given, the image has no
/// alpha, or the colour is fully transparent. The premultiplication flag in
/// `state` is updated to match the returned image.
///
/// # Errors
///
/// Propagates raster failures from compositing or flattening.
pub fn apply_background(
    image: Image,
    color: Option<Color>,
    mut state: PipelineState,
) -> Result<(Image, PipelineState), RasterError> {
    let color = match color {
        Some(color) if image.has_alpha() && !color.is_transparent() => color,
        _ => return Ok((image, state)),
    };
    let scale = image.max_alpha() / 255.0;

    if image.bands() > 2 && color.has_alpha_channel {
        let background = image
            .new_from_image(&color.to_rgba().map(|c| c as f32 * scale))?
            .premultiply();
        let image = if state.is_premultiplied {
            image
        } else {
            state.is_premultiplied = true;
            image.premultiply()
        };
        let composited = background.composite_over(image, true)?;
        return Ok((composited, state));
    }

    let values = if image.bands() < 3 {
        vec![color.luma() * scale]
    } else {
        vec![
            color.r as f32 * scale,
            color.g as f32 * scale,
            color.b as f32 * scale,
        ]
    };
    let image = if state.is_premultiplied {
        state.is_premultiplied = false;
        let format = image.interpretation().integer_format();
        image.unpremultiply().cast(format)
    } else {
        image
    };
    Ok((image.flatten(&values)?, state))
}

/// Pipeline stage applying the requested background colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundStage;

impl Stage for BackgroundStage {
    fn name(&self) -> &'static str {
        "background"
    }

    fn run(
        &self,
        image: Image,
        state: PipelineState,
    ) -> Result<(Image, PipelineState), PipelineError> {
        let color = state.options.background.color;
        Ok(apply_background(image, color, state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BandFormat;

    fn translucent() -> Image {
        Image::from_u8(1, 1, 4, &[200, 100, 0, 128]).unwrap()
    }

    fn approx(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_no_color_is_noop() {
        let (out, state) = apply_background(translucent(), None, PipelineState::default()).unwrap();
        assert_eq!(out, translucent());
        assert!(!state.is_premultiplied);
    }

    #[test]
    fn test_transparent_color_is_noop() {
        let color = "transparent".parse().ok();
        let (out, state) = apply_background(translucent(), color, PipelineState::default()).unwrap();
        assert_eq!(out, translucent());
        assert_eq!(state, PipelineState::default());
    }

    #[test]
    fn test_opaque_image_is_noop() {
        let img = Image::from_u8(1, 1, 3, &[1, 2, 3]).unwrap();
        let (out, _) =
            apply_background(img.clone(), Some(Color::rgb(255, 0, 0)), PipelineState::default())
                .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_flatten_rgba_onto_opaque_color() {
        let (out, state) =
            apply_background(translucent(), Some(Color::rgb(255, 0, 0)), PipelineState::default())
                .unwrap();
        assert_eq!(out.bands(), 3);
        assert!(!out.has_alpha());
        assert_eq!(out.format(), BandFormat::UChar);
        assert_eq!(out.samples(), &[227.0, 50.0, 0.0]);
        assert!(!state.is_premultiplied);
    }

    #[test]
    fn test_flatten_grey_uses_luma() {
        let img = Image::from_u8(2, 1, 2, &[100, 0, 100, 255]).unwrap();
        let (out, _) =
            apply_background(img, Some(Color::rgb(255, 0, 0)), PipelineState::default()).unwrap();
        assert_eq!(out.bands(), 1);
        assert_eq!(out.samples(), &[54.0, 100.0]);
    }

    #[test]
    fn test_grey_with_alpha_color_flattens() {
        let img = Image::from_u8(1, 1, 2, &[0, 0]).unwrap();
        let (out, state) = apply_background(
            img,
            Some(Color::rgba(255, 255, 255, 128)),
            PipelineState::default(),
        )
        .unwrap();
        assert_eq!(out.samples(), &[255.0]);
        assert!(!state.is_premultiplied);
    }

    #[test]
    fn test_flatten_16_bit_scales_color() {
        let img = Image::from_u16(1, 1, 4, &[0, 0, 0, 0]).unwrap();
        let (out, _) =
            apply_background(img, Some(Color::rgb(255, 255, 255)), PipelineState::default())
                .unwrap();
        assert_eq!(out.format(), BandFormat::UShort);
        assert_eq!(out.samples(), &[65535.0, 65535.0, 65535.0]);
    }

    #[test]
    fn test_composite_sets_premultiplied_flag() {
        let (out, state) = apply_background(
            translucent(),
            Some(Color::rgba(0, 0, 255, 255)),
            PipelineState::default(),
        )
        .unwrap();
        assert!(state.is_premultiplied);
        assert_eq!(out.format(), BandFormat::Float);
        assert_eq!(out.bands(), 4);
        approx(out.samples(), &[100.392, 50.196, 127.0, 255.0]);
    }

    #[test]
    fn test_composite_on_premultiplied_input_keeps_flag() {
        let state = PipelineState {
            is_premultiplied: true,
            ..Default::default()
        };
        let img = translucent().premultiply();
        let (out, state) =
            apply_background(img, Some(Color::rgba(0, 0, 255, 255)), state).unwrap();
        assert!(state.is_premultiplied);
        approx(out.samples(), &[100.392, 50.196, 127.0, 255.0]);
    }

    #[test]
    fn test_flatten_after_composite_clears_flag() {
        let (img, state) = apply_background(
            translucent(),
            Some(Color::rgba(0, 0, 255, 255)),
            PipelineState::default(),
        )
        .unwrap();
        let (out, state) = apply_background(img, Some(Color::rgb(255, 255, 255)), state).unwrap();
        assert!(!state.is_premultiplied);
        assert_eq!(out.format(), BandFormat::UChar);
        assert_eq!(out.samples(), &[100.0, 50.0, 127.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the flag is set only when the composite branch ran.
        #[test]
        fn prop_premultiplied_flag_tracks_branch(
            pixel in proptest::array::uniform4(0u8..=255),
            rgba in proptest::array::uniform4(0u8..=255),
            with_alpha in any::<bool>(),
        ) {
            let img = Image::from_u8(1, 1, 4, &pixel).unwrap();
            let color = if with_alpha {
                Color::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
            } else {
                Color::rgb(rgba[0], rgba[1], rgba[2])
            };
            let (out, state) = apply_background(img, Some(color), PipelineState::default()).unwrap();

            let composited = with_alpha && rgba[3] > 0;
            prop_assert_eq!(state.is_premultiplied, composited);
            // Only flattening drops the alpha band
            prop_assert_eq!(out.has_alpha(), with_alpha);
        }
    }
}
