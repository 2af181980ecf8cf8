//! Per-pixel arithmetic and blend operators over aligned image pairs.
//!
//! Every operator works channel-by-channel with 8-bit saturation semantics:
//! results land in [0, 255]. Inputs must already be aligned (same
//! dimensions, same layout); the normalizer establishes that.

use crate::error::OpError;
use crate::raster::{clamp_sample, RasterImage};

/// Operator selection. The blend weight rides inside the variant since it is
/// only meaningful for [`PixelOp::Blend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelOp {
    Add,
    Subtract,
    Multiply,
    Lighten,
    Blend(f64),
}

impl PixelOp {
    /// Parses the operator name the UI sends. Unknown names fail with
    /// [`OpError::UnsupportedOperator`]; `alpha` is consumed only by blend.
    pub fn parse(name: &str, alpha: f64) -> Result<Self, OpError> {
        match name {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "multiply" => Ok(Self::Multiply),
            "lighten" => Ok(Self::Lighten),
            "blend" => Ok(Self::Blend(alpha)),
            other => Err(OpError::UnsupportedOperator(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Lighten => "lighten",
            Self::Blend(_) => "blend",
        }
    }
}

/// Computes `op` over an aligned pair, producing a fresh image with the
/// inputs' shared shape. Mismatched shapes are a defect in the calling
/// sequence and fail with [`OpError::ShapeMismatch`].
pub fn apply(
    primary: &RasterImage,
    secondary: &RasterImage,
    op: PixelOp,
) -> Result<RasterImage, OpError> {
    if primary.dimensions() != secondary.dimensions() || primary.layout() != secondary.layout() {
        return Err(OpError::ShapeMismatch);
    }
    if let PixelOp::Blend(weight) = op {
        if !(0.0..=1.0).contains(&weight) {
            return Err(OpError::InvalidWeight(weight));
        }
    }

    let pairs = primary.data().iter().zip(secondary.data().iter());
    let out: Vec<u8> = match op {
        PixelOp::Add => pairs.map(|(&a, &b)| a.saturating_add(b)).collect(),
        PixelOp::Subtract => pairs.map(|(&a, &b)| a.saturating_sub(b)).collect(),
        PixelOp::Multiply => pairs.map(|(&a, &b)| multiply_scaled(a, b)).collect(),
        PixelOp::Lighten => pairs.map(|(&a, &b)| a.max(b)).collect(),
        PixelOp::Blend(weight) => pairs.map(|(&a, &b)| blend_weighted(a, b, weight)).collect(),
    };

    Ok(
        RasterImage::from_vec(primary.width(), primary.height(), primary.layout(), out)
            .expect("output buffer length matches input dimensions"),
    )
}

/// Normalized multiply: white (255) is identity, black (0) annihilates.
fn multiply_scaled(a: u8, b: u8) -> u8 {
    clamp_sample(libm::round(a as f64 * b as f64 / 255.))
}

/// Weighted sum `a * weight + b * (1 - weight)`.
fn blend_weighted(a: u8, b: u8, weight: f64) -> u8 {
    clamp_sample(libm::round(a as f64 * weight + b as f64 * (1. - weight)))
}

#[cfg(test)]
use crate::raster::ChannelLayout;

#[cfg(test)]
fn rgb(width: usize, height: usize, data: Vec<u8>) -> RasterImage {
    RasterImage::from_vec(width, height, ChannelLayout::Rgb, data).unwrap()
}

#[cfg(test)]
fn uniform(value: u8) -> RasterImage {
    rgb(2, 2, vec![value; 12])
}

#[test]
fn test_parse() {
    assert_eq!(PixelOp::parse("add", 0.).unwrap(), PixelOp::Add);
    assert_eq!(PixelOp::parse("lighten", 0.).unwrap(), PixelOp::Lighten);
    assert_eq!(PixelOp::parse("blend", 0.25).unwrap(), PixelOp::Blend(0.25));
    assert_eq!(
        PixelOp::parse("invert", 0.).unwrap_err(),
        OpError::UnsupportedOperator("invert".to_string())
    );
}

#[test]
fn test_add_saturates() {
    let out = apply(&uniform(10), &uniform(250), PixelOp::Add).unwrap();
    assert!(out.data().iter().all(|&v| v == 255));
    let out = apply(&uniform(10), &uniform(20), PixelOp::Add).unwrap();
    assert!(out.data().iter().all(|&v| v == 30));
}

#[test]
fn test_subtract_clamps_to_zero() {
    let out = apply(&uniform(10), &uniform(250), PixelOp::Subtract).unwrap();
    assert!(out.data().iter().all(|&v| v == 0));
    let out = apply(&uniform(250), &uniform(10), PixelOp::Subtract).unwrap();
    assert!(out.data().iter().all(|&v| v == 240));
}

#[test]
fn test_multiply_identity_and_annihilation() {
    let a = rgb(2, 2, (0..12).map(|v| v * 20).map(|v| v as u8).collect());
    let white = uniform(255);
    assert_eq!(apply(&a, &white, PixelOp::Multiply).unwrap(), a);
    let black = uniform(0);
    let out = apply(&a, &black, PixelOp::Multiply).unwrap();
    assert!(out.data().iter().all(|&v| v == 0));
}

#[test]
fn test_multiply_scales_by_255() {
    // 128 * 128 / 255 rounds to 64.
    assert_eq!(multiply_scaled(128, 128), 64);
    assert_eq!(multiply_scaled(255, 255), 255);
    assert_eq!(multiply_scaled(1, 254), 1);
}

#[test]
fn test_lighten_takes_max() {
    let a = rgb(1, 2, vec![10, 200, 30, 40, 50, 60]);
    let b = rgb(1, 2, vec![20, 100, 30, 250, 0, 70]);
    let out = apply(&a, &b, PixelOp::Lighten).unwrap();
    assert_eq!(out.data(), &[20, 200, 30, 250, 50, 70]);
}

#[test]
fn test_blend_endpoints_reproduce_inputs() {
    let a = rgb(1, 2, vec![10, 200, 30, 40, 50, 60]);
    let b = rgb(1, 2, vec![20, 100, 30, 250, 0, 70]);
    assert_eq!(apply(&a, &b, PixelOp::Blend(1.)).unwrap(), a);
    assert_eq!(apply(&a, &b, PixelOp::Blend(0.)).unwrap(), b);
}

#[test]
fn test_blend_half() {
    // 10 * 0.5 + 250 * 0.5 = 130 exactly.
    let out = apply(&uniform(10), &uniform(250), PixelOp::Blend(0.5)).unwrap();
    assert!(out.data().iter().all(|&v| v == 130));
}

#[test]
fn test_blend_rejects_out_of_range_weight() {
    assert_eq!(
        apply(&uniform(1), &uniform(2), PixelOp::Blend(1.5)).unwrap_err(),
        OpError::InvalidWeight(1.5)
    );
    assert_eq!(
        apply(&uniform(1), &uniform(2), PixelOp::Blend(-0.1)).unwrap_err(),
        OpError::InvalidWeight(-0.1)
    );
}

#[test]
fn test_apply_rejects_mismatched_shapes() {
    let a = rgb(2, 2, vec![0; 12]);
    let b = rgb(2, 1, vec![0; 6]);
    assert_eq!(apply(&a, &b, PixelOp::Add).unwrap_err(), OpError::ShapeMismatch);
    let c = RasterImage::from_vec(2, 2, ChannelLayout::Rgba, vec![0; 16]).unwrap();
    assert_eq!(apply(&a, &c, PixelOp::Add).unwrap_err(), OpError::ShapeMismatch);
}
