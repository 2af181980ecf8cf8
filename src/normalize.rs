//! Image alignment: make two independently sized, independently channeled
//! images combinable by the pixel operator.
//!
//! Alignment runs in two stages. Size alignment resamples the secondary
//! image to the primary's dimensions (opt-in); channel normalization then
//! brings both images to a 3-channel layout. The primary image is never
//! resampled.

use slice_of_array::SliceNestExt;

use crate::error::OpError;
use crate::raster::{clamp_sample, ChannelLayout, RasterImage};

/// Pair of images guaranteed to share dimensions and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub primary: RasterImage,
    pub secondary: RasterImage,
    /// Whether `secondary` was resampled to match `primary`.
    pub resized: bool,
}

/// Aligns `secondary` to `primary` so the pair can be combined element-wise.
///
/// Equal dimensions pass through untouched. Unequal dimensions either fail
/// with [`OpError::SizeMismatch`] or, when `allow_resize` is set, resample
/// `secondary` to `primary`'s exact dimensions with area averaging. Both
/// images then have their channel layout normalized to Rgb: an alpha plane
/// is dropped (not composited), a gray plane is replicated.
pub fn align(
    primary: RasterImage,
    secondary: RasterImage,
    allow_resize: bool,
) -> Result<AlignmentResult, OpError> {
    let (secondary, resized) = if primary.dimensions() == secondary.dimensions() {
        (secondary, false)
    } else if !allow_resize {
        return Err(OpError::SizeMismatch {
            primary: primary.dimensions(),
            secondary: secondary.dimensions(),
        });
    } else {
        let (w, h) = primary.dimensions();
        (resample_area(&secondary, w, h), true)
    };

    Ok(AlignmentResult {
        primary: to_rgb(primary),
        secondary: to_rgb(secondary),
        resized,
    })
}

/// Resamples `src` to `dst_w` x `dst_h` by averaging the source pixels
/// covered by each destination pixel's footprint, weighted by coverage.
/// Behaves as a box filter when shrinking and degrades to coverage-weighted
/// interpolation when enlarging.
fn resample_area(src: &RasterImage, dst_w: usize, dst_h: usize) -> RasterImage {
    let (src_w, src_h) = src.dimensions();
    let channels = src.layout().channels();
    let data = src.data();

    // Footprint of one destination pixel in source coordinates.
    let sx = src_w as f64 / dst_w as f64;
    let sy = src_h as f64 / dst_h as f64;
    let area = sx * sy;

    let mut out = vec![0u8; dst_w * dst_h * channels];
    for dy in 0..dst_h {
        let y0 = dy as f64 * sy;
        let y1 = y0 + sy;
        let row0 = y0 as usize;
        let row1 = (libm::ceil(y1) as usize).min(src_h);
        for dx in 0..dst_w {
            let x0 = dx as f64 * sx;
            let x1 = x0 + sx;
            let col0 = x0 as usize;
            let col1 = (libm::ceil(x1) as usize).min(src_w);

            let mut accum = [0f64; 4];
            for row in row0..row1 {
                let wy = libm::fmin(y1, (row + 1) as f64) - libm::fmax(y0, row as f64);
                for col in col0..col1 {
                    let wx = libm::fmin(x1, (col + 1) as f64) - libm::fmax(x0, col as f64);
                    let base = (row * src_w + col) * channels;
                    for c in 0..channels {
                        accum[c] += wx * wy * data[base + c] as f64;
                    }
                }
            }

            let base = (dy * dst_w + dx) * channels;
            for c in 0..channels {
                out[base + c] = clamp_sample(libm::round(accum[c] / area));
            }
        }
    }

    RasterImage::from_vec(dst_w, dst_h, src.layout(), out)
        .expect("resampled buffer length matches computed dimensions")
}

/// Normalizes any supported layout to Rgb. Rgba drops its alpha plane
/// without compositing; Gray replicates its single plane.
fn to_rgb(img: RasterImage) -> RasterImage {
    match img.layout() {
        ChannelLayout::Rgb => img,
        ChannelLayout::Rgba => drop_alpha(&img),
        ChannelLayout::Gray => replicate_gray(&img),
    }
}

fn drop_alpha(src: &RasterImage) -> RasterImage {
    let mut out = Vec::with_capacity(src.width() * src.height() * 3);
    for px in src.data().nest::<[u8; 4]>() {
        out.extend_from_slice(&px[..3]);
    }
    RasterImage::from_vec(src.width(), src.height(), ChannelLayout::Rgb, out)
        .expect("converted buffer length matches dimensions")
}

fn replicate_gray(src: &RasterImage) -> RasterImage {
    let mut out = Vec::with_capacity(src.width() * src.height() * 3);
    for &v in src.data() {
        out.extend_from_slice(&[v, v, v]);
    }
    RasterImage::from_vec(src.width(), src.height(), ChannelLayout::Rgb, out)
        .expect("converted buffer length matches dimensions")
}

#[cfg(test)]
fn rgb(width: usize, height: usize, data: Vec<u8>) -> RasterImage {
    RasterImage::from_vec(width, height, ChannelLayout::Rgb, data).unwrap()
}

#[test]
fn test_align_equal_sizes_is_identity() {
    let a = rgb(2, 2, (0..12).collect());
    let b = rgb(2, 2, (12..24).collect());
    let result = align(a.clone(), b.clone(), false).unwrap();
    assert!(!result.resized);
    assert_eq!(result.primary, a);
    assert_eq!(result.secondary, b);
}

#[test]
fn test_align_rejects_mismatch_without_resize() {
    let a = rgb(2, 2, vec![0; 12]);
    let b = rgb(3, 1, vec![0; 9]);
    assert_eq!(
        align(a, b, false).unwrap_err(),
        OpError::SizeMismatch {
            primary: (2, 2),
            secondary: (3, 1)
        }
    );
}

#[test]
fn test_align_resamples_secondary_to_primary() {
    let a = rgb(2, 2, vec![0; 12]);
    let b = rgb(4, 6, vec![200; 72]);
    let result = align(a, b, true).unwrap();
    assert!(result.resized);
    assert_eq!(result.secondary.dimensions(), (2, 2));
    // Uniform input stays uniform under area averaging.
    assert!(result.secondary.data().iter().all(|&v| v == 200));
}

#[test]
fn test_align_normalizes_rgba_by_dropping_alpha() {
    let a = RasterImage::from_vec(
        1,
        2,
        ChannelLayout::Rgba,
        vec![10, 20, 30, 128, 40, 50, 60, 0],
    )
    .unwrap();
    let b = rgb(1, 2, vec![1, 2, 3, 4, 5, 6]);
    let result = align(a, b, false).unwrap();
    assert_eq!(result.primary.layout(), ChannelLayout::Rgb);
    assert_eq!(result.primary.data(), &[10, 20, 30, 40, 50, 60]);
}

#[test]
fn test_align_expands_gray_by_replication() {
    let a = RasterImage::from_vec(2, 1, ChannelLayout::Gray, vec![7, 250]).unwrap();
    let b = rgb(2, 1, vec![0; 6]);
    let result = align(a, b, false).unwrap();
    assert_eq!(result.primary.layout(), ChannelLayout::Rgb);
    assert_eq!(result.primary.data(), &[7, 7, 7, 250, 250, 250]);
}

#[test]
fn test_resample_box_average() {
    // 2x2 whole-pixel box shrink to 1x1 averages all four pixels.
    let src = RasterImage::from_vec(2, 2, ChannelLayout::Gray, vec![10, 20, 30, 40]).unwrap();
    let dst = resample_area(&src, 1, 1);
    assert_eq!(dst.data(), &[25]);
}

#[test]
fn test_resample_upscale_preserves_uniform() {
    let src = rgb(2, 2, vec![90; 12]);
    let dst = resample_area(&src, 5, 3);
    assert_eq!(dst.dimensions(), (5, 3));
    assert!(dst.data().iter().all(|&v| v == 90));
}

#[test]
fn test_resample_half_rows() {
    // 1x4 column shrunk to 1x2: each output averages two adjacent rows.
    let src = RasterImage::from_vec(1, 4, ChannelLayout::Gray, vec![0, 100, 200, 50]).unwrap();
    let dst = resample_area(&src, 1, 2);
    assert_eq!(dst.data(), &[50, 125]);
}
