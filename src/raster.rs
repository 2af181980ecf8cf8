//! Raster image value type shared by the normalizer and the pixel operator.

use crate::error::OpError;

/// Channel layouts a decoded image may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Rectangular grid of 8-bit samples, stored row-major with interleaved
/// channels. Values are never mutated after construction; every
/// transformation allocates a fresh image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn from_vec(
        width: usize,
        height: usize,
        layout: ChannelLayout,
        data: Vec<u8>,
    ) -> Result<Self, OpError> {
        if width == 0 || height == 0 {
            return Err(OpError::ZeroDimension);
        }
        let expected = width * height * layout.channels();
        if data.len() != expected {
            return Err(OpError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Saturates an arithmetic result into the valid sample range [0, 255].
pub(crate) fn clamp_sample(v: f64) -> u8 {
    libm::fmin(libm::fmax(v, 0.), 255.) as u8
}

#[test]
fn test_from_vec() {
    let img = RasterImage::from_vec(2, 3, ChannelLayout::Rgb, vec![0u8; 18]).unwrap();
    assert_eq!(img.dimensions(), (2, 3));
    assert_eq!(img.layout().channels(), 3);
    assert_eq!(img.data().len(), 18);
}

#[test]
fn test_from_vec_rejects_bad_length() {
    let err = RasterImage::from_vec(2, 2, ChannelLayout::Rgba, vec![0u8; 15]).unwrap_err();
    assert_eq!(
        err,
        OpError::BufferLength {
            expected: 16,
            actual: 15
        }
    );
}

#[test]
fn test_from_vec_rejects_zero_dimension() {
    assert_eq!(
        RasterImage::from_vec(0, 4, ChannelLayout::Gray, vec![]).unwrap_err(),
        OpError::ZeroDimension
    );
    assert_eq!(
        RasterImage::from_vec(4, 0, ChannelLayout::Gray, vec![]).unwrap_err(),
        OpError::ZeroDimension
    );
}

#[test]
fn test_clamp_sample() {
    assert_eq!(clamp_sample(-3.), 0);
    assert_eq!(clamp_sample(0.), 0);
    assert_eq!(clamp_sample(130.), 130);
    assert_eq!(clamp_sample(255.), 255);
    assert_eq!(clamp_sample(400.), 255);
}
