use imgops_wasm::{align, apply, ChannelLayout, OpError, PixelOp, RasterImage};

fn rgba_fill(width: usize, height: usize, px: [u8; 4]) -> RasterImage {
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&px);
    }
    RasterImage::from_vec(width, height, ChannelLayout::Rgba, data).unwrap()
}

#[test]
fn canvas_shaped_inputs_run_end_to_end() {
    // Canvas snapshots are always Rgba; the pipeline must align them to Rgb
    // and combine without the caller doing any conversion.
    let a = rgba_fill(4, 3, [10, 10, 10, 255]);
    let b = rgba_fill(4, 3, [250, 250, 250, 255]);

    let aligned = align(a, b, false).unwrap();
    assert!(!aligned.resized);
    assert_eq!(aligned.primary.layout(), ChannelLayout::Rgb);
    assert_eq!(aligned.secondary.layout(), ChannelLayout::Rgb);

    let sum = apply(&aligned.primary, &aligned.secondary, PixelOp::Add).unwrap();
    assert!(sum.data().iter().all(|&v| v == 255));

    let diff = apply(&aligned.primary, &aligned.secondary, PixelOp::Subtract).unwrap();
    assert!(diff.data().iter().all(|&v| v == 0));

    let mixed = apply(&aligned.primary, &aligned.secondary, PixelOp::Blend(0.5)).unwrap();
    assert!(mixed.data().iter().all(|&v| v == 130));
}

#[test]
fn mismatched_sizes_resample_secondary_only() {
    let a = rgba_fill(6, 4, [100, 100, 100, 255]);
    let b = rgba_fill(12, 8, [40, 40, 40, 255]);

    let aligned = align(a, b, true).unwrap();
    assert!(aligned.resized);
    assert_eq!(aligned.primary.dimensions(), (6, 4));
    assert_eq!(aligned.secondary.dimensions(), (6, 4));

    let out = apply(&aligned.primary, &aligned.secondary, PixelOp::Lighten).unwrap();
    assert_eq!(out.dimensions(), (6, 4));
    assert!(out.data().iter().all(|&v| v == 100));
}

#[test]
fn mismatched_sizes_without_opt_in_fail_before_any_work() {
    let a = rgba_fill(6, 4, [1, 2, 3, 255]);
    let b = rgba_fill(5, 4, [4, 5, 6, 255]);

    match align(a, b, false) {
        Err(OpError::SizeMismatch { primary, secondary }) => {
            assert_eq!(primary, (6, 4));
            assert_eq!(secondary, (5, 4));
        }
        other => panic!("expected SizeMismatch, got {:?}", other),
    }
}

#[test]
fn grayscale_against_color_combines_channel_uniformly() {
    let gray = RasterImage::from_vec(2, 1, ChannelLayout::Gray, vec![100, 200]).unwrap();
    let color =
        RasterImage::from_vec(2, 1, ChannelLayout::Rgb, vec![50, 10, 0, 30, 20, 10]).unwrap();

    let aligned = align(gray, color, false).unwrap();
    let out = apply(&aligned.primary, &aligned.secondary, PixelOp::Add).unwrap();
    assert_eq!(out.data(), &[150, 110, 100, 230, 220, 210]);
}
