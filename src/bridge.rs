//! Canvas-facing wasm entry points.
//!
//! JS hands over the 2d contexts of the two source canvases and the output
//! canvas; everything between decoded pixels and the rendered result happens
//! here. Telemetry stays in JS: [`apply_operation`] returns a stats object
//! the page may forward, but the crate never talks to the network.

use std::panic;

use slice_of_array::SliceNestExt;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::{
    console_log,
    error::OpError,
    normalize::align,
    ops::{apply, PixelOp},
    raster::{ChannelLayout, RasterImage},
    window,
};

/// Runs once when the wasm module is instantiated. Module init resolving is
/// the readiness signal the page awaits before enabling its controls.
#[wasm_bindgen(start)]
pub fn start() {
    panic::set_hook(Box::new(console_error_panic_hook::hook));
    console_log!("imgops-wasm ready");
}

/// Applies `op_name` to the images held by canvases A and B and renders the
/// result into the output canvas.
///
/// Returns a `{ op, ms, resized, aW, aH, bW, bH, outW, outH }` object on
/// success; all pipeline failures surface as a rejected `JsValue` carrying
/// the error message.
#[wasm_bindgen]
pub fn apply_operation(
    ctx_a: &CanvasRenderingContext2d,
    ctx_b: &CanvasRenderingContext2d,
    ctx_out: &CanvasRenderingContext2d,
    op_name: &str,
    alpha: f64,
    allow_resize: bool,
) -> Result<JsValue, JsValue> {
    let performance = window().performance();
    let started = performance.as_ref().map(|p| p.now()).unwrap_or(0.);

    let op = PixelOp::parse(op_name, alpha)?;
    let a = read_canvas(ctx_a)?;
    let b = read_canvas(ctx_b)?;
    let (a_w, a_h) = a.dimensions();
    let (b_w, b_h) = b.dimensions();

    let aligned = align(a, b, allow_resize)?;
    let resized = aligned.resized;
    let result = apply(&aligned.primary, &aligned.secondary, op)?;
    write_canvas(ctx_out, &result)?;

    let ms = performance.map(|p| p.now() - started).unwrap_or(0.);
    console_log!(
        "applied \"{}\" on {}x{} in {:.1} ms (resized: {})",
        op.name(),
        result.width(),
        result.height(),
        ms,
        resized
    );

    let stats = js_sys::Object::new();
    set_field(&stats, "op", &JsValue::from_str(op.name()))?;
    set_field(&stats, "ms", &JsValue::from_f64(ms))?;
    set_field(&stats, "resized", &JsValue::from_bool(resized))?;
    set_field(&stats, "aW", &JsValue::from_f64(a_w as f64))?;
    set_field(&stats, "aH", &JsValue::from_f64(a_h as f64))?;
    set_field(&stats, "bW", &JsValue::from_f64(b_w as f64))?;
    set_field(&stats, "bH", &JsValue::from_f64(b_h as f64))?;
    set_field(&stats, "outW", &JsValue::from_f64(result.width() as f64))?;
    set_field(&stats, "outH", &JsValue::from_f64(result.height() as f64))?;
    Ok(stats.into())
}

fn backing_canvas(ctx: &CanvasRenderingContext2d) -> Result<HtmlCanvasElement, JsValue> {
    ctx.canvas()
        .ok_or_else(|| JsValue::from_str("context has no backing canvas"))
}

/// Snapshots a canvas into a caller-owned raster. `ImageData` is always
/// tightly packed Rgba.
fn read_canvas(ctx: &CanvasRenderingContext2d) -> Result<RasterImage, JsValue> {
    let canvas = backing_canvas(ctx)?;
    let (w, h) = (canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return Err(OpError::ZeroDimension.into());
    }
    let image_data = ctx.get_image_data(0., 0., w as f64, h as f64)?;
    let raster = RasterImage::from_vec(
        w as usize,
        h as usize,
        ChannelLayout::Rgba,
        image_data.data().0,
    )?;
    Ok(raster)
}

/// Sizes the output canvas to the result and renders it. The operator never
/// manufactures alpha, so the opaque plane is re-attached here.
fn write_canvas(ctx: &CanvasRenderingContext2d, img: &RasterImage) -> Result<(), JsValue> {
    let canvas = backing_canvas(ctx)?;
    canvas.set_width(img.width() as u32);
    canvas.set_height(img.height() as u32);

    let mut rgba = opaque_rgba(img);
    let image_data = ImageData::new_with_u8_clamped_array_and_sh(
        wasm_bindgen::Clamped(&mut rgba),
        img.width() as u32,
        img.height() as u32,
    )?;
    ctx.put_image_data(&image_data, 0., 0.)?;
    Ok(())
}

fn opaque_rgba(img: &RasterImage) -> Vec<u8> {
    debug_assert_eq!(img.layout(), ChannelLayout::Rgb);
    let mut out = Vec::with_capacity(img.width() * img.height() * 4);
    for px in img.data().nest::<[u8; 3]>() {
        out.extend_from_slice(px);
        out.push(255);
    }
    out
}

fn set_field(obj: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(obj, &JsValue::from_str(key), value)?;
    Ok(())
}

#[test]
fn test_opaque_rgba() {
    let img = RasterImage::from_vec(2, 1, ChannelLayout::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(opaque_rgba(&img), vec![1, 2, 3, 255, 4, 5, 6, 255]);
}
