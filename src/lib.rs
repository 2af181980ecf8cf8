//! Pixel-wise image combination core for a browser demo.
//!
//! Two images arrive as decoded rasters, get aligned in size and channel
//! layout by [`normalize::align`], and are combined per pixel by
//! [`ops::apply`]. The [`bridge`] module wires the pipeline to canvases
//! through wasm-bindgen; everything else is plain Rust and runs under
//! `cargo test` on the host.

mod bridge;
mod error;
mod normalize;
mod ops;
mod raster;
mod wasm_util;

pub use error::OpError;
pub use normalize::{align, AlignmentResult};
pub use ops::{apply, PixelOp};
pub use raster::{ChannelLayout, RasterImage};

pub(crate) use wasm_util::{console_log, window};
