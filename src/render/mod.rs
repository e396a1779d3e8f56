mod frame;
mod null_renderer;
mod primitives;

pub use frame::{RenderFrame, Viewport};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, FontWeight, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use crate::error::CompareResult;

/// Encoded raster output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl RasterImage {
    pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[must_use]
    pub fn has_png_signature(&self) -> bool {
        self.png.starts_with(&Self::PNG_SIGNATURE)
    }
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from the comparison domain.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> CompareResult<()>;

    /// Encodes the most recently rendered frame as PNG.
    fn encode_png(&self) -> CompareResult<RasterImage>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
