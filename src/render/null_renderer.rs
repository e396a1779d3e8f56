use crate::error::{CompareError, CompareResult};
use crate::render::{RasterImage, RenderFrame, Renderer, Viewport};

/// Headless renderer used by tests and hosts without a text rasterizer.
///
/// It validates frame content and encodes a blank white canvas of the frame's
/// size, so callers get a well-formed PNG with the right dimensions.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
    last_viewport: Option<Viewport>,
}

impl NullRenderer {
    #[must_use]
    pub fn last_viewport(&self) -> Option<Viewport> {
        self.last_viewport
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> CompareResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        self.last_viewport = Some(frame.viewport);
        Ok(())
    }

    fn encode_png(&self) -> CompareResult<RasterImage> {
        let viewport = self
            .last_viewport
            .ok_or_else(|| CompareError::Render("no frame has been rendered".to_owned()))?;
        let png = encode_blank_png(viewport)?;
        Ok(RasterImage {
            width: viewport.width,
            height: viewport.height,
            png,
        })
    }
}

fn encode_blank_png(viewport: Viewport) -> CompareResult<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, viewport.width, viewport.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|err| map_encoding_error("failed to write png header", err))?;
        let pixels = vec![0xff_u8; viewport.width as usize * viewport.height as usize * 3];
        writer
            .write_image_data(&pixels)
            .map_err(|err| map_encoding_error("failed to write png data", err))?;
        writer
            .finish()
            .map_err(|err| map_encoding_error("failed to finish png stream", err))?;
    }
    Ok(bytes)
}

fn map_encoding_error(prefix: &str, err: png::EncodingError) -> CompareError {
    CompareError::Render(format!("{prefix}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::NullRenderer;
    use crate::error::CompareError;
    use crate::render::{Color, RectPrimitive, RenderFrame, Renderer, Viewport};

    #[test]
    fn encode_before_render_is_a_render_failure() {
        let renderer = NullRenderer::default();
        let err = renderer.encode_png().expect_err("nothing rendered yet");
        assert!(matches!(err, CompareError::Render(_)));
    }

    #[test]
    fn encodes_png_with_frame_dimensions() {
        let mut renderer = NullRenderer::default();
        let frame = RenderFrame::new(Viewport::new(12, 7)).with_rect(RectPrimitive::filled(
            0.0,
            0.0,
            12.0,
            7.0,
            Color::rgb(0.5, 0.5, 0.5),
        ));
        renderer.render(&frame).expect("render");
        let image = renderer.encode_png().expect("png");

        assert_eq!((image.width, image.height), (12, 7));
        assert!(image.has_png_signature());
        assert_eq!(renderer.last_rect_count, 1);
    }
}
