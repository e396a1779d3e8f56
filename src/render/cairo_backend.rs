use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::trace;

use crate::error::{CompareError, CompareResult};
use crate::render::{
    Color, FontWeight, LinePrimitive, RasterImage, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

/// Primitive counts from the most recent `render` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub lines_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango raster backend producing real PNG exports.
///
/// Export canvases grow with the row count, so each `render` allocates a
/// fresh ARGB32 surface sized to the frame.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: Option<ImageSurface>,
    clear_color: Color,
    font_family: String,
    stats: CairoRenderStats,
}

impl Default for CairoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CairoRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: None,
            clear_color: Color::rgb8(0xff, 0xff, 0xff),
            font_family: "Sans".to_owned(),
            stats: CairoRenderStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango"
    }

    /// Surface of the last rendered frame.
    #[must_use]
    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    pub fn set_clear_color(&mut self, color: Color) -> CompareResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.stats
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> CompareResult<()> {
        frame.validate()?;
        let width = surface_dimension(frame.viewport.width, "width")?;
        let height = surface_dimension(frame.viewport.height, "height")?;

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| backend_failure("allocate export surface", err))?;
        let stats = {
            let context = Context::new(&surface)
                .map_err(|err| backend_failure("open drawing context", err))?;
            let painter = Painter {
                context: &context,
                font_family: &self.font_family,
            };
            painter.paint_frame(frame, self.clear_color)?
        };
        surface.flush();

        trace!(
            rects = stats.rects_drawn,
            lines = stats.lines_drawn,
            texts = stats.texts_drawn,
            "cairo frame painted"
        );
        self.stats = stats;
        self.surface = Some(surface);
        Ok(())
    }

    fn encode_png(&self) -> CompareResult<RasterImage> {
        let surface = self
            .surface
            .as_ref()
            .ok_or_else(|| CompareError::Render("no frame has been rendered".to_owned()))?;
        let mut png = Vec::new();
        surface
            .write_to_png(&mut png)
            .map_err(|err| CompareError::Render(format!("png encoding failed: {err}")))?;
        Ok(RasterImage {
            width: surface.width().unsigned_abs(),
            height: surface.height().unsigned_abs(),
            png,
        })
    }
}

struct Painter<'a> {
    context: &'a Context,
    font_family: &'a str,
}

impl Painter<'_> {
    fn paint_frame(
        &self,
        frame: &RenderFrame,
        clear_color: Color,
    ) -> CompareResult<CairoRenderStats> {
        self.set_color(clear_color);
        self.context
            .paint()
            .map_err(|err| backend_failure("clear canvas", err))?;

        for rect in &frame.rects {
            self.fill_rect(rect)?;
        }
        for line in &frame.lines {
            self.stroke_line(line)?;
        }
        for text in &frame.texts {
            self.show_text(text);
        }

        Ok(CairoRenderStats {
            rects_drawn: frame.rects.len(),
            lines_drawn: frame.lines.len(),
            texts_drawn: frame.texts.len(),
        })
    }

    fn fill_rect(&self, rect: &RectPrimitive) -> CompareResult<()> {
        let context = self.context;
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.set_color(rect.fill_color);
        if rect.border_width <= 0.0 {
            return context
                .fill()
                .map_err(|err| backend_failure("fill cell background", err));
        }

        context
            .fill_preserve()
            .map_err(|err| backend_failure("fill cell background", err))?;
        self.set_color(rect.border_color);
        context.set_line_width(rect.border_width);
        context
            .stroke()
            .map_err(|err| backend_failure("stroke cell border", err))
    }

    fn stroke_line(&self, line: &LinePrimitive) -> CompareResult<()> {
        let context = self.context;
        self.set_color(line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| backend_failure("stroke grid line", err))
    }

    fn show_text(&self, text: &TextPrimitive) {
        let layout = pangocairo::functions::create_layout(self.context);
        let style = match text.weight {
            FontWeight::Regular => "",
            FontWeight::Bold => " Bold",
        };
        let font = FontDescription::from_string(&format!(
            "{}{style} {}px",
            self.font_family, text.font_size_px
        ));
        layout.set_font_description(Some(&font));
        layout.set_text(&text.text);

        let measured = f64::from(layout.pixel_size().0);
        let left = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - measured / 2.0,
            TextHAlign::Right => text.x - measured,
        };
        self.set_color(text.color);
        self.context.move_to(left, text.y);
        pangocairo::functions::show_layout(self.context, &layout);
    }

    fn set_color(&self, color: Color) {
        self.context
            .set_source_rgba(color.red, color.green, color.blue, color.alpha);
    }
}

fn surface_dimension(value: u32, axis: &str) -> CompareResult<i32> {
    i32::try_from(value)
        .map_err(|_| CompareError::Render(format!("canvas {axis} {value} exceeds cairo limits")))
}

fn backend_failure(step: &str, err: cairo::Error) -> CompareError {
    CompareError::Render(format!("cairo failed to {step}: {err}"))
}
