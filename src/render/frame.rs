use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Pixel size of one export canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whole-pixel canvas covering a layout measured in fractional pixels.
    ///
    /// Sizes round up so the last row is never clipped. Non-finite or
    /// non-positive sizes collapse to zero, which `is_valid` rejects.
    #[must_use]
    pub fn covering(width_px: f64, height_px: f64) -> Self {
        let to_px = |value: f64| {
            if value.is_finite() && value > 0.0 {
                value.ceil().min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        };
        Self::new(to_px(width_px), to_px(height_px))
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// Backend-agnostic draw list for one export image.
///
/// Paint order is fixed: rects, then lines, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    /// Checks the canvas size and every primitive before a backend sees them.
    pub fn validate(&self) -> CompareResult<()> {
        if !self.viewport.is_valid() {
            return Err(CompareError::InvalidData(format!(
                "export canvas must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len() + self.lines.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }

    /// Texts whose content equals `needle`, in draw order.
    pub fn texts_matching<'a>(
        &'a self,
        needle: &'a str,
    ) -> impl Iterator<Item = &'a TextPrimitive> {
        self.texts.iter().filter(move |text| text.text == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderFrame, Viewport};
    use crate::render::{Color, RectPrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn covering_rounds_fractional_sizes_up() {
        assert_eq!(Viewport::covering(1200.0, 640.2), Viewport::new(1200, 641));
        assert!(!Viewport::covering(f64::NAN, 10.0).is_valid());
        assert!(!Viewport::covering(-3.0, 10.0).is_valid());
    }

    #[test]
    fn validate_rejects_empty_canvas_and_bad_primitives() {
        assert!(RenderFrame::new(Viewport::new(0, 10)).validate().is_err());

        let black = Color::rgb(0.0, 0.0, 0.0);
        let frame = RenderFrame::new(Viewport::new(10, 10))
            .with_rect(RectPrimitive::filled(0.0, 0.0, 10.0, 10.0, black))
            .with_text(TextPrimitive::new("", 0.0, 0.0, 12.0, black, TextHAlign::Left));
        assert_eq!(frame.primitive_count(), 2);
        assert!(frame.validate().is_err());
    }
}
