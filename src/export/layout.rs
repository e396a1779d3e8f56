use smallvec::SmallVec;

use super::ExportConfig;

pub type WrappedLines = SmallVec<[String; 2]>;

const ELLIPSIS: char = '…';

/// Horizontal geometry of the export table.
///
/// Every card column gets the same width:
/// `(canvas_width - label_width - padding) / card_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub canvas_width: f64,
    pub label_width: f64,
    pub padding: f64,
    pub card_count: usize,
    /// Zero when there are no card columns.
    pub column_width: f64,
}

impl ColumnLayout {
    #[must_use]
    pub fn compute(config: &ExportConfig, card_count: usize) -> Self {
        let available =
            config.canvas_width_px - config.label_column_width_px - config.horizontal_padding_px;
        let column_width = if card_count == 0 {
            0.0
        } else {
            available / card_count as f64
        };
        Self {
            canvas_width: config.canvas_width_px,
            label_width: config.label_column_width_px,
            padding: config.horizontal_padding_px,
            card_count,
            column_width,
        }
    }

    #[must_use]
    pub fn table_left(&self) -> f64 {
        self.padding / 2.0
    }

    #[must_use]
    pub fn table_width(&self) -> f64 {
        self.label_width + self.column_width * self.card_count as f64
    }

    #[must_use]
    pub fn table_right(&self) -> f64 {
        self.table_left() + self.table_width()
    }

    #[must_use]
    pub fn column_left(&self, index: usize) -> f64 {
        self.table_left() + self.label_width + self.column_width * index as f64
    }
}

/// Glyph-width based text measurement; keeps layout deterministic and
/// independent of the raster backend's font stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub glyph_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMetrics {
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            glyph_width_factor: config.glyph_width_factor,
            line_height_factor: config.line_height_factor,
        }
    }

    #[must_use]
    pub fn text_width(&self, text: &str, font_size_px: f64) -> f64 {
        text.chars().count() as f64 * font_size_px * self.glyph_width_factor
    }

    #[must_use]
    pub fn line_height(&self, font_size_px: f64) -> f64 {
        font_size_px * self.line_height_factor
    }

    fn chars_per_line(&self, max_width: f64, font_size_px: f64) -> usize {
        let per_char = font_size_px * self.glyph_width_factor;
        ((max_width / per_char).floor() as usize).max(1)
    }

    /// Greedy word wrap into at most `max_lines` lines.
    ///
    /// Words longer than a line are split. Overflowing text is cut and the
    /// last kept line ends with an ellipsis.
    #[must_use]
    pub fn wrap(
        &self,
        text: &str,
        max_width: f64,
        font_size_px: f64,
        max_lines: usize,
    ) -> WrappedLines {
        let limit = self.chars_per_line(max_width, font_size_px);
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len <= limit {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > limit {
                let rest = chars.split_off(limit);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            current = chars.into_iter().collect();
            current_len = current.chars().count();
        }
        if current_len > 0 {
            lines.push(current);
        }

        let max_lines = max_lines.max(1);
        if lines.len() > max_lines {
            lines.truncate(max_lines);
            if let Some(last) = lines.last_mut() {
                let mut kept: Vec<char> = last.chars().collect();
                kept.truncate(limit.saturating_sub(1));
                while kept.last().is_some_and(|c| c.is_whitespace()) {
                    kept.pop();
                }
                kept.push(ELLIPSIS);
                *last = kept.into_iter().collect();
            }
        }

        lines.into_iter().collect()
    }
}
