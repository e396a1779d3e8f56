use serde::Serialize;
use tracing::debug;

use crate::core::{ComparisonMatrix, RowKind};
use crate::error::CompareResult;
use crate::render::{
    Color, FontWeight, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    Viewport,
};

use super::layout::{ColumnLayout, TextMetrics, WrappedLines};
use super::style::{CellStyle, ColumnRole, RowStyle, resolve_cell_style};
use super::{Branding, ExportConfig, NameShortener};

/// Vertical placement of one table row in the export canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRow {
    pub label: String,
    pub style: RowStyle,
    pub top: f64,
    pub height: f64,
}

/// Fully laid out export: the frame to rasterize plus the geometry that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportScene {
    pub frame: RenderFrame,
    pub columns: ColumnLayout,
    pub rows: Vec<SceneRow>,
    pub table_top: f64,
    pub table_bottom: f64,
}

impl ExportScene {
    pub fn rows_with_style(&self, style: RowStyle) -> impl Iterator<Item = &SceneRow> {
        self.rows.iter().filter(move |row| row.style == style)
    }
}

/// Lays out `matrix` on a fixed-width canvas with branding header and footer.
///
/// Built from the matrix alone; the live on-screen table is never consulted.
pub fn build_export_scene(
    matrix: &ComparisonMatrix,
    config: &ExportConfig,
    branding: &Branding,
) -> CompareResult<ExportScene> {
    config.validate()?;
    let columns = ColumnLayout::compute(config, matrix.column_count());
    let mut builder = SceneBuilder::new(config, columns);

    builder.push_branding_header(branding);
    let table_top = builder.cursor_y;

    let shortener = NameShortener::new(&config.name_denylist);
    let header_cells: Vec<(String, bool)> = matrix
        .columns
        .iter()
        .map(|column| (shortener.shorten(&column.display_name).into_owned(), false))
        .collect();
    builder.push_row(
        &config.label_column_title,
        &header_cells,
        RowStyle::Header,
        config.header_font_size_px,
        config.card_name_max_lines,
    );

    let mut band = 0usize;
    let mut category_section_open = false;
    let mut merchant_section_open = false;
    for row in &matrix.rows {
        let style = match row.kind {
            RowKind::Category if !category_section_open => {
                category_section_open = true;
                builder.push_divider(&config.category_section_label, RowStyle::CategoryDivider);
                None
            }
            RowKind::Merchant if !merchant_section_open => {
                merchant_section_open = true;
                builder.push_divider(&config.merchant_section_label, RowStyle::MerchantDivider);
                None
            }
            RowKind::FreeText => Some(RowStyle::FreeText),
            _ => None,
        };
        let style = style.unwrap_or_else(|| {
            let style = RowStyle::Data { band };
            band += 1;
            style
        });

        let cells: Vec<(String, bool)> = row
            .cells
            .iter()
            .map(|cell| (cell.raw_display().to_owned(), cell.is_highlighted))
            .collect();
        builder.push_row(
            &row.label,
            &cells,
            style,
            config.body_font_size_px,
            config.cell_max_lines,
        );
    }

    let table_bottom = builder.cursor_y;
    builder.push_table_outline(table_top, table_bottom);
    builder.push_footer(branding);

    let scene = builder.finish(table_top, table_bottom);
    debug!(
        width = scene.frame.viewport.width,
        height = scene.frame.viewport.height,
        cards = columns.card_count,
        rows = scene.rows.len(),
        "built export scene"
    );
    Ok(scene)
}

struct SceneBuilder<'a> {
    config: &'a ExportConfig,
    metrics: TextMetrics,
    columns: ColumnLayout,
    cursor_y: f64,
    rects: Vec<RectPrimitive>,
    lines: Vec<LinePrimitive>,
    texts: Vec<TextPrimitive>,
    rows: Vec<SceneRow>,
}

impl<'a> SceneBuilder<'a> {
    fn new(config: &'a ExportConfig, columns: ColumnLayout) -> Self {
        Self {
            config,
            metrics: TextMetrics::from_config(config),
            columns,
            cursor_y: 0.0,
            rects: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn push_branding_header(&mut self, branding: &Branding) {
        let config = self.config;
        let palette = &config.palette;
        let left = self.columns.table_left();
        let right = self.columns.canvas_width - left;
        let top = config.cell_padding_px * 2.0;

        self.rects.push(RectPrimitive::filled(
            0.0,
            0.0,
            self.columns.canvas_width,
            config.branding_height_px,
            palette.branding_background,
        ));
        self.texts.push(
            TextPrimitive::new(
                branding.product_name.clone(),
                left,
                top,
                config.title_font_size_px,
                palette.branding_title,
                TextHAlign::Left,
            )
            .bold(),
        );
        if let Some(caption) = branding.caption.as_deref().filter(|c| !c.is_empty()) {
            self.texts.push(TextPrimitive::new(
                caption,
                left,
                top + self.metrics.line_height(config.title_font_size_px),
                config.caption_font_size_px,
                palette.branding_text,
                TextHAlign::Left,
            ));
        }

        let meta_line = self.metrics.line_height(config.meta_font_size_px);
        self.texts.push(TextPrimitive::new(
            branding.timestamp_label(),
            right,
            top,
            config.meta_font_size_px,
            palette.branding_text,
            TextHAlign::Right,
        ));
        if let Some(audience) = branding.audience_label() {
            self.texts.push(TextPrimitive::new(
                audience,
                right,
                top + meta_line,
                config.meta_font_size_px,
                palette.branding_text,
                TextHAlign::Right,
            ));
        }

        self.cursor_y = config.branding_height_px + config.section_gap_px;
    }

    fn push_row(
        &mut self,
        label: &str,
        cells: &[(String, bool)],
        style: RowStyle,
        font_size_px: f64,
        max_lines: usize,
    ) {
        let padding = self.config.cell_padding_px;
        let label_lines = self.metrics.wrap(
            label,
            self.columns.label_width - padding * 2.0,
            font_size_px,
            max_lines,
        );
        let cell_lines: Vec<WrappedLines> = cells
            .iter()
            .map(|(text, _)| {
                self.metrics.wrap(
                    text,
                    self.columns.column_width - padding * 2.0,
                    font_size_px,
                    max_lines,
                )
            })
            .collect();

        let line_count = cell_lines
            .iter()
            .map(|lines| lines.len())
            .chain(std::iter::once(label_lines.len()))
            .max()
            .unwrap_or(1)
            .max(1);
        let line_height = self.metrics.line_height(font_size_px);
        let height = line_count as f64 * line_height + padding * 2.0;
        let top = self.cursor_y;

        let label_style = resolve_cell_style(&self.config.palette, style, ColumnRole::Label, false);
        self.push_cell(
            self.columns.table_left(),
            self.columns.label_width,
            top,
            height,
            &label_lines,
            label_style,
            font_size_px,
            TextHAlign::Left,
        );

        for (index, ((_, highlighted), lines)) in cells.iter().zip(&cell_lines).enumerate() {
            let cell_style =
                resolve_cell_style(&self.config.palette, style, ColumnRole::Card, *highlighted);
            self.push_cell(
                self.columns.column_left(index),
                self.columns.column_width,
                top,
                height,
                lines,
                cell_style,
                font_size_px,
                TextHAlign::Center,
            );
        }

        for index in 0..cells.len() {
            let x = self.columns.column_left(index);
            self.push_grid_line(x, top, x, top + height);
        }
        self.push_grid_line(
            self.columns.table_left(),
            top + height,
            self.columns.table_right(),
            top + height,
        );

        self.rows.push(SceneRow {
            label: label.to_owned(),
            style,
            top,
            height,
        });
        self.cursor_y = top + height;
    }

    fn push_divider(&mut self, label: &str, style: RowStyle) {
        let config = self.config;
        let padding = config.cell_padding_px;
        let height = self.metrics.line_height(config.body_font_size_px) + padding * 2.0;
        let top = self.cursor_y;
        let cell_style = resolve_cell_style(&config.palette, style, ColumnRole::Label, false);

        self.rects.push(RectPrimitive::filled(
            self.columns.table_left(),
            top,
            self.columns.table_width(),
            height,
            cell_style.background,
        ));
        if !label.is_empty() {
            self.texts.push(text_with_weight(
                TextPrimitive::new(
                    label,
                    self.columns.table_left() + padding,
                    top + padding,
                    config.body_font_size_px,
                    cell_style.foreground,
                    TextHAlign::Left,
                ),
                cell_style.weight,
            ));
        }
        self.push_grid_line(
            self.columns.table_left(),
            top + height,
            self.columns.table_right(),
            top + height,
        );

        self.rows.push(SceneRow {
            label: label.to_owned(),
            style,
            top,
            height,
        });
        self.cursor_y = top + height;
    }

    #[allow(clippy::too_many_arguments)]
    fn push_cell(
        &mut self,
        left: f64,
        width: f64,
        top: f64,
        height: f64,
        lines: &WrappedLines,
        style: CellStyle,
        font_size_px: f64,
        align: TextHAlign,
    ) {
        self.rects.push(RectPrimitive::filled(
            left,
            top,
            width,
            height,
            style.background,
        ));

        let padding = self.config.cell_padding_px;
        let line_height = self.metrics.line_height(font_size_px);
        let x = match align {
            TextHAlign::Left => left + padding,
            TextHAlign::Center => left + width / 2.0,
            TextHAlign::Right => left + width - padding,
        };
        for (line_index, line) in lines.iter().enumerate() {
            self.texts.push(text_with_weight(
                TextPrimitive::new(
                    line.clone(),
                    x,
                    top + padding + line_index as f64 * line_height,
                    font_size_px,
                    style.foreground,
                    align,
                ),
                style.weight,
            ));
        }
    }

    fn push_table_outline(&mut self, top: f64, bottom: f64) {
        let left = self.columns.table_left();
        let right = self.columns.table_right();
        self.push_grid_line(left, top, right, top);
        self.push_grid_line(left, top, left, bottom);
        self.push_grid_line(right, top, right, bottom);
    }

    fn push_footer(&mut self, branding: &Branding) {
        let config = self.config;
        let center = self.columns.canvas_width / 2.0;
        let top = self.cursor_y + config.section_gap_px;

        self.texts.push(TextPrimitive::new(
            branding.copyright_line.clone(),
            center,
            top,
            config.footer_font_size_px,
            config.palette.footer_text,
            TextHAlign::Center,
        ));
        if !branding.product_url.is_empty() {
            self.texts.push(TextPrimitive::new(
                branding.product_url.clone(),
                center,
                top + self.metrics.line_height(config.footer_font_size_px),
                config.footer_font_size_px,
                config.palette.footer_text,
                TextHAlign::Center,
            ));
        }

        self.cursor_y = top + config.footer_height_px;
    }

    fn push_grid_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.lines.push(LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            self.config.grid_line_width_px,
            self.config.palette.grid_line,
        ));
    }

    fn finish(mut self, table_top: f64, table_bottom: f64) -> ExportScene {
        let height = self.cursor_y.ceil().max(1.0);
        self.rects.insert(
            0,
            RectPrimitive::filled(
                0.0,
                0.0,
                self.columns.canvas_width,
                height,
                self.config.palette.canvas_background,
            ),
        );

        let viewport = Viewport::covering(self.columns.canvas_width, height);
        ExportScene {
            frame: RenderFrame {
                viewport,
                lines: self.lines,
                rects: self.rects,
                texts: self.texts,
            },
            columns: self.columns,
            rows: self.rows,
            table_top,
            table_bottom,
        }
    }
}

fn text_with_weight(text: TextPrimitive, weight: FontWeight) -> TextPrimitive {
    match weight {
        FontWeight::Regular => text,
        FontWeight::Bold => text.bold(),
    }
}

/// Background color of the card cell rect drawn at `(x, y)`, if any.
///
/// Rects are scanned last-first, matching paint order.
#[must_use]
pub fn background_at(frame: &RenderFrame, x: f64, y: f64) -> Option<Color> {
    frame
        .rects
        .iter()
        .rev()
        .find(|rect| x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom())
        .map(|rect| rect.fill_color)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{background_at, build_export_scene};
    use crate::core::{ComparisonRecord, MatrixBuildOptions, build_comparison_matrix};
    use crate::export::{Branding, ExportConfig, RowStyle};

    fn branding(config: &ExportConfig) -> Branding {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        Branding::compose(config, "Asha", at, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn dividers_precede_sections_and_do_not_consume_bands() {
        let matrix = build_comparison_matrix(
            &[ComparisonRecord::new("a", "HDFC", "Regalia Credit Card")
                .with_category("dining", "5%")
                .with_category("travel", "2%")
                .with_merchant("amazon", "1%")],
            &MatrixBuildOptions::default(),
        );
        let config = ExportConfig::default();
        let scene = build_export_scene(&matrix, &config, &branding(&config)).expect("scene");

        let styles: Vec<RowStyle> = scene.rows.iter().map(|row| row.style).collect();
        assert_eq!(
            styles,
            vec![
                RowStyle::Header,
                RowStyle::Data { band: 0 },
                RowStyle::Data { band: 1 },
                RowStyle::Data { band: 2 },
                RowStyle::Data { band: 3 },
                RowStyle::CategoryDivider,
                RowStyle::Data { band: 4 },
                RowStyle::Data { band: 5 },
                RowStyle::MerchantDivider,
                RowStyle::Data { band: 6 },
                RowStyle::FreeText,
            ]
        );
        assert!(scene.frame.texts_matching("Regalia").next().is_some());
        scene.frame.validate().expect("valid frame");
    }

    #[test]
    fn highlighted_cell_uses_highlight_background() {
        let matrix = build_comparison_matrix(
            &[
                ComparisonRecord::new("a", "HDFC", "Alpha").with_category("dining", "5.0%"),
                ComparisonRecord::new("b", "SBI", "Beta").with_category("dining", "3.0%"),
            ],
            &MatrixBuildOptions::default(),
        );
        let config = ExportConfig::default();
        let scene = build_export_scene(&matrix, &config, &branding(&config)).expect("scene");

        let dining = scene
            .rows
            .iter()
            .find(|row| row.label == "Dining")
            .expect("dining row");
        let y = dining.top + dining.height / 2.0;
        let first = scene.columns.column_left(0) + 1.0;
        let second = scene.columns.column_left(1) + 1.0;

        assert_eq!(
            background_at(&scene.frame, first, y),
            Some(config.palette.highlight_background)
        );
        assert_ne!(
            background_at(&scene.frame, second, y),
            Some(config.palette.highlight_background)
        );
    }
}
