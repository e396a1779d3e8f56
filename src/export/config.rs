use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};
use crate::render::Color;

/// Colors of every styled region in the exported image.
///
/// - header row: navy background, white bold text
/// - label column: light slate background, dark slate bold text
/// - section dividers and the free-text row: indigo tint, indigo bold text
/// - data rows: white / light grey banding, counted over data rows only
/// - highlighted cells: green tint, dark green bold text, over any banding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPalette {
    pub canvas_background: Color,
    pub branding_background: Color,
    pub branding_title: Color,
    pub branding_text: Color,
    pub header_background: Color,
    pub header_text: Color,
    pub label_background: Color,
    pub label_text: Color,
    pub divider_background: Color,
    pub divider_text: Color,
    pub band_even: Color,
    pub band_odd: Color,
    pub cell_text: Color,
    pub highlight_background: Color,
    pub highlight_text: Color,
    pub grid_line: Color,
    pub footer_text: Color,
}

impl Default for ExportPalette {
    fn default() -> Self {
        Self {
            canvas_background: Color::rgb8(0xff, 0xff, 0xff),
            branding_background: Color::rgb8(0x0f, 0x17, 0x2a),
            branding_title: Color::rgb8(0xff, 0xff, 0xff),
            branding_text: Color::rgb8(0xcb, 0xd5, 0xe1),
            header_background: Color::rgb8(0x1e, 0x29, 0x3b),
            header_text: Color::rgb8(0xff, 0xff, 0xff),
            label_background: Color::rgb8(0xf1, 0xf5, 0xf9),
            label_text: Color::rgb8(0x33, 0x41, 0x55),
            divider_background: Color::rgb8(0xe0, 0xe7, 0xff),
            divider_text: Color::rgb8(0x37, 0x30, 0xa3),
            band_even: Color::rgb8(0xff, 0xff, 0xff),
            band_odd: Color::rgb8(0xf8, 0xfa, 0xfc),
            cell_text: Color::rgb8(0x1f, 0x29, 0x37),
            highlight_background: Color::rgb8(0xdc, 0xfc, 0xe7),
            highlight_text: Color::rgb8(0x16, 0x65, 0x34),
            grid_line: Color::rgb8(0xe2, 0xe8, 0xf0),
            footer_text: Color::rgb8(0x64, 0x74, 0x8b),
        }
    }
}

impl ExportPalette {
    pub fn validate(&self) -> CompareResult<()> {
        for color in [
            self.canvas_background,
            self.branding_background,
            self.branding_title,
            self.branding_text,
            self.header_background,
            self.header_text,
            self.label_background,
            self.label_text,
            self.divider_background,
            self.divider_text,
            self.band_even,
            self.band_odd,
            self.cell_text,
            self.highlight_background,
            self.highlight_text,
            self.grid_line,
            self.footer_text,
        ] {
            color
                .validate()
                .map_err(|err| CompareError::InvalidConfig(format!("palette: {err}")))?;
        }
        Ok(())
    }
}

/// Fixed-width export layout and branding configuration.
///
/// Serializable so hosts can ship overrides as JSON; absent fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub canvas_width_px: f64,
    pub label_column_width_px: f64,
    /// Total horizontal padding, split evenly between both canvas edges.
    pub horizontal_padding_px: f64,
    pub cell_padding_px: f64,
    pub section_gap_px: f64,
    pub branding_height_px: f64,
    pub footer_height_px: f64,
    pub title_font_size_px: f64,
    pub caption_font_size_px: f64,
    pub meta_font_size_px: f64,
    pub header_font_size_px: f64,
    pub body_font_size_px: f64,
    pub footer_font_size_px: f64,
    pub line_height_factor: f64,
    /// Average glyph advance as a fraction of the font size.
    pub glyph_width_factor: f64,
    pub card_name_max_lines: usize,
    pub cell_max_lines: usize,
    pub grid_line_width_px: f64,
    pub label_column_title: String,
    pub category_section_label: String,
    pub merchant_section_label: String,
    pub product_name: String,
    pub product_url: String,
    pub copyright_holder: String,
    pub captions: Vec<String>,
    pub name_denylist: Vec<String>,
    pub palette: ExportPalette,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_width_px: 1200.0,
            label_column_width_px: 220.0,
            horizontal_padding_px: 40.0,
            cell_padding_px: 10.0,
            section_gap_px: 16.0,
            branding_height_px: 112.0,
            footer_height_px: 64.0,
            title_font_size_px: 28.0,
            caption_font_size_px: 15.0,
            meta_font_size_px: 13.0,
            header_font_size_px: 15.0,
            body_font_size_px: 14.0,
            footer_font_size_px: 12.0,
            line_height_factor: 1.35,
            glyph_width_factor: 0.55,
            card_name_max_lines: 3,
            cell_max_lines: 6,
            grid_line_width_px: 1.0,
            label_column_title: "Features".to_owned(),
            category_section_label: "Category Rewards".to_owned(),
            merchant_section_label: "Merchant Rewards".to_owned(),
            product_name: "CardCompare".to_owned(),
            product_url: "https://cardcompare.app".to_owned(),
            copyright_holder: "CardCompare".to_owned(),
            captions: default_captions(),
            name_denylist: default_name_denylist(),
            palette: ExportPalette::default(),
        }
    }
}

fn default_captions() -> Vec<String> {
    [
        "Swipe smarter, not harder.",
        "Every percent counts.",
        "Your wallet's cheat sheet.",
        "Rewards, side by side.",
        "Pick the card that pays you back.",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_name_denylist() -> Vec<String> {
    [
        "credit",
        "card",
        "premium",
        "signature",
        "visa",
        "mastercard",
        "rupay",
        "edition",
        "variant",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

impl ExportConfig {
    /// Parses a JSON override document on top of the defaults.
    pub fn from_json_str(input: &str) -> CompareResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            CompareError::InvalidConfig(format!("failed to parse export config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> CompareResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CompareError::InvalidConfig(format!("failed to serialize export config: {e}"))
        })
    }

    pub fn validate(&self) -> CompareResult<()> {
        for (value, name) in [
            (self.canvas_width_px, "canvas_width_px"),
            (self.label_column_width_px, "label_column_width_px"),
            (self.title_font_size_px, "title_font_size_px"),
            (self.caption_font_size_px, "caption_font_size_px"),
            (self.meta_font_size_px, "meta_font_size_px"),
            (self.header_font_size_px, "header_font_size_px"),
            (self.body_font_size_px, "body_font_size_px"),
            (self.footer_font_size_px, "footer_font_size_px"),
            (self.line_height_factor, "line_height_factor"),
            (self.glyph_width_factor, "glyph_width_factor"),
            (self.grid_line_width_px, "grid_line_width_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CompareError::InvalidConfig(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.horizontal_padding_px, "horizontal_padding_px"),
            (self.cell_padding_px, "cell_padding_px"),
            (self.section_gap_px, "section_gap_px"),
            (self.branding_height_px, "branding_height_px"),
            (self.footer_height_px, "footer_height_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CompareError::InvalidConfig(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        if self.label_column_width_px + self.horizontal_padding_px >= self.canvas_width_px {
            return Err(CompareError::InvalidConfig(
                "label column and padding must leave room for card columns".to_owned(),
            ));
        }
        if self.card_name_max_lines == 0 || self.cell_max_lines == 0 {
            return Err(CompareError::InvalidConfig("line limits must be >= 1".to_owned()));
        }
        for (value, name) in [
            (&self.product_name, "product_name"),
            (&self.label_column_title, "label_column_title"),
            (&self.category_section_label, "category_section_label"),
            (&self.merchant_section_label, "merchant_section_label"),
        ] {
            if value.trim().is_empty() {
                return Err(CompareError::InvalidConfig(format!("`{name}` must not be blank")));
            }
        }
        self.palette.validate()
    }
}
