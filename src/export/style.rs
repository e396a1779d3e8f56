use serde::Serialize;

use crate::render::{Color, FontWeight};

use super::ExportPalette;

/// Styling class of one exported table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowStyle {
    Header,
    CategoryDivider,
    MerchantDivider,
    FreeText,
    /// `band` counts data rows only, starting at zero.
    Data { band: usize },
}

impl RowStyle {
    #[must_use]
    pub fn is_divider(self) -> bool {
        matches!(
            self,
            Self::CategoryDivider | Self::MerchantDivider | Self::FreeText
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Label,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub background: Color,
    pub foreground: Color,
    pub weight: FontWeight,
}

/// Resolves the colors for one table cell.
///
/// Row class wins over column role, so header and divider rows keep their
/// own style across the label column. Highlight applies last and only to
/// card cells.
#[must_use]
pub fn resolve_cell_style(
    palette: &ExportPalette,
    row: RowStyle,
    column: ColumnRole,
    highlighted: bool,
) -> CellStyle {
    let base = match (row, column) {
        (RowStyle::Header, _) => CellStyle {
            background: palette.header_background,
            foreground: palette.header_text,
            weight: FontWeight::Bold,
        },
        (
            RowStyle::CategoryDivider | RowStyle::MerchantDivider | RowStyle::FreeText,
            ColumnRole::Label,
        )
        | (RowStyle::CategoryDivider | RowStyle::MerchantDivider, ColumnRole::Card) => CellStyle {
            background: palette.divider_background,
            foreground: palette.divider_text,
            weight: FontWeight::Bold,
        },
        (RowStyle::FreeText, ColumnRole::Card) => CellStyle {
            background: palette.divider_background,
            foreground: palette.divider_text,
            weight: FontWeight::Regular,
        },
        (RowStyle::Data { .. }, ColumnRole::Label) => CellStyle {
            background: palette.label_background,
            foreground: palette.label_text,
            weight: FontWeight::Bold,
        },
        (RowStyle::Data { band }, ColumnRole::Card) => CellStyle {
            background: if band % 2 == 0 {
                palette.band_even
            } else {
                palette.band_odd
            },
            foreground: palette.cell_text,
            weight: FontWeight::Regular,
        },
    };

    if highlighted && column == ColumnRole::Card {
        CellStyle {
            background: palette.highlight_background,
            foreground: palette.highlight_text,
            weight: FontWeight::Bold,
        }
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnRole, RowStyle, resolve_cell_style};
    use crate::export::ExportPalette;
    use crate::render::FontWeight;

    #[test]
    fn highlight_overrides_banding_on_card_cells_only() {
        let palette = ExportPalette::default();
        let cell = resolve_cell_style(&palette, RowStyle::Data { band: 1 }, ColumnRole::Card, true);
        assert_eq!(cell.background, palette.highlight_background);
        assert_eq!(cell.foreground, palette.highlight_text);

        let label =
            resolve_cell_style(&palette, RowStyle::Data { band: 1 }, ColumnRole::Label, true);
        assert_eq!(label.background, palette.label_background);
    }

    #[test]
    fn bands_alternate_by_data_row_index() {
        let palette = ExportPalette::default();
        let even =
            resolve_cell_style(&palette, RowStyle::Data { band: 0 }, ColumnRole::Card, false);
        let odd =
            resolve_cell_style(&palette, RowStyle::Data { band: 1 }, ColumnRole::Card, false);
        assert_eq!(even.background, palette.band_even);
        assert_eq!(odd.background, palette.band_odd);
        assert_eq!(odd.weight, FontWeight::Regular);
    }

    #[test]
    fn dividers_and_header_keep_their_own_style() {
        let palette = ExportPalette::default();
        let header = resolve_cell_style(&palette, RowStyle::Header, ColumnRole::Label, false);
        assert_eq!(header.background, palette.header_background);

        let free_text = resolve_cell_style(&palette, RowStyle::FreeText, ColumnRole::Card, false);
        assert_eq!(free_text.background, palette.divider_background);
        assert!(RowStyle::FreeText.is_divider());
        assert!(!RowStyle::Data { band: 0 }.is_divider());
    }
}
