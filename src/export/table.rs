//! the tabular layout shared by the workbook and csv exporters
//!
//! a sheet has a key column, then a swatch, a hex and an RGB column per theme, then category
//! and key type
use crate::{
    color::ColorValue,
    export::category::category_label,
    models::{MergedRecord, SourceCategory, ThemeName},
};

/// one row of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// the record identity
    pub key: String,
    /// the color under each theme, in sheet theme order
    pub colors: Vec<Option<ColorValue>>,
    /// the category name
    pub category: String,
    /// the key type
    pub key_type: String,
}

impl SheetRow {
    /// the `#AARRGGBB` text of a theme column, empty when unset
    pub fn hex(&self, theme: usize) -> String {
        self.colors
            .get(theme)
            .copied()
            .flatten()
            .map(|c| c.to_hex_argb())
            .unwrap_or_default()
    }

    /// the `r,g,b` text of a theme column, empty when unset
    pub fn rgb(&self, theme: usize) -> String {
        self.colors
            .get(theme)
            .copied()
            .flatten()
            .map(|c| c.to_decimal_rgb())
            .unwrap_or_default()
    }

    /// every text cell of the row, swatches left out
    pub fn text_cells(&self) -> Vec<String> {
        let n = self.colors.len();
        let mut cells = Vec::with_capacity(3 + 2 * n);

        cells.push(self.key.clone());
        cells.extend((0..n).map(|i| self.hex(i)));
        cells.extend((0..n).map(|i| self.rgb(i)));
        cells.push(self.category.clone());
        cells.push(self.key_type.clone());

        cells
    }
}

/// the sheet of one source
#[derive(Debug, Clone)]
pub struct SheetTable {
    /// the source
    pub source: SourceCategory,
    /// the themes, one column group each
    pub themes: Vec<ThemeName>,
    /// the rows, in record order
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    /// lay out the records of a source
    #[bearive::argdoc]
    pub fn build(
        /// the source the records belong to
        source: SourceCategory,
        /// the captured themes, in order
        themes: &[ThemeName],
        /// the merged records
        records: &[MergedRecord],
    ) -> Self {
        let rows = records
            .iter()
            .map(|record| SheetRow {
                key: record.identity.clone(),
                colors: themes
                    .iter()
                    .map(|theme| record.colors.get(theme.as_str()))
                    .collect(),
                category: category_label(record.category.as_deref()).to_string(),
                key_type: record.key_type.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            source,
            themes: themes.to_vec(),
            rows,
        }
    }

    /// the sheet name
    pub fn name(&self) -> &'static str {
        self.source.sheet_name()
    }

    /// the number of columns
    pub fn column_count(&self) -> usize {
        3 + 3 * self.themes.len()
    }

    /// the column of a theme's swatch
    pub fn swatch_column(&self, theme: usize) -> usize {
        1 + theme
    }

    /// the column of a theme's hex text
    pub fn hex_column(&self, theme: usize) -> usize {
        1 + self.themes.len() + theme
    }

    /// the column of a theme's RGB text
    pub fn rgb_column(&self, theme: usize) -> usize {
        1 + 2 * self.themes.len() + theme
    }

    /// the category column
    pub fn category_column(&self) -> usize {
        1 + 3 * self.themes.len()
    }

    /// the key type column
    pub fn key_type_column(&self) -> usize {
        2 + 3 * self.themes.len()
    }

    /// the full header row
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.column_count());

        header.push("Key".to_string());
        header.extend(self.themes.iter().map(ThemeName::title));
        header.extend(self.hex_headers());
        header.extend(self.rgb_headers());
        header.push("Category".to_string());
        header.push("Key Type".to_string());

        header
    }

    /// the header row without swatch columns
    pub fn text_header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.column_count() - self.themes.len());

        header.push("Key".to_string());
        header.extend(self.hex_headers());
        header.extend(self.rgb_headers());
        header.push("Category".to_string());
        header.push("Key Type".to_string());

        header
    }

    /// `<Theme> Hex ARGB` per theme
    fn hex_headers(&self) -> impl Iterator<Item = String> + '_ {
        self.themes.iter().map(|t| format!("{} Hex ARGB", t.title()))
    }

    /// `<Theme> RGB` per theme
    fn rgb_headers(&self) -> impl Iterator<Item = String> + '_ {
        self.themes.iter().map(|t| format!("{} RGB", t.title()))
    }
}
