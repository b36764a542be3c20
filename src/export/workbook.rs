//! the xlsx workbook, one sheet per source with colored swatch cells
use {
    crate::{
        color::ColorValue,
        error::Result,
        export::table::SheetTable,
    },
    rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet},
};

/// the foreground of the hatch pattern of an unset swatch
const UNSET_HATCH: u32 = 0xC0C0C0;

/// render every table into an in-memory xlsx file
///
/// # Errors
///
/// returns an error if a sheet can't be written or the workbook can't be serialized
pub fn render_workbook(tables: &[SheetTable]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for table in tables {
        let sheet = workbook.add_worksheet();
        write_sheet(sheet, table)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// the fill of a swatch cell
fn swatch(color: Option<ColorValue>) -> Format {
    match color {
        Some(color) => Format::new()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(color.rgb())),
        None => Format::new()
            .set_pattern(FormatPattern::LightUp)
            .set_foreground_color(Color::RGB(UNSET_HATCH)),
    }
}

/// write one table into a worksheet
fn write_sheet(sheet: &mut Worksheet, table: &SheetTable) -> Result<()> {
    let header_format = Format::new().set_bold();
    let header = table.header();

    sheet.set_name(table.name())?;

    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;

        sheet.write_string(r, 0, &row.key)?;

        for (t, color) in row.colors.iter().enumerate() {
            sheet.write_blank(r, table.swatch_column(t) as u16, &swatch(*color))?;
            sheet.write_string(r, table.hex_column(t) as u16, row.hex(t))?;
            sheet.write_string(r, table.rgb_column(t) as u16, row.rgb(t))?;
        }

        sheet.write_string(r, table.category_column() as u16, &row.category)?;
        sheet.write_string(r, table.key_type_column() as u16, &row.key_type)?;
    }

    sheet.autofilter(0, 0, table.rows.len() as u32, (header.len() - 1) as u16)?;
    sheet.set_freeze_panes(1, 1)?;
    sheet.autofit();

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::models::{MergedRecord, ResourceDescriptor, SourceCategory, ThemeColors, ThemeName},
    };

    #[test]
    fn test_swatch_fills() {
        let set = swatch(Some(ColorValue::new(128, 0x10, 0x20, 0x30)));
        let unset = swatch(None);

        assert_eq!(
            set,
            Format::new()
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(0x102030))
        );
        assert_eq!(
            unset,
            Format::new()
                .set_pattern(FormatPattern::LightUp)
                .set_foreground_color(Color::RGB(UNSET_HATCH))
        );
        assert_ne!(set, unset);
        assert_ne!(set, swatch(Some(ColorValue::new(255, 0x10, 0x20, 0x31))));
    }

    #[test]
    fn test_renders_a_zip_container() {
        let themes: Vec<ThemeName> = vec!["light".into(), "dark".into()];
        let mut colors = ThemeColors::default();
        colors.insert("dark".into(), ColorValue::new(255, 0, 122, 204));

        let record = MergedRecord::from_descriptor(
            &ResourceDescriptor::named(SourceCategory::Brush, "AccentBrush"),
            colors,
        );

        let tables = [
            SheetTable::build(SourceCategory::Brush, &themes, &[record]),
            SheetTable::build(SourceCategory::Classification, &themes, &[]),
        ];

        let bytes = render_workbook(&tables).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
