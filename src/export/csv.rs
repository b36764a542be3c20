//! plain csv sheets, one per source
use {
    crate::{
        error::{Result, TcError},
        export::table::SheetTable,
    },
    csv::WriterBuilder,
};

/// render a table as csv, swatch columns left out
///
/// # Errors
///
/// returns an error if a row can't be written
pub fn render_csv(table: &SheetTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(table.text_header())?;

    for row in &table.rows {
        writer.write_record(row.text_cells())?;
    }

    writer
        .into_inner()
        .map_err(|e| TcError::IO(e.into_error()))
}
