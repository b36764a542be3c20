//! a terminal preview of the merged colors
use {
    crate::{
        color::ColorValue,
        export::category::category_label,
        models::{MergedDataset, MergedRecord, ThemeName},
    },
    owo_colors::{OwoColorize, Stream},
};

/// the width of a swatch, in cells
const SWATCH: &str = "    ";

/// render one swatch, or a placeholder when the theme is unset
fn swatch(color: Option<ColorValue>, ansi: bool) -> String {
    match (color, ansi) {
        (Some(c), true) => SWATCH.on_truecolor(c.r, c.g, c.b).to_string(),
        (Some(c), false) => c.to_hex_argb(),
        (None, true) => " -- ".bright_black().to_string(),
        (None, false) => "-".repeat(9),
    }
}

/// render one record as a line
fn record_line(themes: &[ThemeName], record: &MergedRecord, ansi: bool) -> String {
    let mut line = String::from("  ");

    for theme in themes {
        line.push_str(&swatch(record.colors.get(theme.as_str()), ansi));
        line.push(' ');
    }

    line.push_str(&record.identity);

    let category = category_label(record.category.as_deref());
    if !category.is_empty() {
        let category = format!("({})", category);

        line.push(' ');
        line.push_str(&if ansi {
            category.bright_black().to_string()
        } else {
            category
        });
    }

    line
}

/// render a dataset, one section per source
///
/// without `ansi` swatches are replaced by their hex text
pub fn render_preview(dataset: &MergedDataset, ansi: bool) -> String {
    let header: Vec<String> = dataset.themes.iter().map(|t| t.title()).collect();
    let mut lines = Vec::new();

    for source in &dataset.sources {
        let title = format!("{} ({})", source.source.sheet_name(), source.records.len());

        lines.push(if ansi { title.bold().to_string() } else { title });
        lines.push(format!("  {}", header.join(" ")));
        lines.extend(
            source
                .records
                .iter()
                .map(|record| record_line(&dataset.themes, record, ansi)),
        );
    }

    lines.iter().map(|line| format!("{}\n", line)).collect()
}

/// print a dataset to stdout, with true-color swatches when stdout supports color
pub fn print_preview(dataset: &MergedDataset) {
    let plain = render_preview(dataset, false);
    let colored = render_preview(dataset, true);

    print!("{}", plain.if_supports_color(Stream::Stdout, |_| &colored));
}
