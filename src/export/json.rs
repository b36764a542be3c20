//! the structured document holding every merged record
use {
    crate::{
        error::Result,
        models::{MergedDataset, MergedRecord, ThemeName},
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// the exported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// when the document was rendered
    pub generated_at: DateTime<Utc>,
    /// the captured themes, in order
    pub themes: Vec<ThemeName>,
    /// every record of every source, in source order
    pub records: Vec<MergedRecord>,
}

impl ExportDocument {
    /// flatten a dataset into a document stamped with the current time
    pub fn from_dataset(dataset: &MergedDataset) -> Self {
        Self {
            generated_at: Utc::now(),
            themes: dataset.themes.clone(),
            records: dataset.all_records().cloned().collect(),
        }
    }
}

/// render a document as json
///
/// # Errors
///
/// returns an error if serialization fails
pub fn render_json(document: &ExportDocument, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(document)?
    } else {
        serde_json::to_vec(document)?
    };

    Ok(bytes)
}

/// parse a rendered document back
///
/// # Errors
///
/// returns an error if `bytes` isn't a valid document
pub fn parse_document(bytes: &[u8]) -> Result<ExportDocument> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            color::ColorValue,
            models::{ResourceDescriptor, ResourceKey, SourceCategory, SourceRecords, ThemeColors},
        },
    };

    fn dataset() -> MergedDataset {
        let themes: Vec<ThemeName> = vec!["light".into(), "dark".into()];

        let mut env_colors = ThemeColors::default();
        env_colors.insert("light".into(), ColorValue::new(255, 245, 245, 245));
        env_colors.insert("dark".into(), ColorValue::new(255, 37, 37, 38));

        let mut brush_colors = ThemeColors::default();
        brush_colors.insert("dark".into(), ColorValue::new(128, 0, 122, 204));

        let env = MergedRecord::from_descriptor(
            &ResourceDescriptor::keyed(
                SourceCategory::EnvironmentColor,
                "ToolWindowBackground",
                ResourceKey::new("Environment.ToolWindowBackground").with_key_type("Background"),
            ),
            env_colors,
        );
        let brush = MergedRecord::from_descriptor(
            &ResourceDescriptor::named(SourceCategory::Brush, "AccentBrush"),
            brush_colors,
        );

        MergedDataset {
            themes,
            sources: vec![
                SourceRecords {
                    source: SourceCategory::EnvironmentColor,
                    records: vec![env],
                },
                SourceRecords {
                    source: SourceCategory::Brush,
                    records: vec![brush],
                },
            ],
            gaps: Vec::new(),
        }
    }

    #[test]
    fn test_round_trip_keeps_identities_and_colors() {
        let document = ExportDocument::from_dataset(&dataset());

        for pretty in [false, true] {
            let parsed = parse_document(&render_json(&document, pretty).unwrap()).unwrap();
            assert_eq!(parsed, document);
        }
    }

    #[test]
    fn test_document_shape() {
        let document = ExportDocument::from_dataset(&dataset());
        let value: serde_json::Value =
            serde_json::from_slice(&render_json(&document, false).unwrap()).unwrap();

        assert_eq!(value["themes"], serde_json::json!(["light", "dark"]));
        assert_eq!(value["records"][0]["identity"], "Environment.ToolWindowBackground");
        assert_eq!(value["records"][0]["key_type"], "Background");
        assert_eq!(value["records"][0]["colors"]["dark"], "#FF252526");
        assert!(value["records"][1].get("key_type").is_none());
        assert_eq!(
            value["records"][1]["colors"],
            serde_json::json!({ "dark": "#80007ACC" })
        );
    }
}
