//! the data that flows through a capture run
use {
    crate::color::ColorValue,
    schemars::JsonSchema,
    serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{MapAccess, Visitor},
        ser::SerializeMap,
    },
    std::fmt,
};

/// a class of themeable resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum SourceCategory {
    /// environment colors, identified by a stable key
    EnvironmentColor,
    /// brushes, identified by name
    Brush,
    /// raw palette colors, identified by a stable key
    RawColor,
    /// syntax classification colors, identified by name
    Classification,
}

/// how the per-theme snapshots of a source are lined up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// the i-th entry of every snapshot is the same resource
    Positional,
    /// entries are matched up by identity
    Keyed,
}

impl SourceCategory {
    /// every source, in capture order
    pub const ALL: [Self; 4] = [
        Self::EnvironmentColor,
        Self::Brush,
        Self::RawColor,
        Self::Classification,
    ];

    /// whether resources of this source carry a stable key
    pub const fn has_stable_key(self) -> bool {
        matches!(self, Self::EnvironmentColor | Self::RawColor)
    }

    /// the merge strategy that's safe for this source
    ///
    /// keyed sources enumerate completely and identically under every theme, so their
    /// snapshots line up by index. named sources can resolve differently per theme
    pub const fn merge_strategy(self) -> MergeStrategy {
        if self.has_stable_key() {
            MergeStrategy::Positional
        } else {
            MergeStrategy::Keyed
        }
    }

    /// the name of this source's sheet in exports
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::EnvironmentColor => "EnvironmentColors",
            Self::Brush => "Brushes",
            Self::RawColor => "RawColors",
            Self::Classification => "ClassificationColors",
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EnvironmentColor => "environment color",
            Self::Brush => "brush",
            Self::RawColor => "raw color",
            Self::Classification => "classification",
        };

        f.write_str(s)
    }
}

/// the name of a theme
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ThemeName(String);

impl ThemeName {
    /// make a new theme name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// the name as a str
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// the name with its first letter upper-cased (`dark` -> `Dark`)
    pub fn title(&self) -> String {
        let mut chars = self.0.chars();

        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ThemeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThemeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ThemeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// the stable identity of a keyed resource plus the metadata that comes with it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    /// the opaque identity token
    pub token: String,
    /// the key type (foreground, background, ...)
    pub key_type: Option<String>,
    /// the grouping GUID of the resource
    pub category: Option<String>,
}

impl ResourceKey {
    /// make a key with no metadata
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            key_type: None,
            category: None,
        }
    }

    /// set the key type
    pub fn with_key_type(mut self, key_type: impl Into<String>) -> Self {
        self.key_type = Some(key_type.into());
        self
    }

    /// set the category GUID
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// a themeable resource as enumerated by the host
///
/// metadata (key type, category) only exists together with a stable key, which
/// [`ResourceKey`] enforces by construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    /// the source this resource belongs to
    pub source: SourceCategory,
    /// the human readable name
    pub display_name: String,
    /// the stable key, if the source has one
    pub key: Option<ResourceKey>,
}

impl ResourceDescriptor {
    /// make a descriptor identified by a stable key
    pub fn keyed(
        source: SourceCategory,
        display_name: impl Into<String>,
        key: ResourceKey,
    ) -> Self {
        Self {
            source,
            display_name: display_name.into(),
            key: Some(key),
        }
    }

    /// make a descriptor identified by its name alone
    pub fn named(source: SourceCategory, display_name: impl Into<String>) -> Self {
        Self {
            source,
            display_name: display_name.into(),
            key: None,
        }
    }

    /// the identity of this resource: its stable key if it has one, its name otherwise
    pub fn identity(&self) -> &str {
        self.key
            .as_ref()
            .map_or(self.display_name.as_str(), |key| key.token.as_str())
    }

    /// the key type, if any
    pub fn key_type(&self) -> Option<&str> {
        self.key.as_ref().and_then(|key| key.key_type.as_deref())
    }

    /// the category GUID, if any
    pub fn category(&self) -> Option<&str> {
        self.key.as_ref().and_then(|key| key.category.as_deref())
    }
}

/// one resolved resource in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// the resource
    pub descriptor: ResourceDescriptor,
    /// its color under the snapshot's theme
    pub color: ColorValue,
}

/// a resource the host couldn't resolve under a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionGap {
    /// the theme that was active
    pub theme: ThemeName,
    /// the source of the resource
    pub source: SourceCategory,
    /// the identity of the resource
    pub identity: String,
}

/// the resolved colors of one source under one theme
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// the theme that was active
    theme: ThemeName,
    /// the source that was captured
    source: SourceCategory,
    /// the resolved entries, in enumeration order
    entries: Vec<SnapshotEntry>,
    /// the resources that were skipped
    gaps: Vec<ResolutionGap>,
}

impl Snapshot {
    /// make a new snapshot with no gaps
    pub fn new(theme: ThemeName, source: SourceCategory, entries: Vec<SnapshotEntry>) -> Self {
        Self {
            theme,
            source,
            entries,
            gaps: Vec::new(),
        }
    }

    /// attach the resources that were skipped while capturing
    pub fn with_gaps(mut self, gaps: Vec<ResolutionGap>) -> Self {
        self.gaps = gaps;
        self
    }

    /// the theme this was captured under
    pub fn theme(&self) -> &ThemeName {
        &self.theme
    }

    /// the source this belongs to
    pub fn source(&self) -> SourceCategory {
        self.source
    }

    /// the resolved entries
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// the skipped resources
    pub fn gaps(&self) -> &[ResolutionGap] {
        &self.gaps
    }

    /// the number of resolved entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// whether nothing resolved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// colors by theme, kept in theme order
///
/// serialized as a map from theme name to `#AARRGGBB`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeColors(Vec<(ThemeName, ColorValue)>);

impl ThemeColors {
    /// make an empty set with room for `n` themes
    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// the color under a theme
    pub fn get(&self, theme: &str) -> Option<ColorValue> {
        self.0
            .iter()
            .find(|(name, _)| name.as_str() == theme)
            .map(|(_, color)| *color)
    }

    /// whether a theme has a color
    pub fn contains(&self, theme: &str) -> bool {
        self.get(theme).is_some()
    }

    /// set the color of a theme, returning false if it already had one
    pub fn insert(&mut self, theme: ThemeName, color: ColorValue) -> bool {
        if self.contains(theme.as_str()) {
            return false;
        }

        self.0.push((theme, color));
        true
    }

    /// iterate over `(theme, color)` pairs in theme order
    pub fn iter(&self) -> impl Iterator<Item = (&ThemeName, ColorValue)> {
        self.0.iter().map(|(theme, color)| (theme, *color))
    }

    /// the themes that have a color
    pub fn themes(&self) -> impl Iterator<Item = &ThemeName> {
        self.0.iter().map(|(theme, _)| theme)
    }

    /// the number of themes with a color
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// whether no theme has a color
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ThemeColors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (theme, color) in &self.0 {
            map.serialize_entry(theme, color)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for ThemeColors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// visits a theme -> color map
        struct ThemeColorsVisitor;

        impl<'de> Visitor<'de> for ThemeColorsVisitor {
            type Value = ThemeColors;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of theme names to colors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut colors = ThemeColors::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((theme, color)) = access.next_entry::<ThemeName, ColorValue>()? {
                    if !colors.insert(theme.clone(), color) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate theme '{}'",
                            theme
                        )));
                    }
                }

                Ok(colors)
            }
        }

        deserializer.deserialize_map(ThemeColorsVisitor)
    }
}

/// one resource with its colors under every captured theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// the source of the resource
    pub source: SourceCategory,
    /// the stable key if there is one, the display name otherwise
    pub identity: String,
    /// the human readable name
    pub display_name: String,
    /// the key type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// the category GUID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// the color under each theme it resolved in
    pub colors: ThemeColors,
}

impl MergedRecord {
    /// start a record from a descriptor
    pub fn from_descriptor(descriptor: &ResourceDescriptor, colors: ThemeColors) -> Self {
        Self {
            source: descriptor.source,
            identity: descriptor.identity().to_string(),
            display_name: descriptor.display_name.clone(),
            key_type: descriptor.key_type().map(str::to_string),
            category: descriptor.category().map(str::to_string),
            colors,
        }
    }
}

/// the merged records of one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecords {
    /// the source
    pub source: SourceCategory,
    /// its records, in first-appearance order
    pub records: Vec<MergedRecord>,
}

/// everything a run produced
#[derive(Debug, Clone, Default)]
pub struct MergedDataset {
    /// the captured themes, in capture order
    pub themes: Vec<ThemeName>,
    /// the merged records per source, in capture order
    pub sources: Vec<SourceRecords>,
    /// every resource that failed to resolve under some theme
    pub gaps: Vec<ResolutionGap>,
}

impl MergedDataset {
    /// the records of a source
    pub fn records(&self, source: SourceCategory) -> &[MergedRecord] {
        self.sources
            .iter()
            .find(|s| s.source == source)
            .map(|s| s.records.as_slice())
            .unwrap_or(&[])
    }

    /// every record of every source, concatenated in source order
    pub fn all_records(&self) -> impl Iterator<Item = &MergedRecord> {
        self.sources.iter().flat_map(|s| s.records.iter())
    }

    /// the total number of records
    pub fn record_count(&self) -> usize {
        self.sources.iter().map(|s| s.records.len()).sum()
    }
}
