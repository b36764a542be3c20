//! a host backed by settings bundles on disk
//!
//! ```text
//! <root>/catalog.toml        resources per source, theme independent
//! <root>/themes/<name>.toml  one settings bundle per theme
//! <root>/active.toml         the active settings
//! ```
//!
//! applying a theme imports its bundle over `active.toml`, a backup is a copy of `active.toml`
//! in a temp file
use {
    crate::{
        color::NativeColor,
        host::{HostError, SourceCatalog, ThemeSwitch},
        models::{ResourceDescriptor, ResourceKey, SourceCategory, ThemeName},
    },
    hashbrown::{HashMap, HashSet},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::{
        path::{Path, PathBuf},
        sync::Arc,
    },
    tempfile::NamedTempFile,
    tokio::sync::RwLock,
    tracing::{debug, error, info},
};

/// the catalog file name
const CATALOG_FILE: &str = "catalog.toml";
/// the active settings file name
const ACTIVE_FILE: &str = "active.toml";
/// the directory holding one bundle per theme
const THEMES_DIR: &str = "themes";

/// one resource listed in `catalog.toml`
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    /// the display name
    name: String,
    /// the stable key (keyed sources only)
    key: Option<String>,
    /// the key type
    key_type: Option<String>,
    /// the category GUID
    category: Option<String>,
}

/// the contents of `catalog.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    /// environment colors
    environment: Vec<CatalogEntry>,
    /// brushes
    brush: Vec<CatalogEntry>,
    /// raw palette colors
    raw: Vec<CatalogEntry>,
    /// classification colors
    classification: Vec<CatalogEntry>,
}

impl CatalogFile {
    /// the entries of a source
    fn entries(&self, source: SourceCategory) -> &[CatalogEntry] {
        match source {
            SourceCategory::EnvironmentColor => &self.environment,
            SourceCategory::Brush => &self.brush,
            SourceCategory::RawColor => &self.raw,
            SourceCategory::Classification => &self.classification,
        }
    }

    /// turn the entries of a source into descriptors
    ///
    /// keyed sources line up by index across themes, so each key may only appear once
    fn descriptors(&self, source: SourceCategory) -> Result<Vec<ResourceDescriptor>, HostError> {
        let mut seen = HashSet::new();

        self.entries(source)
            .iter()
            .map(|entry| {
                if !source.has_stable_key() {
                    return Ok(ResourceDescriptor::named(source, &entry.name));
                }

                let token = entry.key.clone().ok_or_else(|| HostError::MissingKey {
                    category: source,
                    name: entry.name.clone(),
                })?;

                if !seen.insert(token.clone()) {
                    return Err(HostError::DuplicateKey {
                        category: source,
                        key: token,
                    });
                }

                Ok(ResourceDescriptor::keyed(
                    source,
                    &entry.name,
                    ResourceKey {
                        token,
                        key_type: entry.key_type.clone(),
                        category: entry.category.clone(),
                    },
                ))
            })
            .collect()
    }
}

/// a settings bundle, as stored per theme and as the active settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsBundle {
    /// environment colors by stable key
    pub environment: HashMap<String, NativeColor>,
    /// brushes by name
    pub brushes: HashMap<String, NativeColor>,
    /// raw palette colors by stable key
    pub raw: HashMap<String, NativeColor>,
    /// classification colors by name
    pub classifications: HashMap<String, NativeColor>,
}

impl SettingsBundle {
    /// the table holding a source's colors
    fn table(&self, source: SourceCategory) -> &HashMap<String, NativeColor> {
        match source {
            SourceCategory::EnvironmentColor => &self.environment,
            SourceCategory::Brush => &self.brushes,
            SourceCategory::RawColor => &self.raw,
            SourceCategory::Classification => &self.classifications,
        }
    }

    /// look up a resource
    pub fn lookup(&self, descriptor: &ResourceDescriptor) -> Option<NativeColor> {
        self.table(descriptor.source)
            .get(descriptor.identity())
            .copied()
    }
}

/// the backup of a [`FileHost`]'s active settings
#[derive(Debug)]
pub struct FileBackup {
    /// a copy of `active.toml`, or `None` if there wasn't one
    saved: Option<NamedTempFile>,
}

/// a host living in a directory
#[derive(Debug)]
pub struct FileHost {
    /// the host directory
    root: PathBuf,
    /// the parsed catalog
    catalog: CatalogFile,
    /// the parsed active settings, dropped whenever they change
    active: RwLock<Option<Arc<SettingsBundle>>>,
}

impl FileHost {
    /// open a host directory
    ///
    /// # Errors
    ///
    /// returns an error if `catalog.toml` can't be read or parsed
    /// returns an error if a keyed resource is listed without a key
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, HostError> {
        let root = root.into();
        let catalog: CatalogFile = read_toml(&root.join(CATALOG_FILE)).await?;

        for source in SourceCategory::ALL {
            catalog.descriptors(source)?;
        }

        info!(root = %root.display(), "Opened host directory");

        Ok(Self {
            root,
            catalog,
            active: RwLock::new(None),
        })
    }

    /// the host directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// the path of `active.toml`
    fn active_path(&self) -> PathBuf {
        self.root.join(ACTIVE_FILE)
    }

    /// the bundle path of a theme
    fn theme_path(&self, theme: &ThemeName) -> Result<PathBuf, HostError> {
        let name = theme.as_str();

        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(HostError::UnknownTheme(name.to_string()));
        }

        Ok(self.root.join(THEMES_DIR).join(format!("{}.toml", name)))
    }

    /// list the themes that have a bundle
    pub async fn themes(&self) -> Result<Vec<ThemeName>, HostError> {
        let dir = self.root.join(THEMES_DIR);
        let io_err = |source| HostError::Io {
            path: dir.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_err)?;
        let mut themes = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "toml")
                && let Some(stem) = path.file_stem()
            {
                themes.push(ThemeName::new(stem.to_string_lossy()));
            }
        }

        themes.sort();
        Ok(themes)
    }

    /// the active settings, parsed once per change
    async fn active_bundle(&self) -> Result<Arc<SettingsBundle>, HostError> {
        if let Some(bundle) = self.active.read().await.as_ref() {
            return Ok(Arc::clone(bundle));
        }

        let mut slot = self.active.write().await;
        let path = self.active_path();
        let bundle = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            Arc::new(read_toml::<SettingsBundle>(&path).await?)
        } else {
            Arc::new(SettingsBundle::default())
        };

        *slot = Some(Arc::clone(&bundle));
        Ok(bundle)
    }

    /// forget the parsed active settings
    async fn invalidate(&self) {
        *self.active.write().await = None;
    }
}

#[async_trait::async_trait]
impl ThemeSwitch for FileHost {
    type Backup = FileBackup;

    async fn backup(&self) -> Result<FileBackup, HostError> {
        let active = self.active_path();

        if !tokio::fs::try_exists(&active).await.unwrap_or(false) {
            debug!("No active settings to back up");
            return Ok(FileBackup { saved: None });
        }

        let saved = tempfile::Builder::new()
            .prefix("themecap-backup-")
            .suffix(".toml")
            .tempfile()
            .map_err(|source| HostError::Io {
                path: std::env::temp_dir(),
                source,
            })?;

        tokio::fs::copy(&active, saved.path())
            .await
            .map_err(|source| HostError::Io {
                path: active.clone(),
                source,
            })?;

        debug!(backup = %saved.path().display(), "Backed up active settings");
        Ok(FileBackup { saved: Some(saved) })
    }

    async fn apply(&self, theme: &ThemeName) -> Result<(), HostError> {
        let path = self.theme_path(theme)?;

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(HostError::UnknownTheme(theme.to_string()));
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| HostError::Io {
                path: path.clone(),
                source,
            })?;

        toml::from_str::<SettingsBundle>(&contents).map_err(|source| HostError::Parse {
            path: path.clone(),
            source,
        })?;

        let active = self.active_path();
        tokio::fs::write(&active, contents)
            .await
            .map_err(|source| HostError::Io {
                path: active,
                source,
            })?;

        self.invalidate().await;
        Ok(())
    }

    async fn restore(&self, backup: FileBackup) -> Result<(), HostError> {
        let active = self.active_path();

        let Some(saved) = backup.saved else {
            let removed = match tokio::fs::remove_file(&active).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            };

            self.invalidate().await;
            return removed.map_err(|source| HostError::Io {
                path: active,
                source,
            });
        };

        let copied = tokio::fs::copy(saved.path(), &active).await;
        self.invalidate().await;

        let Err(source) = copied else {
            return Ok(());
        };

        match saved.into_temp_path().keep() {
            Ok(kept) => {
                error!(backup = %kept.display(), "Kept the settings backup after a failed restore");
                Err(HostError::RestoreKept {
                    path: active,
                    kept,
                    source,
                })
            }
            Err(e) => {
                error!(error = %e.error, "Failed to keep the settings backup");
                Err(HostError::Io {
                    path: active,
                    source,
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl SourceCatalog for FileHost {
    async fn descriptors(
        &self,
        source: SourceCategory,
    ) -> Result<Vec<ResourceDescriptor>, HostError> {
        self.catalog.descriptors(source)
    }

    async fn resolve(
        &self,
        descriptor: &ResourceDescriptor,
    ) -> Result<Option<NativeColor>, HostError> {
        Ok(self.active_bundle().await?.lookup(descriptor))
    }
}

/// read and parse a toml file
async fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, HostError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    toml::from_str(&contents).map_err(|source| HostError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
